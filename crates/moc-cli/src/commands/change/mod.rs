mod assess;
mod create;
mod edit;
mod export;
mod list;
mod show;
mod transition;

use moc_core::lifecycle::Transition;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ChangeCommands;
use crate::context::AppContext;

/// Handle `mocctl change`.
pub async fn handle(
    action: &ChangeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ChangeCommands::Create {
            title,
            description,
            priority,
            impact,
            facility,
            asset,
            emergency,
        } => {
            create::run(
                create::CreateArgs {
                    title,
                    description,
                    priority,
                    impacts: impact,
                    facility: facility.as_deref(),
                    asset: asset.as_deref(),
                    emergency: emergency.as_deref(),
                },
                ctx,
                flags,
            )
            .await
        }
        ChangeCommands::Edit {
            id,
            title,
            description,
            priority,
            impact,
            no_impacts,
        } => {
            edit::run(
                id,
                title.as_deref(),
                description.as_deref(),
                priority.as_deref(),
                impact,
                *no_impacts,
                ctx,
                flags,
            )
            .await
        }
        ChangeCommands::Show { id } => show::run(id, ctx, flags).await,
        ChangeCommands::List {
            status,
            priority,
            facility,
        } => {
            list::run(
                status.as_deref(),
                priority.as_deref(),
                facility.as_deref(),
                ctx,
                flags,
            )
            .await
        }
        ChangeCommands::Submit { id } => transition::run(id, Transition::Submit, ctx, flags).await,
        ChangeCommands::Review { id } => {
            transition::run(id, Transition::BeginReview, ctx, flags).await
        }
        ChangeCommands::Approve { id } => {
            transition::run(id, Transition::Approve, ctx, flags).await
        }
        ChangeCommands::Revise { id, reason } => {
            let step = Transition::RequestRevision {
                reason: reason.clone(),
            };
            transition::run(id, step, ctx, flags).await
        }
        ChangeCommands::Reject { id, reason } => {
            let step = Transition::Reject {
                reason: reason.clone(),
            };
            transition::run(id, step, ctx, flags).await
        }
        ChangeCommands::Resubmit { id } => {
            transition::run(id, Transition::Resubmit, ctx, flags).await
        }
        ChangeCommands::Start { id } => {
            transition::run(id, Transition::StartImplementation, ctx, flags).await
        }
        ChangeCommands::Close { id } => transition::run(id, Transition::CloseOut, ctx, flags).await,
        ChangeCommands::Emergency { id, justification } => {
            let step = Transition::EmergencyBypass {
                justification: justification.clone(),
            };
            transition::run(id, step, ctx, flags).await
        }
        ChangeCommands::Assess {
            id,
            probability,
            severity,
            rationale,
        } => assess::run_assess(id, *probability, *severity, rationale, ctx, flags).await,
        ChangeCommands::Comment { id, text } => assess::run_comment(id, text, ctx, flags).await,
        ChangeCommands::History { id } => show::run_history(id, ctx, flags).await,
        ChangeCommands::Report { id } => show::run_report(id, ctx, flags).await,
        ChangeCommands::Export { id, out } => export::run(id, out, ctx, flags).await,
    }
}
