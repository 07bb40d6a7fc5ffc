use moc_core::responses::RemovedResponse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::NotificationCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mocctl notifications`.
pub async fn handle(
    action: &NotificationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        NotificationCommands::List => {
            let panel = ctx.service.notifications().await?;
            output(&panel.items(), flags.format)
        }
        NotificationCommands::Clear => {
            let actor = ctx.require_actor()?;
            let removed = ctx.service.clear_notifications(actor).await?;
            output(&RemovedResponse { removed }, flags.format)
        }
    }
}
