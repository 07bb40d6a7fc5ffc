use serde::Serialize;

use moc_core::entities::ChangeRequest;
use moc_core::enums::{TaskPhase, TaskStatus};
use moc_db::repos::change::NewChecklistTask;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct TaskAddedResponse {
    task_id: String,
    change: ChangeRequest,
}

/// Handle `mocctl task`.
pub async fn handle(
    action: &TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.require_actor()?;
    match action {
        TaskCommands::Add {
            change_id,
            title,
            assignee,
            due,
            phase,
        } => {
            let task = NewChecklistTask {
                title: title.clone(),
                assignee: assignee.clone(),
                due_date: *due,
                phase: parse_enum::<TaskPhase>(phase, "phase")?,
            };
            let (change, task_id) = ctx.service.add_task(change_id, task, actor).await?;
            output(&TaskAddedResponse { task_id, change }, flags.format)
        }
        TaskCommands::Status {
            change_id,
            task_id,
            status,
        } => {
            let status = parse_enum::<TaskStatus>(status, "status")?;
            let change = ctx
                .service
                .set_task_status(change_id, task_id, status, actor)
                .await?;
            output(&change, flags.format)
        }
    }
}
