use moc_core::lifecycle::Transition;
use moc_core::responses::TransitionResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    transition: Transition,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.require_actor()?;
    let (change, notification) = ctx.service.transition(id, &transition, actor).await?;
    output(
        &TransitionResponse {
            change,
            notification: Some(notification.message),
        },
        flags.format,
    )
}
