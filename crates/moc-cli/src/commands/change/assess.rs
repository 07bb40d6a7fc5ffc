use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run_assess(
    id: &str,
    probability: i64,
    severity: i64,
    rationale: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.require_actor()?;
    let change = ctx
        .service
        .assess_risk(id, probability, severity, rationale, actor)
        .await?;
    output(&change, flags.format)
}

pub async fn run_comment(
    id: &str,
    text: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.require_actor()?;
    let change = ctx.service.add_comment(id, text, actor).await?;
    output(&change, flags.format)
}
