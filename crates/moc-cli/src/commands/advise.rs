use moc_core::advisor::{NullAdvisor, advice_or_fallback, context_for};
use moc_core::responses::AdviceResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AdviseArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mocctl advise`.
///
/// Only the offline advisor ships, so the answer is the fallback text unless
/// another `Advisor` is wired in here.
pub async fn handle(args: &AdviseArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let change = ctx.service.get_change(&args.id).await?;
    let advice = advice_or_fallback(&NullAdvisor, &args.prompt, &context_for(&change));
    output(
        &AdviceResponse {
            change_id: change.id().to_string(),
            advice,
        },
        flags.format,
    )
}
