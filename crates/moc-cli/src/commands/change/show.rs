use moc_core::responses::HistoryResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let change = ctx.service.get_change(id).await?;
    output(&change, flags.format)
}

pub async fn run_history(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = ctx.service.history(id).await?;
    output(
        &HistoryResponse {
            change_id: id.to_string(),
            entries,
        },
        flags.format,
    )
}

pub async fn run_report(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.service.change_report(id).await?;
    output(&report, flags.format)
}
