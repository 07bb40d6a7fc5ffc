use std::path::Path;

use moc_core::responses::ExportResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, out: &Path, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let path = if out.is_absolute() {
        out.to_path_buf()
    } else {
        std::env::current_dir()?.join(out)
    };
    let entries = ctx.service.export_history(id, &path).await?;
    output(
        &ExportResponse {
            path: path.display().to_string(),
            entries,
        },
        flags.format,
    )
}
