use moc_db::repos::asset::NewAsset;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AssetCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mocctl asset`.
pub async fn handle(
    action: &AssetCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AssetCommands::Add {
            name,
            facility,
            kind,
            commissioned,
        } => {
            let actor = ctx.require_actor()?;
            let asset = ctx
                .service
                .register_asset(
                    NewAsset {
                        name: name.clone(),
                        facility: facility.clone(),
                        kind: kind.clone(),
                        commissioned_at: *commissioned,
                    },
                    actor,
                )
                .await?;
            output(&asset, flags.format)
        }
        AssetCommands::List => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            let assets = ctx.service.list_assets(Some(limit)).await?;
            output(&assets, flags.format)
        }
        AssetCommands::Show { id } => {
            let asset = ctx.service.get_asset(id).await?;
            output(&asset, flags.format)
        }
        AssetCommands::Purge { id } => {
            let actor = ctx.require_actor()?;
            let asset = ctx.service.purge_asset(id, actor).await?;
            output(&asset, flags.format)
        }
    }
}
