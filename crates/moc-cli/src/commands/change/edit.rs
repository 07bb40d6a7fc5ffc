use moc_core::entities::Impacts;
use moc_core::enums::Priority;
use moc_core::lifecycle::DetailsUpdate;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_enum, parse_impacts};
use crate::context::AppContext;
use crate::output::output;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
    priority: Option<&str>,
    impacts: &[String],
    no_impacts: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.require_actor()?;
    let impacts = if no_impacts {
        Some(Impacts::default())
    } else if impacts.is_empty() {
        None
    } else {
        Some(parse_impacts(impacts)?)
    };
    let update = DetailsUpdate {
        title: title.map(str::to_string),
        description: description.map(str::to_string),
        priority: priority
            .map(|value| parse_enum::<Priority>(value, "priority"))
            .transpose()?,
        impacts,
    };

    let change = ctx.service.edit_change(id, &update, actor).await?;
    output(&change, flags.format)
}
