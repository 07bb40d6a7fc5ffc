use moc_core::enums::Priority;
use moc_core::responses::TransitionResponse;
use moc_db::repos::change::NewChange;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_enum, parse_impacts};
use crate::context::AppContext;
use crate::output::output;

pub struct CreateArgs<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub priority: &'a str,
    pub impacts: &'a [String],
    pub facility: Option<&'a str>,
    pub asset: Option<&'a str>,
    pub emergency: Option<&'a str>,
}

pub async fn run(args: CreateArgs<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.require_actor()?;
    let new = NewChange {
        title: args.title.to_string(),
        description: args.description.to_string(),
        priority: parse_enum::<Priority>(args.priority, "priority")?,
        impacts: parse_impacts(args.impacts)?,
        facility_id: args.facility.map(str::to_string),
        asset_id: args.asset.map(str::to_string),
    };

    if let Some(justification) = args.emergency {
        let (change, notification) = ctx
            .service
            .file_emergency(new, justification, actor)
            .await?;
        return output(
            &TransitionResponse {
                change,
                notification: Some(notification.message),
            },
            flags.format,
        );
    }

    let change = ctx.service.create_change(new, actor).await?;
    output(&change, flags.format)
}
