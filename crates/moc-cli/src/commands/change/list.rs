use serde::Serialize;

use moc_core::entities::ChangeRequest;
use moc_core::enums::{ChangeStatus, Priority, RiskTier};
use moc_db::repos::change::ChangeFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// One line of `mocctl change list`.
#[derive(Debug, Serialize)]
struct ChangeSummary {
    id: String,
    title: String,
    status: ChangeStatus,
    priority: Priority,
    risk_score: u32,
    risk_tier: RiskTier,
    emergency: bool,
    tasks: usize,
}

impl From<&ChangeRequest> for ChangeSummary {
    fn from(record: &ChangeRequest) -> Self {
        Self {
            id: record.id().to_string(),
            title: record.title().to_string(),
            status: record.status(),
            priority: record.priority(),
            risk_score: record.risk_score(),
            risk_tier: record.risk_tier(),
            emergency: record.emergency_override(),
            tasks: record.tasks().len(),
        }
    }
}

pub async fn run(
    status: Option<&str>,
    priority: Option<&str>,
    facility: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = ChangeFilter {
        status: status
            .map(|value| parse_enum::<ChangeStatus>(value, "status"))
            .transpose()?,
        priority: priority
            .map(|value| parse_enum::<Priority>(value, "priority"))
            .transpose()?,
        facility_id: facility.map(str::to_string),
        limit: Some(effective_limit(flags.limit, ctx.config.general.default_limit)),
    };

    let changes = ctx.service.list_changes(&filter).await?;
    let summaries: Vec<ChangeSummary> = changes.iter().map(ChangeSummary::from).collect();
    output(&summaries, flags.format)
}
