use moc_core::enums::Priority;
use moc_core::responses::RiskScoreResponse;
use moc_core::risk;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RiskCommands;
use crate::commands::shared::parse::{parse_enum, parse_impacts};
use crate::output::output;

/// Handle `mocctl risk`. Pure calculation, no project required.
pub fn handle(action: &RiskCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&score(action)?, flags.format)
}

fn score(action: &RiskCommands) -> anyhow::Result<RiskScoreResponse> {
    let score = match action {
        RiskCommands::Estimate { priority, impact } => risk::estimate(
            parse_enum::<Priority>(priority, "priority")?,
            parse_impacts(impact)?,
        ),
        RiskCommands::Pxs {
            probability,
            severity,
        } => risk::compute_pxs(*probability, *severity)?,
        RiskCommands::Classify { score } => *score,
    };
    Ok(RiskScoreResponse::for_score(score))
}
