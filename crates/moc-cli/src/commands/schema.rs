use anyhow::bail;
use schemars::schema_for;
use serde_json::Value;

use moc_core::audit_trail::NotificationLog;
use moc_core::entities::{Asset, AuditEntry, ChangeRequest, GlobalAuditEntry, Notification, Task};
use moc_core::report::ChangeReport;
use moc_core::responses::{HistoryResponse, RiskScoreResponse, TransitionResponse};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `mocctl schema`.
pub const SCHEMA_NAMES: &[&str] = &[
    "change_request",
    "audit_entry",
    "global_audit_entry",
    "task",
    "asset",
    "notification",
    "notification_log",
    "change_report",
    "risk_score",
    "history",
    "transition",
];

macro_rules! schema_value {
    ($ty:ty) => {
        serde_json::to_value(schema_for!($ty))?
    };
}

/// Handle `mocctl schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_by_name(&args.type_name)?, flags.format)
}

fn schema_by_name(name: &str) -> anyhow::Result<Value> {
    let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
    let schema = match normalized.as_str() {
        "change_request" => schema_value!(ChangeRequest),
        "audit_entry" => schema_value!(AuditEntry),
        "global_audit_entry" => schema_value!(GlobalAuditEntry),
        "task" => schema_value!(Task),
        "asset" => schema_value!(Asset),
        "notification" => schema_value!(Notification),
        "notification_log" => schema_value!(NotificationLog),
        "change_report" => schema_value!(ChangeReport),
        "risk_score" => schema_value!(RiskScoreResponse),
        "history" => schema_value!(HistoryResponse),
        "transition" => schema_value!(TransitionResponse),
        _ => bail!(
            "unknown schema '{name}': expected one of {}",
            SCHEMA_NAMES.join(", ")
        ),
    };
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in SCHEMA_NAMES {
            let schema = schema_by_name(name).unwrap();
            assert!(schema.is_object(), "{name} should produce an object schema");
        }
    }

    #[test]
    fn change_request_schema_lists_status() {
        let schema = schema_by_name("change-request").unwrap();
        assert!(schema["properties"]["status"].is_object());
        assert!(schema["properties"]["audit_log"].is_object());
    }

    #[test]
    fn unknown_name_lists_choices() {
        let err = schema_by_name("facility").unwrap_err();
        assert!(err.to_string().contains("change_request"));
    }
}
