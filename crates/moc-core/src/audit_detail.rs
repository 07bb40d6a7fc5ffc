//! Typed audit detail payloads.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ChangeStatus;

/// Detail for `AuditAction::StatusUpdate` and `AuditAction::EmergencyOverride`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: ChangeStatus,
    pub to: ChangeStatus,
    pub reason: Option<String>,
}
