use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audit_detail::StatusChangedDetail;
use crate::enums::{AuditAction, ResourceType};

/// One immutable entry of an audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user: String,
    pub action: AuditAction,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<StatusChangedDetail>,
}

impl AuditEntry {
    /// Whether two entries describe the same event: same instant and user.
    #[must_use]
    pub fn same_event(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.user_id == other.user_id
    }
}

/// An entry of the global audit log, keyed by the resource it describes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GlobalAuditEntry {
    pub resource_type: ResourceType,
    pub resource_id: String,
    #[serde(flatten)]
    pub entry: AuditEntry,
}
