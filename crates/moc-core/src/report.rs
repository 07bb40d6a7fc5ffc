//! Export view of a change request.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AuditEntry, ChangeRequest};
use crate::enums::{ChangeStatus, Priority, RiskTier};

/// Plain-data snapshot of a change request for reports and exports.
///
/// `history` is whatever the caller passes in, usually the merged local and
/// global log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChangeReport {
    pub id: String,
    pub title: String,
    pub status: ChangeStatus,
    pub priority: Priority,
    pub risk_score: u32,
    pub risk_tier: RiskTier,
    pub risk_label: String,
    pub impacts: Vec<String>,
    pub emergency_override: bool,
    pub tasks_total: usize,
    pub tasks_done: usize,
    pub open_pre_tasks: usize,
    pub audit_entries: usize,
    pub requested_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<AuditEntry>,
}

impl ChangeReport {
    #[must_use]
    pub fn from_record(record: &ChangeRequest, history: Vec<AuditEntry>) -> Self {
        let tier = record.risk_tier();
        Self {
            id: record.id().to_string(),
            title: record.title().to_string(),
            status: record.status(),
            priority: record.priority(),
            risk_score: record.risk_score(),
            risk_tier: tier,
            risk_label: tier.label().to_string(),
            impacts: record
                .impacts()
                .active()
                .into_iter()
                .map(String::from)
                .collect(),
            emergency_override: record.emergency_override(),
            tasks_total: record.tasks().len(),
            tasks_done: record.tasks().iter().filter(|t| t.is_done()).count(),
            open_pre_tasks: record.open_pre_tasks(),
            audit_entries: record.audit_log().len(),
            requested_by: record.requested_by().to_string(),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
            history,
        }
    }
}
