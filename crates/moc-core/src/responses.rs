//! CLI response types returned as JSON by `mocctl` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AuditEntry, ChangeRequest};
use crate::enums::RiskTier;

/// Response from `mocctl change <transition>`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransitionResponse {
    pub change: ChangeRequest,
    pub notification: Option<String>,
}

/// Response from `mocctl change history`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HistoryResponse {
    pub change_id: String,
    pub entries: Vec<AuditEntry>,
}

/// Response from `mocctl risk estimate|pxs|classify`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RiskScoreResponse {
    pub score: u32,
    pub tier: RiskTier,
    pub label: String,
}

impl RiskScoreResponse {
    #[must_use]
    pub fn for_score(score: u32) -> Self {
        let tier = crate::risk::classify(score);
        Self {
            score,
            tier,
            label: tier.label().to_string(),
        }
    }
}

/// Response from `mocctl advise`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AdviceResponse {
    pub change_id: String,
    pub advice: String,
}

/// Response from `mocctl notifications clear` and `mocctl asset purge`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RemovedResponse {
    pub removed: usize,
}

/// Response from `mocctl change export`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportResponse {
    pub path: String,
    pub entries: usize,
}
