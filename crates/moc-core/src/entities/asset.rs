use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A piece of plant equipment in the asset registry.
///
/// Unlike change requests, assets can be purged outright when decommissioned.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub facility: String,
    pub kind: String,
    pub commissioned_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
