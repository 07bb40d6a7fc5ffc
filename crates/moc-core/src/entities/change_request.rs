use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audit_trail::AuditTrail;
use crate::entities::Task;
use crate::enums::{ChangeStatus, Priority, RiskTier, TaskPhase};
use crate::identity::Actor;
use crate::risk;

/// Impact flags over the fixed vocabulary a change can touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Impacts {
    #[serde(default)]
    pub safety: bool,
    #[serde(default)]
    pub environmental: bool,
    #[serde(default)]
    pub operational: bool,
    #[serde(default)]
    pub regulatory: bool,
    #[serde(default)]
    pub emergency: bool,
}

impl Impacts {
    pub const NAMES: [&'static str; 5] = [
        "safety",
        "environmental",
        "operational",
        "regulatory",
        "emergency",
    ];

    /// Every flag set, as forced by the emergency paths.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            safety: true,
            environmental: true,
            operational: true,
            regulatory: true,
            emergency: true,
        }
    }

    /// Flags in `NAMES` order.
    #[must_use]
    pub const fn flags(self) -> [bool; 5] {
        [
            self.safety,
            self.environmental,
            self.operational,
            self.regulatory,
            self.emergency,
        ]
    }

    /// Number of flags set.
    #[must_use]
    pub fn count(self) -> u32 {
        self.flags().into_iter().map(u32::from).sum()
    }

    /// Set a flag by name. Returns `false` for names outside the vocabulary.
    pub fn set(&mut self, name: &str) -> bool {
        let flag = match name {
            "safety" => &mut self.safety,
            "environmental" => &mut self.environmental,
            "operational" => &mut self.operational,
            "regulatory" => &mut self.regulatory,
            "emergency" => &mut self.emergency,
            _ => return false,
        };
        *flag = true;
        true
    }

    /// Names of the flags that are set.
    #[must_use]
    pub fn active(self) -> Vec<&'static str> {
        Self::NAMES
            .into_iter()
            .zip(self.flags())
            .filter_map(|(name, set)| set.then_some(name))
            .collect()
    }
}

/// Detailed probability × severity assessment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RiskAssessment {
    pub probability: u8,
    pub severity: u8,
    pub score: u32,
    pub rationale: String,
    pub assessed_at: DateTime<Utc>,
}

/// Input for opening a change request. The caller supplies the generated ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChangeRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub impacts: Impacts,
    pub facility_id: Option<String>,
    pub asset_id: Option<String>,
}

/// A Management of Change record.
///
/// Fields are read through accessors; status, risk, tasks, and the audit log
/// only change through `Lifecycle`, which keeps `risk_score` derived and
/// appends one audit entry per mutation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChangeRequest {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) status: ChangeStatus,
    pub(crate) priority: Priority,
    pub(crate) impacts: Impacts,
    pub(crate) risk_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) risk_assessment: Option<RiskAssessment>,
    #[serde(default)]
    pub(crate) emergency_override: bool,
    pub(crate) requested_by: String,
    pub(crate) facility_id: Option<String>,
    pub(crate) asset_id: Option<String>,
    #[serde(default)]
    pub(crate) audit_log: AuditTrail,
    #[serde(default)]
    pub(crate) tasks: Vec<Task>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl ChangeRequest {
    /// Open a new record in `draft` with an empty audit log.
    #[must_use]
    pub fn draft(new: NewChangeRequest, requested_by: &Actor) -> Self {
        let now = Utc::now();
        let mut record = Self {
            id: new.id,
            title: new.title,
            description: new.description,
            status: ChangeStatus::Draft,
            priority: new.priority,
            impacts: new.impacts,
            risk_score: 0,
            risk_assessment: None,
            emergency_override: false,
            requested_by: requested_by.id.clone(),
            facility_id: new.facility_id,
            asset_id: new.asset_id,
            audit_log: AuditTrail::new(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        record.risk_score = risk::derive_score(&record);
        record
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn status(&self) -> ChangeStatus {
        self.status
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub const fn impacts(&self) -> Impacts {
        self.impacts
    }

    #[must_use]
    pub const fn risk_score(&self) -> u32 {
        self.risk_score
    }

    /// Tier of the current score, always via `risk::classify`.
    #[must_use]
    pub const fn risk_tier(&self) -> RiskTier {
        risk::classify(self.risk_score)
    }

    #[must_use]
    pub const fn risk_assessment(&self) -> Option<&RiskAssessment> {
        self.risk_assessment.as_ref()
    }

    #[must_use]
    pub const fn emergency_override(&self) -> bool {
        self.emergency_override
    }

    #[must_use]
    pub fn requested_by(&self) -> &str {
        &self.requested_by
    }

    #[must_use]
    pub fn facility_id(&self) -> Option<&str> {
        self.facility_id.as_deref()
    }

    #[must_use]
    pub fn asset_id(&self) -> Option<&str> {
        self.asset_id.as_deref()
    }

    #[must_use]
    pub const fn audit_log(&self) -> &AuditTrail {
        &self.audit_log
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Pre-implementation tasks not yet done.
    #[must_use]
    pub fn open_pre_tasks(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.phase == TaskPhase::Pre && !t.is_done())
            .count()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the stored score equals the score derived from its inputs.
    #[must_use]
    pub fn has_consistent_risk(&self) -> bool {
        self.risk_score == risk::derive_score(self)
    }

    /// Overwrite the stored score with the derived one.
    ///
    /// Returns the stale value when it differed, for callers that log it.
    pub fn reconcile_risk(&mut self) -> Option<u32> {
        let derived = risk::derive_score(self);
        if derived == self.risk_score {
            return None;
        }
        let stale = self.risk_score;
        self.risk_score = derived;
        Some(stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Role;

    fn new_request(priority: Priority, impacts: Impacts) -> NewChangeRequest {
        NewChangeRequest {
            id: "moc-a3f8b2c1".into(),
            title: "Replace relief valve PSV-101".into(),
            description: "Upgrade to a higher set pressure".into(),
            priority,
            impacts,
            facility_id: None,
            asset_id: None,
        }
    }

    #[test]
    fn draft_starts_empty_with_derived_score() {
        let actor = Actor::new("usr-1", "Dana Ortiz", Role::Engineer);
        let impacts = Impacts {
            safety: true,
            ..Impacts::default()
        };
        let record = ChangeRequest::draft(new_request(Priority::High, impacts), &actor);

        assert_eq!(record.status(), ChangeStatus::Draft);
        assert_eq!(record.risk_score(), 12);
        assert_eq!(record.risk_tier(), RiskTier::High);
        assert!(record.audit_log().is_empty());
        assert_eq!(record.requested_by(), "usr-1");
        assert!(record.has_consistent_risk());
    }

    #[test]
    fn impacts_count_and_active() {
        let mut impacts = Impacts::default();
        assert_eq!(impacts.count(), 0);
        assert!(impacts.set("regulatory"));
        assert!(impacts.set("safety"));
        assert!(!impacts.set("financial"));
        assert_eq!(impacts.count(), 2);
        assert_eq!(impacts.active(), vec!["safety", "regulatory"]);
        assert_eq!(Impacts::all().count(), 5);
    }

    #[test]
    fn reconcile_replaces_tampered_score() {
        let actor = Actor::new("usr-1", "Dana Ortiz", Role::Engineer);
        let mut record = ChangeRequest::draft(new_request(Priority::Low, Impacts::default()), &actor);
        record.risk_score = 99;
        assert!(!record.has_consistent_risk());
        assert_eq!(record.reconcile_risk(), Some(99));
        assert_eq!(record.risk_score(), 2);
        assert_eq!(record.reconcile_risk(), None);
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let json = serde_json::json!({
            "id": "moc-00000001",
            "title": "t",
            "description": "d",
            "status": "draft",
            "priority": "medium",
            "impacts": {"safety": true},
            "risk_score": 7,
            "requested_by": "usr-1",
            "facility_id": null,
            "asset_id": null,
            "created_at": "2026-02-08T12:00:00Z",
            "updated_at": "2026-02-08T12:00:00Z"
        });
        let record: ChangeRequest = serde_json::from_value(json).unwrap();
        assert!(record.audit_log().is_empty());
        assert!(record.tasks().is_empty());
        assert!(!record.emergency_override());
        assert!(record.has_consistent_risk());
    }
}
