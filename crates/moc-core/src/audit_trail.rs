//! Append-only audit trail and the clearable notification log.
//!
//! `AuditTrail` has no operation that edits or removes an entry. Timestamps
//! are strictly increasing within one trail, so stored order is chronological
//! on its own and never relies on a re-sort.
//!
//! `NotificationLog` is the one log with a bulk `clear`. Keeping it a separate
//! type means compliance records cannot be wiped through the same call.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audit_detail::StatusChangedDetail;
use crate::entities::{AuditEntry, Notification};
use crate::enums::AuditAction;
use crate::identity::Actor;
use crate::ids::audit_entry_id;

/// Chronological (oldest first) audit log of one change request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add one entry at the end and return the updated sequence.
    pub fn append(&mut self, entry: AuditEntry) -> &[AuditEntry] {
        self.entries.push(entry);
        &self.entries
    }

    /// Build and append the next entry for `record_id`.
    ///
    /// The timestamp is taken from the clock here, never from the caller, and
    /// is nudged forward until it is past both the last entry and
    /// `not_before` (the record's creation instant).
    pub(crate) fn record(
        &mut self,
        record_id: &str,
        not_before: DateTime<Utc>,
        actor: &Actor,
        action: AuditAction,
        details: impl Into<String>,
        transition: Option<StatusChangedDetail>,
    ) -> &AuditEntry {
        let timestamp = self.next_timestamp(Utc::now(), not_before);
        let entry = AuditEntry {
            id: audit_entry_id(record_id, self.entries.len() + 1),
            timestamp,
            user_id: actor.id.clone(),
            user: actor.name.clone(),
            action,
            details: details.into(),
            transition,
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    fn next_timestamp(&self, now: DateTime<Utc>, not_before: DateTime<Utc>) -> DateTime<Utc> {
        let floor = self
            .entries
            .last()
            .map_or(not_before, |last| last.timestamp.max(not_before));
        if now <= floor {
            floor + Duration::microseconds(1)
        } else {
            now
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuditEntry> {
        self.entries.iter()
    }

    /// Entries appended after the first `len` ones.
    #[must_use]
    pub fn since(&self, len: usize) -> &[AuditEntry] {
        self.entries.get(len..).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a AuditTrail {
    type Item = &'a AuditEntry;
    type IntoIter = std::slice::Iter<'a, AuditEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Combine a record's own history with global-log entries for display.
///
/// A global entry with the same timestamp and user as a local one is the same
/// event and is dropped. Entries within one source are never collapsed.
/// The result is chronological; ties keep local entries first. Nothing here
/// is meant to be written back.
#[must_use]
pub fn merge(local: &[AuditEntry], global: &[AuditEntry]) -> Vec<AuditEntry> {
    let mut merged: Vec<AuditEntry> = local.to_vec();
    merged.extend(
        global
            .iter()
            .filter(|g| !local.iter().any(|l| l.same_event(g)))
            .cloned(),
    );
    merged.sort_by_key(|e| e.timestamp);
    merged
}

/// Notification-panel messages, newest last.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NotificationLog {
    items: Vec<Notification>,
}

impl NotificationLog {
    /// Storage key of the single notification panel.
    pub const PANEL_ID: &'static str = "panel";

    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Administrative "clear all". Returns how many messages were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Role;
    use pretty_assertions::assert_eq;

    fn actor(id: &str) -> Actor {
        Actor::new(id, id.to_uppercase(), Role::Engineer)
    }

    fn entry_at(id: &str, user: &str, ts: &str) -> AuditEntry {
        AuditEntry {
            id: id.into(),
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
            user_id: user.into(),
            user: user.into(),
            action: AuditAction::Comment,
            details: String::new(),
            transition: None,
        }
    }

    #[test]
    fn append_returns_updated_sequence() {
        let mut trail = AuditTrail::new();
        let first = entry_at("a", "usr-1", "2026-02-08T12:00:00Z");
        assert_eq!(trail.append(first.clone()).len(), 1);
        let seq = trail.append(entry_at("b", "usr-1", "2026-02-08T12:01:00Z"));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0], first);
    }

    #[test]
    fn record_assigns_sequential_ids_and_increasing_timestamps() {
        let mut trail = AuditTrail::new();
        let who = actor("usr-1");
        for _ in 0..5 {
            trail.record("moc-1", DateTime::<Utc>::MIN_UTC, &who, AuditAction::Comment, "note", None);
        }
        let ids: Vec<_> = trail.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["moc-1:1", "moc-1:2", "moc-1:3", "moc-1:4", "moc-1:5"]);
        for pair in trail.entries().windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn record_never_goes_back_in_time() {
        let mut trail = AuditTrail::new();
        trail.append(entry_at("future", "usr-1", "2999-01-01T00:00:00Z"));
        let e = trail
            .record("moc-1", DateTime::<Utc>::MIN_UTC, &actor("usr-2"), AuditAction::Comment, "x", None)
            .clone();
        assert!(e.timestamp > trail.entries()[0].timestamp);
        assert_eq!(e.user, "USR-2");
    }

    #[test]
    fn first_entry_lands_after_creation() {
        let created = DateTime::parse_from_rfc3339("2999-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut trail = AuditTrail::new();
        let e = trail
            .record("moc-1", created, &actor("usr-1"), AuditAction::Comment, "x", None)
            .clone();
        assert!(e.timestamp > created);
    }

    #[test]
    fn since_returns_tail() {
        let mut trail = AuditTrail::new();
        let who = actor("usr-1");
        trail.record("moc-1", DateTime::<Utc>::MIN_UTC, &who, AuditAction::Comment, "one", None);
        trail.record("moc-1", DateTime::<Utc>::MIN_UTC, &who, AuditAction::Comment, "two", None);
        assert_eq!(trail.since(1).len(), 1);
        assert_eq!(trail.since(1)[0].details, "two");
        assert!(trail.since(5).is_empty());
    }

    #[test]
    fn merge_drops_global_duplicates_and_sorts() {
        let local = vec![
            entry_at("moc-1:1", "usr-1", "2026-02-08T12:00:00Z"),
            entry_at("moc-1:2", "usr-2", "2026-02-08T12:05:00Z"),
        ];
        let global = vec![
            entry_at("aud-1", "usr-1", "2026-02-08T12:00:00Z"),
            entry_at("aud-2", "usr-3", "2026-02-08T12:02:00Z"),
            entry_at("aud-3", "usr-1", "2026-02-08T12:05:00Z"),
        ];

        let merged = merge(&local, &global);
        let ids: Vec<_> = merged.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["moc-1:1", "aud-2", "moc-1:2", "aud-3"]);
    }

    #[test]
    fn merge_matches_on_instant_and_user_only() {
        let local = vec![entry_at("moc-1:1", "usr-1", "2026-02-08T12:00:00Z")];
        let mut global = entry_at("aud-1", "usr-1", "2026-02-08T12:00:00Z");
        global.action = AuditAction::TaskUpdate;

        let merged = merge(&local, &[global]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "moc-1:1");
    }

    #[test]
    fn merge_keeps_same_source_entries() {
        let local = vec![
            entry_at("moc-1:1", "usr-1", "2026-02-08T12:00:00Z"),
            entry_at("moc-1:2", "usr-1", "2026-02-08T12:00:00Z"),
        ];
        assert_eq!(merge(&local, &[]).len(), 2);
    }

    #[test]
    fn merge_does_not_touch_inputs() {
        let local = vec![entry_at("moc-1:1", "usr-1", "2026-02-08T12:00:00Z")];
        let global = vec![entry_at("aud-1", "usr-9", "2026-02-08T11:00:00Z")];
        let _ = merge(&local, &global);
        assert_eq!(local.len(), 1);
        assert_eq!(global.len(), 1);
    }

    #[test]
    fn notification_clear_empties_the_panel() {
        let mut log = NotificationLog::new();
        for i in 0..3 {
            log.push(Notification {
                id: format!("ntf-{i}"),
                change_id: "moc-1".into(),
                message: "submitted".into(),
                created_at: Utc::now(),
            });
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.clear(), 3);
        assert!(log.is_empty());
        assert_eq!(log.clear(), 0);
    }

    #[test]
    fn trail_serializes_as_plain_array() {
        let mut trail = AuditTrail::new();
        trail.append(entry_at("a", "usr-1", "2026-02-08T12:00:00Z"));
        let json = serde_json::to_value(&trail).unwrap();
        assert!(json.is_array());
        let back: AuditTrail = serde_json::from_value(json).unwrap();
        assert_eq!(back, trail);
    }
}
