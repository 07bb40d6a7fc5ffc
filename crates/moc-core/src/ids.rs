//! ID prefixes for stored records.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated by `moc-db` with
//! `randomblob(4)`. Audit entries embedded in a change request use
//! `{change_id}:{seq}` instead, assigned by the audit trail itself.

pub const PREFIX_CHANGE: &str = "moc";
pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_AUDIT: &str = "aud";
pub const PREFIX_ASSET: &str = "ast";
pub const PREFIX_NOTIFICATION: &str = "ntf";

pub const ALL_PREFIXES: [&str; 5] = [
    PREFIX_CHANGE,
    PREFIX_TASK,
    PREFIX_AUDIT,
    PREFIX_ASSET,
    PREFIX_NOTIFICATION,
];

/// Format the ID of the `seq`-th entry (1-based) in a record's audit log.
#[must_use]
pub fn audit_entry_id(record_id: &str, seq: usize) -> String {
    format!("{record_id}:{seq}")
}
