//! Buffered writes committed together.
//!
//! A service mutation collects everything it needs to write (record bodies,
//! deletions, global audit rows) into a `WriteBatch`, then hands it to
//! `MocDb::commit`, which applies it inside one transaction.

use moc_core::entities::GlobalAuditEntry;
use moc_core::store::{Record, ensure_deletable};

use crate::error::DatabaseError;
use crate::helpers::format_datetime;

struct PendingPut {
    collection: &'static str,
    id: String,
    body: String,
}

struct PendingDelete {
    collection: &'static str,
    id: String,
}

/// Writes to apply atomically.
#[derive(Default)]
pub struct WriteBatch {
    puts: Vec<PendingPut>,
    deletes: Vec<PendingDelete>,
    audit: Vec<GlobalAuditEntry>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert `record` by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Serialization` if the record cannot be encoded.
    pub fn put<R: Record>(&mut self, record: &R) -> Result<(), DatabaseError> {
        self.puts.push(PendingPut {
            collection: R::COLLECTION,
            id: record.record_id().to_string(),
            body: serde_json::to_string(record)?,
        });
        Ok(())
    }

    /// Remove a record by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for permanent collections.
    pub fn delete<R: Record>(&mut self, id: &str) -> Result<(), DatabaseError> {
        ensure_deletable::<R>().map_err(|e| DatabaseError::InvalidState(e.to_string()))?;
        self.deletes.push(PendingDelete {
            collection: R::COLLECTION,
            id: id.to_string(),
        });
        Ok(())
    }

    /// Append a row to the global audit log.
    pub fn audit(&mut self, entry: GlobalAuditEntry) {
        self.audit.push(entry);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.deletes.is_empty() && self.audit.is_empty()
    }

    /// Execute every statement on `conn`. The caller owns the transaction.
    pub(crate) async fn apply(
        self,
        conn: &libsql::Connection,
        now: String,
    ) -> Result<(), DatabaseError> {
        for put in &self.puts {
            conn.execute(
                "INSERT INTO records (collection, id, body, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT (collection, id) DO UPDATE
                 SET body = excluded.body, updated_at = excluded.updated_at",
                libsql::params![put.collection, put.id.as_str(), put.body.as_str(), now.as_str()],
            )
            .await?;
        }

        for delete in &self.deletes {
            let affected = conn
                .execute(
                    "DELETE FROM records WHERE collection = ?1 AND id = ?2",
                    libsql::params![delete.collection, delete.id.as_str()],
                )
                .await?;
            if affected == 0 {
                return Err(DatabaseError::not_found(delete.collection, &delete.id));
            }
        }

        for row in &self.audit {
            let transition = row
                .entry
                .transition
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            conn.execute(
                "INSERT INTO audit_log
                 (id, resource_type, resource_id, action, user_id, user_name, details, transition, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    row.entry.id.as_str(),
                    row.resource_type.as_str(),
                    row.resource_id.as_str(),
                    row.entry.action.as_str(),
                    row.entry.user_id.as_str(),
                    row.entry.user.as_str(),
                    row.entry.details.as_str(),
                    transition.as_deref(),
                    format_datetime(row.entry.timestamp)
                ],
            )
            .await?;
        }

        tracing::debug!(
            puts = self.puts.len(),
            deletes = self.deletes.len(),
            audit = self.audit.len(),
            "write batch applied"
        );
        Ok(())
    }
}
