//! # moc-db
//!
//! libSQL persistence for MOC Ledger.
//!
//! Change requests, assets, and the notification panel are stored as whole
//! JSON documents in `records`. The global audit log is a separate
//! insert-only table. Every service mutation is written as one [`WriteBatch`]
//! inside a single transaction.

pub mod batch;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod store;
mod test_support;

pub use batch::WriteBatch;
pub use service::MocService;

use chrono::Utc;
use libsql::Builder;
use moc_core::store::Record;

use error::DatabaseError;
use helpers::format_datetime;

/// Central database handle.
///
/// Wraps a libSQL database and connection. Provides ID generation, raw
/// document access, and atomic batch commits.
pub struct MocDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl MocDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let moc_db = Self { db, conn };
        moc_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(moc_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"moc-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Fetch one stored document.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the body does not decode.
    pub async fn get_record<R: Record>(&self, id: &str) -> Result<Option<R>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT body FROM records WHERE collection = ?1 AND id = ?2",
                [R::COLLECTION, id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(decode::<R>(&row.get::<String>(0)?)?)),
            None => Ok(None),
        }
    }

    /// All documents of a collection, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a body does not decode.
    pub async fn list_records<R: Record>(&self) -> Result<Vec<R>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT body FROM records WHERE collection = ?1 ORDER BY created_at, rowid",
                [R::COLLECTION],
            )
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(decode::<R>(&row.get::<String>(0)?)?);
        }
        Ok(records)
    }

    /// Apply every write of `batch` in one transaction.
    ///
    /// On any error the transaction is rolled back and nothing is visible.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` from the first failing statement or the commit.
    pub async fn commit(&self, batch: WriteBatch) -> Result<(), DatabaseError> {
        if batch.is_empty() {
            return Ok(());
        }
        let tx = self.conn.transaction().await?;
        match batch.apply(&tx, format_datetime(Utc::now())).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(error) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(%rollback, "rollback after failed batch also failed");
                }
                Err(error)
            }
        }
    }
}

fn decode<R: Record>(body: &str) -> Result<R, DatabaseError> {
    serde_json::from_str(body).map_err(|e| {
        DatabaseError::InvalidState(format!("undecodable {} body: {e}", R::COLLECTION))
    })
}
