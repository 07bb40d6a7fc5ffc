//! Service layer orchestrating lifecycle operations with persistence.
//!
//! `MocService` wraps `MocDb` (raw database access) and a `Lifecycle`
//! (workflow rules). All repo methods are implemented as `impl MocService`.

use moc_core::Lifecycle;

use crate::MocDb;
use crate::error::DatabaseError;

/// Orchestrates change request mutations with the global audit log.
///
/// Every mutation method follows this protocol:
/// 1. Load the current record
/// 2. Apply the pure lifecycle operation to get the next version
/// 3. Collect the record body, new global audit rows, and any notification
///    into one `WriteBatch`
/// 4. Commit the batch in a single transaction
///
/// A refused operation writes nothing. A failed commit writes nothing and
/// leaves the stored record as it was before the call.
pub struct MocService {
    db: MocDb,
    lifecycle: Lifecycle,
}

impl MocService {
    /// Create a new service wrapping a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, lifecycle: Lifecycle) -> Result<Self, DatabaseError> {
        let db = MocDb::open_local(db_path).await?;
        Ok(Self { db, lifecycle })
    }

    /// Create from an existing `MocDb`.
    #[must_use]
    pub const fn from_db(db: MocDb, lifecycle: Lifecycle) -> Self {
        Self { db, lifecycle }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &MocDb {
        &self.db
    }

    /// Access the workflow rules.
    #[must_use]
    pub const fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}
