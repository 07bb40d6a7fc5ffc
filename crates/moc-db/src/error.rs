//! Database error types for moc-db.

use moc_core::errors::{CoreError, LifecycleError};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// No stored record with this key.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// The workflow refused the operation. Nothing was written.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// A stored body could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether the error came from storage rather than a domain rejection.
    ///
    /// After a persistence failure the caller must re-fetch before retrying.
    #[must_use]
    pub const fn is_persistence_failure(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::Lifecycle(_))
    }

    pub(crate) fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<DatabaseError> for CoreError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            DatabaseError::Lifecycle(e) => Self::Lifecycle(e),
            other => Self::PersistenceFailure(other.to_string()),
        }
    }
}
