//! Error types for the MOC core.
//!
//! Each unit has its own enum so callers can match on exactly what can fail:
//! `RiskError` for scoring input, `LifecycleError` for workflow rejections.
//! `CoreError` is the crate-wide union used at collaborator seams. Storage
//! errors live in `moc-db`; everything converges into `anyhow` in `moc-cli`.

use thiserror::Error;

use crate::enums::{ChangeStatus, Role, TaskStatus};

/// Rejected input to the risk engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    /// Probability or severity outside `1..=5`.
    #[error("Invalid score input: {field} must be between 1 and 5, got {value}")]
    InvalidScoreInput { field: &'static str, value: i64 },
}

/// A lifecycle operation was refused. The record passed in is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The requested status change is not an edge of the workflow.
    #[error("Invalid state transition: change request {id} from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: ChangeStatus,
        to: ChangeStatus,
    },

    /// Reject, revision, and emergency transitions need justification text.
    #[error("A reason is required to {transition}")]
    MissingReason { transition: &'static str },

    /// The acting role has no approval authority.
    #[error("{actor} ({role}) is not authorized to {action}")]
    Unauthorized {
        actor: String,
        role: Role,
        action: &'static str,
    },

    /// A gate condition of the transition is not met.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Record content failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record is in a terminal state and refuses the mutation.
    #[error("Change request {id} is closed ({status})")]
    RecordClosed { id: String, status: ChangeStatus },

    /// No task with this id on the record.
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    /// Task status change not allowed by the task state machine.
    #[error("Invalid task transition: {id} from {from} to {to}")]
    InvalidTaskTransition {
        id: String,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error(transparent)]
    Risk(#[from] RiskError),
}

/// Errors that can be raised across the core and its collaborators.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Risk(#[from] RiskError),

    /// Deleting from a permanent collection.
    #[error("Records in {collection} cannot be deleted")]
    NotDeletable { collection: &'static str },

    /// Save or delete failed; the in-memory record must not be assumed saved.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
