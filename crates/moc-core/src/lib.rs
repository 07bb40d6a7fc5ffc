//! # moc-core
//!
//! Domain model and rules for MOC Ledger, a Management of Change tracker.
//!
//! This crate is synchronous and has no I/O:
//! - Entity structs for change requests, tasks, assets, and audit entries
//! - Status enums with state machine transitions
//! - The risk engine (quick estimate, P×S, tier classification)
//! - The change request lifecycle and its workflow policy
//! - The append-only audit trail and the clearable notification log
//! - Collaborator seams: record store, technical advisor, export report
//! - Error types and CLI response types

pub mod advisor;
pub mod audit_detail;
pub mod audit_trail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod lifecycle;
pub mod report;
pub mod responses;
pub mod risk;
pub mod store;

pub use lifecycle::{Lifecycle, WorkflowPolicy};
