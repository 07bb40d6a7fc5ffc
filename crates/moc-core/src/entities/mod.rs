//! Entity structs for all MOC Ledger records.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`. Change
//! requests, assets, and the notification panel are stored as whole JSON
//! blobs; global audit entries get their own rows.

mod asset;
mod audit;
mod change_request;
mod notification;
mod task;

pub use asset::Asset;
pub use audit::{AuditEntry, GlobalAuditEntry};
pub use change_request::{ChangeRequest, Impacts, NewChangeRequest, RiskAssessment};
pub use notification::Notification;
pub use task::{NewTask, Task};
