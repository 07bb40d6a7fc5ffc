//! Persistence seam.
//!
//! Records are stored whole, keyed by `(collection, id)`. The store knows
//! nothing about workflow rules; it only refuses to delete collections that
//! are marked permanent.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::audit_trail::NotificationLog;
use crate::entities::{Asset, ChangeRequest};
use crate::errors::CoreError;

/// A value stored as one document in a named collection.
pub trait Record: Serialize + DeserializeOwned {
    /// Collection name.
    const COLLECTION: &'static str;

    /// Whether records of this kind may be deleted.
    const DELETABLE: bool = true;

    /// Key within the collection.
    fn record_id(&self) -> &str;
}

impl Record for ChangeRequest {
    const COLLECTION: &'static str = "change_requests";
    const DELETABLE: bool = false;

    fn record_id(&self) -> &str {
        self.id()
    }
}

impl Record for Asset {
    const COLLECTION: &'static str = "assets";

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for NotificationLog {
    const COLLECTION: &'static str = "notifications";

    fn record_id(&self) -> &str {
        Self::PANEL_ID
    }
}

/// Document store for records.
///
/// Implementations must make `save` all-or-nothing: on `Err` nothing of the
/// write is visible.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// All records of a collection, oldest first.
    async fn list<R: Record>(&self) -> Result<Vec<R>, CoreError>;

    /// One record, or `None` if absent.
    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, CoreError>;

    /// Insert or replace by id.
    async fn save<R: Record>(&self, record: &R) -> Result<(), CoreError>;

    /// Remove by id. Refused for collections that are not `DELETABLE`.
    async fn delete<R: Record>(&self, id: &str) -> Result<(), CoreError>;
}

/// Guard for `RecordStore::delete` implementations.
///
/// # Errors
///
/// Returns `CoreError::NotDeletable` for permanent collections.
pub fn ensure_deletable<R: Record>() -> Result<(), CoreError> {
    if R::DELETABLE {
        Ok(())
    } else {
        Err(CoreError::NotDeletable {
            collection: R::COLLECTION,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_requests_are_permanent() {
        assert!(matches!(
            ensure_deletable::<ChangeRequest>(),
            Err(CoreError::NotDeletable {
                collection: "change_requests"
            })
        ));
        assert!(ensure_deletable::<Asset>().is_ok());
        assert!(ensure_deletable::<NotificationLog>().is_ok());
    }

    #[test]
    fn notification_panel_has_fixed_key() {
        assert_eq!(NotificationLog::new().record_id(), "panel");
    }
}
