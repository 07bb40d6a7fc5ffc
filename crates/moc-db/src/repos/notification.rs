//! Notification panel repository.
//!
//! The panel is a single `NotificationLog` document. Clearing it is the only
//! bulk removal in the system and never touches any audit log.

use moc_core::audit_trail::NotificationLog;
use moc_core::identity::Actor;

use crate::batch::WriteBatch;
use crate::error::DatabaseError;
use crate::repos::require_admin;
use crate::service::MocService;

impl MocService {
    /// Current notification panel, empty if never written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn notifications(&self) -> Result<NotificationLog, DatabaseError> {
        Ok(self
            .db()
            .get_record::<NotificationLog>(NotificationLog::PANEL_ID)
            .await?
            .unwrap_or_default())
    }

    /// Administrative "clear all". Returns how many messages were removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` (unauthorized) for non-admins, or
    /// `DatabaseError` if the write fails.
    pub async fn clear_notifications(&self, actor: &Actor) -> Result<usize, DatabaseError> {
        require_admin(actor, "clear notifications")?;
        let mut panel = self.notifications().await?;
        let removed = panel.clear();
        if removed > 0 {
            let mut batch = WriteBatch::new();
            batch.put(&panel)?;
            self.db().commit(batch).await?;
        }
        tracing::debug!(removed, actor = %actor.id, "notification panel cleared");
        Ok(removed)
    }
}
