//! `RecordStore` over the `records` table.

use moc_core::errors::CoreError;
use moc_core::store::{Record, RecordStore};

use crate::MocDb;
use crate::batch::WriteBatch;

impl RecordStore for MocDb {
    async fn list<R: Record>(&self) -> Result<Vec<R>, CoreError> {
        Ok(self.list_records().await?)
    }

    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, CoreError> {
        Ok(self.get_record(id).await?)
    }

    async fn save<R: Record>(&self, record: &R) -> Result<(), CoreError> {
        let mut batch = WriteBatch::new();
        batch.put(record)?;
        Ok(self.commit(batch).await?)
    }

    async fn delete<R: Record>(&self, id: &str) -> Result<(), CoreError> {
        moc_core::store::ensure_deletable::<R>()?;
        let mut batch = WriteBatch::new();
        batch.delete::<R>(id)?;
        Ok(self.commit(batch).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use moc_core::audit_trail::NotificationLog;
    use moc_core::entities::{Asset, ChangeRequest, Impacts, NewChangeRequest, Notification};
    use moc_core::enums::{Priority, Role};
    use moc_core::errors::CoreError;
    use moc_core::identity::Actor;
    use moc_core::store::RecordStore;

    use crate::MocDb;

    async fn store() -> MocDb {
        MocDb::open_local(":memory:").await.unwrap()
    }

    fn change(id: &str) -> ChangeRequest {
        ChangeRequest::draft(
            NewChangeRequest {
                id: id.into(),
                title: "Add bypass line".into(),
                description: "Around FV-12".into(),
                priority: Priority::High,
                impacts: Impacts::default(),
                facility_id: None,
                asset_id: None,
            },
            &Actor::new("usr-1", "Dana", Role::Engineer),
        )
    }

    #[tokio::test]
    async fn save_get_list() {
        let db = store().await;
        db.save(&change("moc-00000001")).await.unwrap();
        db.save(&change("moc-00000002")).await.unwrap();

        let got: Option<ChangeRequest> = db.get("moc-00000001").await.unwrap();
        assert_eq!(got.unwrap().risk_score(), 10);
        let missing: Option<ChangeRequest> = db.get("moc-ffffffff").await.unwrap();
        assert!(missing.is_none());
        assert_eq!(db.list::<ChangeRequest>().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn change_request_delete_is_refused() {
        let db = store().await;
        db.save(&change("moc-00000001")).await.unwrap();
        let err = db.delete::<ChangeRequest>("moc-00000001").await.unwrap_err();
        assert!(matches!(err, CoreError::NotDeletable { .. }));
        assert!(db.get::<ChangeRequest>("moc-00000001").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn asset_delete_and_missing_delete() {
        let db = store().await;
        let asset = Asset {
            id: "ast-00000001".into(),
            name: "V-200".into(),
            facility: "fac-south".into(),
            kind: "vessel".into(),
            commissioned_at: None,
            created_at: Utc::now(),
        };
        db.save(&asset).await.unwrap();
        db.delete::<Asset>("ast-00000001").await.unwrap();
        assert!(db.get::<Asset>("ast-00000001").await.unwrap().is_none());

        let err = db.delete::<Asset>("ast-00000001").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn notification_panel_is_a_single_document() {
        let db = store().await;
        let mut panel = NotificationLog::new();
        panel.push(Notification {
            id: "ntf-00000001".into(),
            change_id: "moc-00000001".into(),
            message: "submitted".into(),
            created_at: Utc::now(),
        });
        db.save(&panel).await.unwrap();
        db.save(&panel).await.unwrap();

        let all = db.list::<NotificationLog>().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].len(), 1);
    }
}
