//! Change request repository: creation, lookup, and every workflow mutation.

use chrono::{NaiveDate, Utc};

use moc_core::audit_trail::NotificationLog;
use moc_core::entities::{
    Asset, AuditEntry, ChangeRequest, GlobalAuditEntry, Impacts, NewChangeRequest, NewTask,
    Notification,
};
use moc_core::enums::{AuditAction, ChangeStatus, Priority, ResourceType, TaskPhase, TaskStatus};
use moc_core::identity::Actor;
use moc_core::ids::{PREFIX_AUDIT, PREFIX_CHANGE, PREFIX_NOTIFICATION, PREFIX_TASK};
use moc_core::lifecycle::{DetailsUpdate, Transition};

use crate::batch::WriteBatch;
use crate::error::DatabaseError;
use crate::service::MocService;

const ENTITY: &str = "change_request";

/// Input for opening a change request. The ID is generated on create.
#[derive(Debug, Clone)]
pub struct NewChange {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub impacts: Impacts,
    pub facility_id: Option<String>,
    pub asset_id: Option<String>,
}

impl NewChange {
    fn with_id(self, id: String) -> NewChangeRequest {
        NewChangeRequest {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            impacts: self.impacts,
            facility_id: self.facility_id,
            asset_id: self.asset_id,
        }
    }
}

/// Input for adding a checklist task. The ID is generated on create.
#[derive(Debug, Clone)]
pub struct NewChecklistTask {
    pub title: String,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub phase: TaskPhase,
}

/// Filter criteria for listing change requests.
#[derive(Debug, Default)]
pub struct ChangeFilter {
    pub status: Option<ChangeStatus>,
    pub priority: Option<Priority>,
    pub facility_id: Option<String>,
    pub limit: Option<u32>,
}

impl ChangeFilter {
    fn matches(&self, record: &ChangeRequest) -> bool {
        self.status.is_none_or(|s| record.status() == s)
            && self.priority.is_none_or(|p| record.priority() == p)
            && self
                .facility_id
                .as_deref()
                .is_none_or(|f| record.facility_id() == Some(f))
    }
}

impl MocService {
    /// Open a new change request in `draft`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the referenced asset does not exist,
    /// or `DatabaseError` if the write fails.
    pub async fn create_change(
        &self,
        new: NewChange,
        actor: &Actor,
    ) -> Result<ChangeRequest, DatabaseError> {
        self.ensure_asset(new.asset_id.as_deref()).await?;
        let id = self.db().generate_id(PREFIX_CHANGE).await?;
        let record = ChangeRequest::draft(new.with_id(id), actor);

        let mut batch = WriteBatch::new();
        batch.put(&record)?;
        batch.audit(self.created_entry(&record, actor).await?);
        self.db().commit(batch).await?;

        tracing::debug!(id = record.id(), score = record.risk_score(), "change request created");
        Ok(record)
    }

    /// Open an emergency fast-track change directly in `submitted`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` without a justification, or
    /// `DatabaseError` if the write fails.
    pub async fn file_emergency(
        &self,
        new: NewChange,
        justification: &str,
        actor: &Actor,
    ) -> Result<(ChangeRequest, Notification), DatabaseError> {
        self.ensure_asset(new.asset_id.as_deref()).await?;
        let id = self.db().generate_id(PREFIX_CHANGE).await?;
        let record = self
            .lifecycle()
            .file_emergency(new.with_id(id), justification, actor)?;

        let mut batch = WriteBatch::new();
        batch.audit(self.created_entry(&record, actor).await?);
        let notification = self.stage_change(&mut batch, 0, &record).await?;
        self.db().commit(batch).await?;

        tracing::warn!(id = record.id(), "emergency change filed");
        Ok((record, notification))
    }

    /// Load a change request.
    ///
    /// A stored score that disagrees with its inputs is replaced by the derived
    /// one in the returned value.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no record has this ID.
    pub async fn get_change(&self, id: &str) -> Result<ChangeRequest, DatabaseError> {
        let mut record = self
            .db()
            .get_record::<ChangeRequest>(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(ENTITY, id))?;
        if let Some(stale) = record.reconcile_risk() {
            tracing::warn!(
                id,
                stale,
                derived = record.risk_score(),
                "stored risk score disagreed with its inputs"
            );
        }
        Ok(record)
    }

    /// Change requests matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_changes(
        &self,
        filter: &ChangeFilter,
    ) -> Result<Vec<ChangeRequest>, DatabaseError> {
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        let mut records = self.db().list_records::<ChangeRequest>().await?;
        records.reverse();
        Ok(records
            .into_iter()
            .filter(|r| filter.matches(r))
            .take(limit)
            .map(|mut r| {
                r.reconcile_risk();
                r
            })
            .collect())
    }

    /// Apply a status transition and raise its notification.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` if the workflow refuses, or
    /// `DatabaseError` if the write fails. Nothing is written in either case.
    pub async fn transition(
        &self,
        id: &str,
        transition: &Transition,
        actor: &Actor,
    ) -> Result<(ChangeRequest, Notification), DatabaseError> {
        let current = self.get_change(id).await?;
        let next = self.lifecycle().apply(&current, transition, actor)?;

        let mut batch = WriteBatch::new();
        let notification = self
            .stage_change(&mut batch, current.audit_log().len(), &next)
            .await?;
        self.db().commit(batch).await?;

        tracing::debug!(id, from = %current.status(), to = %next.status(), "transition saved");
        Ok((next, notification))
    }

    /// Edit draft details.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` if the record is not editable.
    pub async fn edit_change(
        &self,
        id: &str,
        update: &DetailsUpdate,
        actor: &Actor,
    ) -> Result<ChangeRequest, DatabaseError> {
        let current = self.get_change(id).await?;
        let next = self.lifecycle().edit_details(&current, update, actor)?;
        self.save_quietly(&current, &next).await?;
        Ok(next)
    }

    /// Attach a P×S assessment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` for bad ratings or closed records.
    pub async fn assess_risk(
        &self,
        id: &str,
        probability: i64,
        severity: i64,
        rationale: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, DatabaseError> {
        let current = self.get_change(id).await?;
        let next = self
            .lifecycle()
            .assess_risk(&current, probability, severity, rationale, actor)?;
        self.save_quietly(&current, &next).await?;
        Ok(next)
    }

    /// Add a free-form comment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` for empty text.
    pub async fn add_comment(
        &self,
        id: &str,
        text: &str,
        actor: &Actor,
    ) -> Result<ChangeRequest, DatabaseError> {
        let current = self.get_change(id).await?;
        let next = self.lifecycle().add_comment(&current, text, actor)?;
        self.save_quietly(&current, &next).await?;
        Ok(next)
    }

    /// Add a checklist task. Returns the updated record and the new task ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` for closed records or empty titles.
    pub async fn add_task(
        &self,
        id: &str,
        task: NewChecklistTask,
        actor: &Actor,
    ) -> Result<(ChangeRequest, String), DatabaseError> {
        let current = self.get_change(id).await?;
        let task_id = self.db().generate_id(PREFIX_TASK).await?;
        let next = self.lifecycle().add_task(
            &current,
            NewTask {
                id: task_id.clone(),
                title: task.title,
                assignee: task.assignee,
                due_date: task.due_date,
                phase: task.phase,
            },
            actor,
        )?;
        self.save_quietly(&current, &next).await?;
        Ok((next, task_id))
    }

    /// Move a checklist task to `status`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` for unknown tasks or invalid moves.
    pub async fn set_task_status(
        &self,
        id: &str,
        task_id: &str,
        status: TaskStatus,
        actor: &Actor,
    ) -> Result<ChangeRequest, DatabaseError> {
        let current = self.get_change(id).await?;
        let next = self
            .lifecycle()
            .set_task_status(&current, task_id, status, actor)?;
        self.save_quietly(&current, &next).await?;
        Ok(next)
    }

    /// Save a mutation that raises no notification.
    async fn save_quietly(
        &self,
        current: &ChangeRequest,
        next: &ChangeRequest,
    ) -> Result<(), DatabaseError> {
        let mut batch = WriteBatch::new();
        self.stage_record(&mut batch, current.audit_log().len(), next)
            .await?;
        self.db().commit(batch).await
    }

    /// Stage the record body and a global copy of each entry after `seen`.
    async fn stage_record(
        &self,
        batch: &mut WriteBatch,
        seen: usize,
        next: &ChangeRequest,
    ) -> Result<(), DatabaseError> {
        batch.put(next)?;
        for entry in next.audit_log().since(seen) {
            let copy = self
                .global_copy(ResourceType::ChangeRequest, next.id(), entry)
                .await?;
            batch.audit(copy);
        }
        Ok(())
    }

    /// Stage the record plus a notification about its new status.
    async fn stage_change(
        &self,
        batch: &mut WriteBatch,
        seen: usize,
        next: &ChangeRequest,
    ) -> Result<Notification, DatabaseError> {
        self.stage_record(batch, seen, next).await?;

        let notification = Notification {
            id: self.db().generate_id(PREFIX_NOTIFICATION).await?,
            change_id: next.id().to_string(),
            message: notification_message(next),
            created_at: Utc::now(),
        };
        let mut panel: NotificationLog = self.notifications().await?;
        panel.push(notification.clone());
        batch.put(&panel)?;
        Ok(notification)
    }

    async fn created_entry(
        &self,
        record: &ChangeRequest,
        actor: &Actor,
    ) -> Result<GlobalAuditEntry, DatabaseError> {
        let entry = AuditEntry {
            id: self.db().generate_id(PREFIX_AUDIT).await?,
            timestamp: record.created_at(),
            user_id: actor.id.clone(),
            user: actor.name.clone(),
            action: AuditAction::Created,
            details: format!("Created change request \"{}\"", record.title()),
            transition: None,
        };
        Ok(GlobalAuditEntry {
            resource_type: ResourceType::ChangeRequest,
            resource_id: record.id().to_string(),
            entry,
        })
    }

    async fn ensure_asset(&self, asset_id: Option<&str>) -> Result<(), DatabaseError> {
        if let Some(asset_id) = asset_id {
            if self.db().get_record::<Asset>(asset_id).await?.is_none() {
                return Err(DatabaseError::not_found("asset", asset_id));
            }
        }
        Ok(())
    }
}

fn notification_message(record: &ChangeRequest) -> String {
    if record.emergency_override() && record.status() != ChangeStatus::Completed {
        format!(
            "EMERGENCY {}: \"{}\" is now {}",
            record.id(),
            record.title(),
            record.status()
        )
    } else {
        format!(
            "{}: \"{}\" is now {}",
            record.id(),
            record.title(),
            record.status()
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{create_test_change, engineer, manager, test_service};
    use moc_core::errors::LifecycleError;

    #[tokio::test]
    async fn create_persists_draft_with_created_row() {
        let svc = test_service().await;
        let change = create_test_change(&svc).await;
        assert!(change.id().starts_with("moc-"));
        assert_eq!(change.status(), ChangeStatus::Draft);
        assert_eq!(change.risk_score(), 5);

        let loaded = svc.get_change(change.id()).await.unwrap();
        assert_eq!(loaded, change);

        let history = svc.history(change.id()).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, AuditAction::Created);
    }

    #[tokio::test]
    async fn transition_saves_and_notifies() {
        let svc = test_service().await;
        let change = create_test_change(&svc).await;

        let (submitted, notification) = svc
            .transition(change.id(), &Transition::Submit, &engineer())
            .await
            .unwrap();
        assert_eq!(submitted.status(), ChangeStatus::Submitted);
        assert!(notification.message.ends_with("is now submitted"));

        let loaded = svc.get_change(change.id()).await.unwrap();
        assert_eq!(loaded.status(), ChangeStatus::Submitted);
        assert_eq!(loaded.audit_log().len(), 1);
        assert_eq!(svc.notifications().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refused_transition_writes_nothing() {
        let svc = test_service().await;
        let change = create_test_change(&svc).await;

        let err = svc
            .transition(change.id(), &Transition::Approve, &manager())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Lifecycle(LifecycleError::InvalidTransition { .. })
        ));
        assert!(!err.is_persistence_failure());

        let loaded = svc.get_change(change.id()).await.unwrap();
        assert_eq!(loaded, change);
        assert!(svc.notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_commit_leaves_record_and_panel_untouched() {
        let svc = test_service().await;
        let change = create_test_change(&svc).await;
        svc.db()
            .conn()
            .execute(
                "CREATE TRIGGER refuse_status_rows BEFORE INSERT ON audit_log
                 WHEN NEW.action = 'status_update'
                 BEGIN SELECT RAISE(ABORT, 'audit store offline'); END",
                (),
            )
            .await
            .unwrap();

        let err = svc
            .transition(change.id(), &Transition::Submit, &engineer())
            .await
            .unwrap_err();
        assert!(err.is_persistence_failure());

        let loaded = svc.get_change(change.id()).await.unwrap();
        assert_eq!(loaded.status(), ChangeStatus::Draft);
        assert!(loaded.audit_log().is_empty());
        assert!(svc.notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_change_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .transition("moc-ffffffff", &Transition::Submit, &engineer())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn missing_asset_blocks_create() {
        let svc = test_service().await;
        let err = svc
            .create_change(
                NewChange {
                    title: "t".into(),
                    description: "d".into(),
                    priority: Priority::Low,
                    impacts: Impacts::default(),
                    facility_id: None,
                    asset_id: Some("ast-00000000".into()),
                },
                &engineer(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { ref entity_type, .. } if entity_type == "asset"));
        assert!(svc.list_changes(&ChangeFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn emergency_filing_is_submitted_and_pinned() {
        let svc = test_service().await;
        let (record, notification) = svc
            .file_emergency(
                NewChange {
                    title: "Clamp leaking flange".into(),
                    description: "Line 4 hydrocarbon weep".into(),
                    priority: Priority::Low,
                    impacts: Impacts::default(),
                    facility_id: None,
                    asset_id: None,
                },
                "active leak",
                &manager(),
            )
            .await
            .unwrap();
        assert_eq!(record.status(), ChangeStatus::Submitted);
        assert_eq!(record.risk_score(), 25);
        assert!(notification.message.starts_with("EMERGENCY"));

        let loaded = svc.get_change(record.id()).await.unwrap();
        assert_eq!(loaded.audit_log().len(), 1);
        let history = svc.history(record.id()).await.unwrap();
        let actions: Vec<_> = history.iter().map(|e| e.action).collect();
        assert_eq!(actions, [AuditAction::Created, AuditAction::EmergencyOverride]);
        assert!(history[1].timestamp > history[0].timestamp);
    }

    #[tokio::test]
    async fn tasks_and_comments_do_not_notify() {
        let svc = test_service().await;
        let change = create_test_change(&svc).await;
        let (with_task, task_id) = svc
            .add_task(
                change.id(),
                NewChecklistTask {
                    title: "Isolate and drain".into(),
                    assignee: None,
                    due_date: None,
                    phase: TaskPhase::Pre,
                },
                &engineer(),
            )
            .await
            .unwrap();
        assert!(task_id.starts_with("tsk-"));
        assert_eq!(with_task.tasks().len(), 1);

        svc.set_task_status(change.id(), &task_id, TaskStatus::InProgress, &engineer())
            .await
            .unwrap();
        let commented = svc
            .add_comment(change.id(), "scaffold ordered", &engineer())
            .await
            .unwrap();
        assert_eq!(commented.audit_log().len(), 3);
        assert!(svc.notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tampered_score_is_reconciled_on_load() {
        let svc = test_service().await;
        let change = create_test_change(&svc).await;
        svc.db()
            .conn()
            .execute(
                "UPDATE records SET body = json_set(body, '$.risk_score', 99) WHERE id = ?1",
                [change.id()],
            )
            .await
            .unwrap();

        let loaded = svc.get_change(change.id()).await.unwrap();
        assert_eq!(loaded.risk_score(), 5);
    }

    #[tokio::test]
    async fn list_filters_and_limits() {
        let svc = test_service().await;
        let first = create_test_change(&svc).await;
        let second = create_test_change(&svc).await;
        create_test_change(&svc).await;
        svc.transition(first.id(), &Transition::Submit, &engineer())
            .await
            .unwrap();

        let submitted = svc
            .list_changes(&ChangeFilter {
                status: Some(ChangeStatus::Submitted),
                ..ChangeFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].id(), first.id());

        let limited = svc
            .list_changes(&ChangeFilter {
                limit: Some(2),
                ..ChangeFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_ne!(limited[1].id(), first.id());
        assert!(limited.iter().any(|r| r.id() == second.id()));
    }
}
