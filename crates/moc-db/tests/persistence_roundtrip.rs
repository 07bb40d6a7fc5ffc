//! Persistence integration tests over a file-backed database.
//!
//! - Reopen: status, score, log length, and tasks survive a restart
//! - Export: JSONL history reads back entry for entry
//! - Store trait: generic access through `RecordStore`

use tempfile::TempDir;

use moc_core::Lifecycle;
use moc_core::entities::{AuditEntry, ChangeRequest, Impacts};
use moc_core::enums::{AuditAction, ChangeStatus, Priority, Role, TaskPhase};
use moc_core::errors::CoreError;
use moc_core::identity::Actor;
use moc_core::lifecycle::Transition;
use moc_core::store::RecordStore;
use moc_db::MocDb;
use moc_db::repos::change::{NewChange, NewChecklistTask};
use moc_db::service::MocService;

fn engineer() -> Actor {
    Actor::new("usr-eng", "Dana Ortiz", Role::Engineer)
}

fn manager() -> Actor {
    Actor::new("usr-mgr", "Sam Patel", Role::Manager)
}

fn high_priority_safety_change() -> NewChange {
    NewChange {
        title: "Bypass high-level trip LSHH-310".into(),
        description: "Temporary bypass during transmitter swap".into(),
        priority: Priority::High,
        impacts: Impacts {
            safety: true,
            ..Impacts::default()
        },
        facility_id: Some("fac-south".into()),
        asset_id: None,
    }
}

async fn open(dir: &TempDir) -> MocService {
    let path = dir.path().join("moc.db");
    MocService::new_local(&path.to_string_lossy(), Lifecycle::default())
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Reopen
// ---------------------------------------------------------------------------

#[tokio::test]
async fn record_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let svc = open(&dir).await;
        let change = svc
            .create_change(high_priority_safety_change(), &engineer())
            .await
            .unwrap();
        svc.add_task(
            change.id(),
            NewChecklistTask {
                title: "Issue bypass permit".into(),
                assignee: Some("usr-eng".into()),
                due_date: None,
                phase: TaskPhase::Pre,
            },
            &engineer(),
        )
        .await
        .unwrap();
        svc.transition(change.id(), &Transition::Submit, &engineer())
            .await
            .unwrap();
        svc.transition(change.id(), &Transition::BeginReview, &manager())
            .await
            .unwrap();
        change.id().to_string()
    };

    let svc = open(&dir).await;
    let loaded = svc.get_change(&id).await.unwrap();
    assert_eq!(loaded.status(), ChangeStatus::UnderEvaluation);
    assert_eq!(loaded.risk_score(), 12);
    assert_eq!(loaded.audit_log().len(), 3);
    assert_eq!(loaded.tasks().len(), 1);
    assert_eq!(loaded.open_pre_tasks(), 1);
    assert_eq!(svc.notifications().await.unwrap().len(), 2);
    assert_eq!(svc.history(&id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn close_out_blocked_by_open_pre_task_after_reopen() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir).await;
    let change = svc
        .create_change(high_priority_safety_change(), &engineer())
        .await
        .unwrap();
    svc.add_task(
        change.id(),
        NewChecklistTask {
            title: "Walkdown".into(),
            assignee: None,
            due_date: None,
            phase: TaskPhase::Pre,
        },
        &engineer(),
    )
    .await
    .unwrap();
    for (step, actor) in [
        (Transition::Submit, engineer()),
        (Transition::BeginReview, manager()),
        (Transition::Approve, manager()),
        (Transition::StartImplementation, manager()),
    ] {
        svc.transition(change.id(), &step, &actor).await.unwrap();
    }
    drop(svc);

    let svc = open(&dir).await;
    let err = svc
        .transition(change.id(), &Transition::CloseOut, &manager())
        .await
        .unwrap_err();
    assert!(!err.is_persistence_failure());
    let loaded = svc.get_change(change.id()).await.unwrap();
    assert_eq!(loaded.status(), ChangeStatus::Implementation);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exported_history_reads_back() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir).await;
    let change = svc
        .create_change(high_priority_safety_change(), &engineer())
        .await
        .unwrap();
    svc.transition(change.id(), &Transition::Submit, &engineer())
        .await
        .unwrap();
    svc.transition(
        change.id(),
        &Transition::EmergencyBypass {
            justification: "trip valve stuck open".into(),
        },
        &manager(),
    )
    .await
    .unwrap();

    let path = dir.path().join("exports").join(format!("{}.jsonl", change.id()));
    let written = svc.export_history(change.id(), &path).await.unwrap();
    assert_eq!(written, 3);

    let read: Vec<AuditEntry> = serde_jsonlines::json_lines(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(read, svc.history(change.id()).await.unwrap());
    assert_eq!(read[0].action, AuditAction::Created);
    assert_eq!(read[2].action, AuditAction::EmergencyOverride);
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generic_store_refuses_change_request_delete() {
    let db = MocDb::open_local(":memory:").await.unwrap();
    let svc = MocService::from_db(db, Lifecycle::default());
    let change = svc
        .create_change(high_priority_safety_change(), &engineer())
        .await
        .unwrap();

    let store = svc.db();
    let listed: Vec<ChangeRequest> = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);

    let err = store.delete::<ChangeRequest>(change.id()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotDeletable { .. }));
    assert!(store.get::<ChangeRequest>(change.id()).await.unwrap().is_some());
}
