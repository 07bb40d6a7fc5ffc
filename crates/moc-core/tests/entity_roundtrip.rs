//! Serde roundtrip and JsonSchema validation tests for stored and exported types.

use chrono::{NaiveDate, Utc};
use moc_core::audit_detail::StatusChangedDetail;
use moc_core::audit_trail::NotificationLog;
use moc_core::entities::*;
use moc_core::enums::*;
use moc_core::identity::Actor;
use moc_core::lifecycle::Lifecycle;
use moc_core::report::ChangeReport;
use moc_core::responses::*;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn engineer() -> Actor {
    Actor::new("usr-eng", "Dana Ortiz", Role::Engineer)
}

fn manager() -> Actor {
    Actor::new("usr-mgr", "Sam Patel", Role::Manager)
}

fn busy_record() -> ChangeRequest {
    let lc = Lifecycle::default();
    let record = ChangeRequest::draft(
        NewChangeRequest {
            id: "moc-a3f8b2c1".into(),
            title: "Re-rate heat exchanger E-301".into(),
            description: "Increase design temperature to 260 C".into(),
            priority: Priority::High,
            impacts: Impacts {
                safety: true,
                operational: true,
                ..Impacts::default()
            },
            facility_id: Some("fac-north".into()),
            asset_id: Some("ast-0badf00d".into()),
        },
        &engineer(),
    );
    let record = lc
        .add_task(
            &record,
            NewTask {
                id: "tsk-1a2b3c4d".into(),
                title: "Update datasheet".into(),
                assignee: Some("usr-eng".into()),
                due_date: NaiveDate::from_ymd_opt(2026, 3, 1),
                phase: TaskPhase::Pre,
            },
            &engineer(),
        )
        .unwrap();
    let record = lc.submit(&record, &engineer()).unwrap();
    let record = lc.begin_review(&record, &manager()).unwrap();
    lc.assess_risk(&record, 3, 4, "tube creep", &manager())
        .unwrap()
}

roundtrip_and_validate!(
    audit_entry_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "moc-a3f8b2c1:1".into(),
        timestamp: Utc::now(),
        user_id: "usr-eng".into(),
        user: "Dana Ortiz".into(),
        action: AuditAction::StatusUpdate,
        details: "Status changed from draft to submitted".into(),
        transition: Some(StatusChangedDetail {
            from: ChangeStatus::Draft,
            to: ChangeStatus::Submitted,
            reason: None,
        }),
    }
);

roundtrip_and_validate!(
    global_audit_entry_roundtrip,
    GlobalAuditEntry,
    GlobalAuditEntry {
        resource_type: ResourceType::Asset,
        resource_id: "ast-0badf00d".into(),
        entry: AuditEntry {
            id: "aud-11223344".into(),
            timestamp: Utc::now(),
            user_id: "usr-adm".into(),
            user: "Kim Lee".into(),
            action: AuditAction::AssetPurged,
            details: "Decommissioned".into(),
            transition: None,
        },
    }
);

roundtrip_and_validate!(
    task_roundtrip,
    Task,
    Task::from(NewTask {
        id: "tsk-1a2b3c4d".into(),
        title: "Walkdown".into(),
        assignee: None,
        due_date: None,
        phase: TaskPhase::Post,
    })
);

roundtrip_and_validate!(
    asset_roundtrip,
    Asset,
    Asset {
        id: "ast-0badf00d".into(),
        name: "PSV-101".into(),
        facility: "fac-north".into(),
        kind: "relief_valve".into(),
        commissioned_at: NaiveDate::from_ymd_opt(2014, 6, 30),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    notification_log_roundtrip,
    NotificationLog,
    {
        let mut log = NotificationLog::new();
        log.push(Notification {
            id: "ntf-01020304".into(),
            change_id: "moc-a3f8b2c1".into(),
            message: "moc-a3f8b2c1 moved to submitted".into(),
            created_at: Utc::now(),
        });
        log
    }
);

roundtrip_and_validate!(change_request_roundtrip, ChangeRequest, busy_record());

roundtrip_and_validate!(
    emergency_change_request_roundtrip,
    ChangeRequest,
    Lifecycle::default()
        .file_emergency(
            NewChangeRequest {
                id: "moc-e0e0e0e0".into(),
                title: "Bypass trip on K-101".into(),
                description: "Faulty vibration sensor".into(),
                priority: Priority::Medium,
                impacts: Impacts::default(),
                facility_id: None,
                asset_id: None,
            },
            "unit shutdown imminent",
            &manager(),
        )
        .unwrap()
);

roundtrip_and_validate!(
    change_report_roundtrip,
    ChangeReport,
    {
        let record = busy_record();
        let history = record.audit_log().entries().to_vec();
        ChangeReport::from_record(&record, history)
    }
);

roundtrip_and_validate!(
    risk_score_response_roundtrip,
    RiskScoreResponse,
    RiskScoreResponse::for_score(19)
);

roundtrip_and_validate!(
    history_response_roundtrip,
    HistoryResponse,
    HistoryResponse {
        change_id: "moc-a3f8b2c1".into(),
        entries: busy_record().audit_log().entries().to_vec(),
    }
);

#[test]
fn change_request_keeps_score_after_roundtrip() {
    let record = busy_record();
    let json = serde_json::to_string(&record).unwrap();
    let back: ChangeRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back.status(), ChangeStatus::UnderEvaluation);
    assert_eq!(back.risk_score(), 12);
    assert_eq!(back.audit_log().len(), record.audit_log().len());
    assert!(back.has_consistent_risk());
}

#[test]
fn audit_entry_without_transition_omits_field() {
    let entry = AuditEntry {
        id: "moc-1:1".into(),
        timestamp: Utc::now(),
        user_id: "usr-1".into(),
        user: "Dana".into(),
        action: AuditAction::Comment,
        details: "ok".into(),
        transition: None,
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert!(json.get("transition").is_none());
}
