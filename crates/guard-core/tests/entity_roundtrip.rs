//! Serde roundtrip and JsonSchema validation tests for wire-facing types.

use chrono::{TimeZone, Utc};
use schemars::schema_for;
use guard_core::entities::*;
use guard_core::enums::*;
use guard_core::responses::*;
use guard_core::snapshot::*;

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

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

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

fn account() -> CloudAccount {
    CloudAccount {
        id: 3,
        provider: Provider::Aws,
        external_id: "111122223333".into(),
        display_name: "Production".into(),
        status: AccountStatus::Connected,
        owner_id: Some(1),
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
        last_sync_at: None,
    }
}

fn policy() -> Policy {
    Policy {
        id: 9,
        provider: Provider::Aws,
        name: "Root account MFA".into(),
        control_id: "CIS-1.1".into(),
        category: "Identity".into(),
        severity: PolicySeverity::Critical,
        description: Some("Root user must have MFA enabled".into()),
    }
}

roundtrip_and_validate!(cloud_account_roundtrip, CloudAccount, account());

roundtrip_and_validate!(policy_roundtrip, Policy, policy());

roundtrip_and_validate!(
    notification_roundtrip,
    Notification,
    Notification {
        id: 1,
        title: "Building connectors".into(),
        message: "Linking IAM roles".into(),
        notification_type: NotificationType::Provisioning,
        is_read: false,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    evaluation_detail_roundtrip,
    EvaluationDetail,
    EvaluationDetail {
        evaluation: PolicyEvaluation {
            id: 4,
            policy_id: 9,
            account_id: 3,
            status: ComplianceStatus::NonCompliant,
            last_checked_at: Utc::now(),
            findings: Some("MFA disabled on root".into()),
        },
        policy: PolicySummary::from(&policy()),
        account: AccountSummary::from(&account()),
    }
);

roundtrip_and_validate!(
    dashboard_snapshot_roundtrip,
    DashboardSnapshot,
    DashboardSnapshot::from_facts([
        EvaluationFact {
            provider: Provider::Aws,
            account_id: 3,
            status: ComplianceStatus::Compliant,
        },
        EvaluationFact {
            provider: Provider::Azure,
            account_id: 4,
            status: ComplianceStatus::Unknown,
        },
    ])
);

#[test]
fn notification_type_serializes_as_type_field() {
    let json = serde_json::json!({
        "id": 1,
        "title": "Manual sync requested",
        "message": "Production is syncing now.",
        "type": "account_sync",
        "is_read": true,
        "created_at": "2026-01-15T10:30:00Z"
    });
    let notification: Notification = serde_json::from_value(json).unwrap();
    assert_eq!(notification.notification_type, NotificationType::AccountSync);
    assert!(notification.is_read);
}

#[test]
fn evaluation_detail_flattens_evaluation_fields() {
    let detail = EvaluationDetail {
        evaluation: PolicyEvaluation {
            id: 4,
            policy_id: 9,
            account_id: 3,
            status: ComplianceStatus::Unknown,
            last_checked_at: Utc::now(),
            findings: None,
        },
        policy: PolicySummary::from(&policy()),
        account: AccountSummary::from(&account()),
    };
    let value = serde_json::to_value(&detail).unwrap();
    assert_eq!(value["status"], "unknown");
    assert_eq!(value["policy"]["control_id"], "CIS-1.1");
    assert_eq!(value["account"]["external_id"], "111122223333");
}

#[test]
fn user_profile_omits_password_hash() {
    let user = User {
        id: 1,
        email: "ops@example.com".into(),
        full_name: "Ops".into(),
        password_hash: "$argon2id$secret".into(),
        is_active: true,
        created_at: Utc::now(),
    };
    let value = serde_json::to_value(UserProfile::from(&user)).unwrap();
    assert!(value.get("password_hash").is_none());
    assert_eq!(value["email"], "ops@example.com");
}
