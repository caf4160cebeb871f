//! Demo dataset loaded at startup when `demo_seed` is enabled.
//!
//! Every record is inserted on its own. A record that collides with an
//! existing unique key is skipped, so running the seed again is harmless.
//! Seeded accounts do not go through the provisioning cascade.

use guard_core::enums::{AccountStatus, ComplianceStatus, PolicySeverity, Provider};

use crate::error::DatabaseError;
use crate::inputs::{AccountCreate, EvaluationCreate, PolicyCreate};
use crate::repos::account::insert_account;
use crate::repos::evaluation::insert_evaluation;
use crate::repos::policy::insert_policy;
use crate::service::GuardService;

/// Counts of rows actually written by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub policies: u32,
    pub accounts: u32,
    pub evaluations: u32,
    pub skipped: u32,
}

struct SeedPolicy {
    provider: Provider,
    name: &'static str,
    control_id: &'static str,
    category: &'static str,
    severity: PolicySeverity,
    description: &'static str,
}

const POLICIES: &[SeedPolicy] = &[
    SeedPolicy {
        provider: Provider::Aws,
        name: "Root account MFA enabled",
        control_id: "CIS-1.5",
        category: "Identity",
        severity: PolicySeverity::Critical,
        description: "The root user must have multi-factor authentication enabled.",
    },
    SeedPolicy {
        provider: Provider::Aws,
        name: "CloudTrail enabled in all regions",
        control_id: "CIS-3.1",
        category: "Logging",
        severity: PolicySeverity::High,
        description: "A multi-region trail must capture management events.",
    },
    SeedPolicy {
        provider: Provider::Azure,
        name: "Storage accounts require secure transfer",
        control_id: "AZ-3.1",
        category: "Storage",
        severity: PolicySeverity::Medium,
        description: "Only HTTPS requests are accepted by storage accounts.",
    },
    SeedPolicy {
        provider: Provider::Gcp,
        name: "Uniform bucket-level access",
        control_id: "GCP-5.2",
        category: "Storage",
        severity: PolicySeverity::High,
        description: "Cloud Storage buckets use uniform IAM access control.",
    },
];

struct SeedAccount {
    provider: Provider,
    external_id: &'static str,
    display_name: &'static str,
    status: AccountStatus,
}

const ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        provider: Provider::Aws,
        external_id: "111122223333",
        display_name: "Production AWS",
        status: AccountStatus::Connected,
    },
    SeedAccount {
        provider: Provider::Azure,
        external_id: "00000000-0000-4000-8000-000000000001",
        display_name: "Corporate Azure",
        status: AccountStatus::Pending,
    },
];

/// (policy provider, control id, account external id, status, findings)
const EVALUATIONS: &[(Provider, &str, &str, ComplianceStatus, Option<&str>)] = &[
    (
        Provider::Aws,
        "CIS-1.5",
        "111122223333",
        ComplianceStatus::Compliant,
        None,
    ),
    (
        Provider::Aws,
        "CIS-3.1",
        "111122223333",
        ComplianceStatus::NonCompliant,
        Some("Trail missing in ap-southeast-2"),
    ),
    (
        Provider::Azure,
        "AZ-3.1",
        "00000000-0000-4000-8000-000000000001",
        ComplianceStatus::Unknown,
        None,
    ),
];

/// Record the outcome of one independent insert.
fn tally(
    result: Result<(), DatabaseError>,
    written: &mut u32,
    skipped: &mut u32,
) -> Result<(), DatabaseError> {
    match result {
        Ok(()) => {
            *written += 1;
            Ok(())
        }
        Err(e) if e.is_conflict() => {
            *skipped += 1;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn lookup_id(
    conn: &libsql::Connection,
    sql: &str,
    provider: Provider,
    key: &str,
) -> Result<Option<i64>, DatabaseError> {
    let mut rows = conn.query(sql, libsql::params![provider.as_str(), key]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

impl GuardService {
    /// Insert the demo dataset, skipping anything already present.
    pub async fn seed_demo_data(&self) -> Result<SeedReport, DatabaseError> {
        let conn = self.db().conn().await;
        let mut report = SeedReport::default();

        for p in POLICIES {
            let input = PolicyCreate::new(p.provider, p.name, p.control_id, p.category)
                .severity(p.severity)
                .description(p.description);
            let result = insert_policy(&conn, &input).await.map(|_| ());
            tally(result, &mut report.policies, &mut report.skipped)?;
        }

        for a in ACCOUNTS {
            let input =
                AccountCreate::new(a.provider, a.external_id, a.display_name).status(a.status);
            let result = insert_account(&conn, &input).await.map(|_| ());
            tally(result, &mut report.accounts, &mut report.skipped)?;
        }

        for &(provider, control_id, external_id, status, findings) in EVALUATIONS {
            let policy_id = lookup_id(
                &conn,
                "SELECT id FROM policies WHERE provider = ?1 AND control_id = ?2",
                provider,
                control_id,
            )
            .await?;
            let account_id = lookup_id(
                &conn,
                "SELECT id FROM cloud_accounts WHERE provider = ?1 AND external_id = ?2",
                provider,
                external_id,
            )
            .await?;
            let (Some(policy_id), Some(account_id)) = (policy_id, account_id) else {
                report.skipped += 1;
                continue;
            };

            let mut input = EvaluationCreate::new(policy_id, account_id).status(status);
            input.findings = findings.map(String::from);
            let result = insert_evaluation(&conn, &input).await.map(|_| ());
            tally(result, &mut report.evaluations, &mut report.skipped)?;
        }

        tracing::info!(
            policies = report.policies,
            accounts = report.accounts,
            evaluations = report.evaluations,
            skipped = report.skipped,
            "demo data seeded"
        );
        Ok(report)
    }
}
