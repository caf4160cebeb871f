//! Dashboard snapshot read.
//!
//! One pass over evaluations joined to their account's provider, folded by
//! [`DashboardSnapshot::from_facts`].

use guard_core::snapshot::{DashboardSnapshot, EvaluationFact};

use crate::error::DatabaseError;
use crate::helpers::parse_enum;
use crate::service::GuardService;

impl GuardService {
    /// Aggregate status counts globally and per provider.
    ///
    /// With no evaluations this is an all-zero summary and no provider rows.
    pub async fn dashboard_snapshot(&self) -> Result<DashboardSnapshot, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                "SELECT a.provider, e.account_id, e.status
                 FROM policy_evaluations e
                 JOIN cloud_accounts a ON a.id = e.account_id",
                (),
            )
            .await?;

        let mut facts = Vec::new();
        while let Some(row) = rows.next().await? {
            facts.push(EvaluationFact {
                provider: parse_enum(&row.get::<String>(0)?)?,
                account_id: row.get(1)?,
                status: parse_enum(&row.get::<String>(2)?)?,
            });
        }
        Ok(DashboardSnapshot::from_facts(facts))
    }
}

#[cfg(test)]
mod tests {
    use guard_core::enums::{ComplianceStatus, Provider};
    use guard_core::snapshot::{ComplianceSummary, ProviderBreakdown};
    use pretty_assertions::assert_eq;

    use crate::inputs::EvaluationCreate;
    use crate::test_support::helpers::{seed_account, seed_policy, test_service};

    #[tokio::test]
    async fn empty_store_is_a_zero_snapshot() {
        let svc = test_service().await;
        let snapshot = svc.dashboard_snapshot().await.unwrap();
        assert_eq!(snapshot.summary, ComplianceSummary::default());
        assert!(snapshot.providers.is_empty());
    }

    #[tokio::test]
    async fn single_unknown_evaluation_scenario() {
        let svc = test_service().await;
        let policy = seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        let account = seed_account(&svc, Provider::Aws, "111122223333").await;
        svc.create_evaluation(
            EvaluationCreate::new(policy.id, account.id).status(ComplianceStatus::Unknown),
        )
        .await
        .unwrap();

        let expected_summary = ComplianceSummary {
            total_policies: 1,
            compliant: 0,
            non_compliant: 0,
            unknown: 1,
        };
        let expected_providers = vec![ProviderBreakdown {
            provider: Provider::Aws,
            accounts: 1,
            compliant: 0,
            non_compliant: 0,
            unknown: 1,
        }];

        let snapshot = svc.dashboard_snapshot().await.unwrap();
        assert_eq!(snapshot.summary, expected_summary);
        assert_eq!(snapshot.providers, expected_providers);

        // A rejected duplicate leaves the counts where they were.
        let err = svc
            .create_evaluation(EvaluationCreate::new(policy.id, account.id))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        let snapshot = svc.dashboard_snapshot().await.unwrap();
        assert_eq!(snapshot.summary, expected_summary);
        assert_eq!(snapshot.providers, expected_providers);
    }

    #[tokio::test]
    async fn accounts_without_evaluations_do_not_create_rows() {
        let svc = test_service().await;
        let aws_policy = seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        let aws_policy_2 = seed_policy(&svc, Provider::Aws, "CIS-1.2").await;
        let prod = seed_account(&svc, Provider::Aws, "111122223333").await;
        let dev = seed_account(&svc, Provider::Aws, "444455556666").await;
        seed_account(&svc, Provider::Gcp, "idle-project").await;

        for (policy, account, status) in [
            (aws_policy.id, prod.id, ComplianceStatus::Compliant),
            (aws_policy_2.id, prod.id, ComplianceStatus::NonCompliant),
            (aws_policy.id, dev.id, ComplianceStatus::Compliant),
        ] {
            svc.create_evaluation(EvaluationCreate::new(policy, account).status(status))
                .await
                .unwrap();
        }

        let snapshot = svc.dashboard_snapshot().await.unwrap();
        assert_eq!(snapshot.summary.total_policies, 3);
        assert_eq!(snapshot.summary.compliant, 2);
        assert_eq!(snapshot.summary.non_compliant, 1);
        assert!(snapshot.provider(Provider::Gcp).is_none());

        let aws = snapshot.provider(Provider::Aws).unwrap();
        assert_eq!(aws.accounts, 2);
        assert_eq!(aws.evaluations(), 3);
    }
}
