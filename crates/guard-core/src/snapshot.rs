//! Compliance dashboard snapshot and the fold that builds it.
//!
//! The snapshot is computed from one row per evaluation, each carrying the
//! provider and id of the evaluated account. Status buckets are exhaustive
//! over [`ComplianceStatus`], so for the summary and for every provider row
//! `compliant + non_compliant + unknown == total`.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ComplianceStatus, Provider};

/// Global status counts over all evaluations.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ComplianceSummary {
    /// Number of evaluation rows (one per policy/account pair).
    pub total_policies: u64,
    pub compliant: u64,
    pub non_compliant: u64,
    pub unknown: u64,
}

impl ComplianceSummary {
    fn record(&mut self, status: ComplianceStatus) {
        self.total_policies += 1;
        match status {
            ComplianceStatus::Compliant => self.compliant += 1,
            ComplianceStatus::NonCompliant => self.non_compliant += 1,
            ComplianceStatus::Unknown => self.unknown += 1,
        }
    }

    /// Count for a single bucket.
    #[must_use]
    pub const fn count(&self, status: ComplianceStatus) -> u64 {
        match status {
            ComplianceStatus::Compliant => self.compliant,
            ComplianceStatus::NonCompliant => self.non_compliant,
            ComplianceStatus::Unknown => self.unknown,
        }
    }
}

/// Status counts restricted to one provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProviderBreakdown {
    pub provider: Provider,
    /// Distinct accounts of this provider with at least one evaluation.
    pub accounts: u64,
    pub compliant: u64,
    pub non_compliant: u64,
    pub unknown: u64,
}

impl ProviderBreakdown {
    /// Number of evaluations counted for this provider.
    #[must_use]
    pub const fn evaluations(&self) -> u64 {
        self.compliant + self.non_compliant + self.unknown
    }
}

/// Point-in-time aggregate read of evaluation status counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub summary: ComplianceSummary,
    /// One row per provider present among evaluated accounts, ordered aws, azure, gcp.
    pub providers: Vec<ProviderBreakdown>,
}

/// One evaluation as seen by the aggregation: its account's provider, the
/// account id, and the evaluation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationFact {
    pub provider: Provider,
    pub account_id: i64,
    pub status: ComplianceStatus,
}

#[derive(Default)]
struct ProviderAccumulator {
    accounts: BTreeSet<i64>,
    counts: ComplianceSummary,
}

impl DashboardSnapshot {
    /// Fold evaluation facts into a snapshot.
    ///
    /// An empty input yields an all-zero summary and no provider rows.
    #[must_use]
    pub fn from_facts<I>(facts: I) -> Self
    where
        I: IntoIterator<Item = EvaluationFact>,
    {
        let mut summary = ComplianceSummary::default();
        let mut per_provider: BTreeMap<Provider, ProviderAccumulator> = BTreeMap::new();

        for fact in facts {
            summary.record(fact.status);
            let acc = per_provider.entry(fact.provider).or_default();
            acc.accounts.insert(fact.account_id);
            acc.counts.record(fact.status);
        }

        let providers = per_provider
            .into_iter()
            .map(|(provider, acc)| ProviderBreakdown {
                provider,
                accounts: acc.accounts.len() as u64,
                compliant: acc.counts.compliant,
                non_compliant: acc.counts.non_compliant,
                unknown: acc.counts.unknown,
            })
            .collect();

        Self { summary, providers }
    }

    /// Breakdown row for `provider`, if it has any evaluations.
    #[must_use]
    pub fn provider(&self, provider: Provider) -> Option<&ProviderBreakdown> {
        self.providers.iter().find(|p| p.provider == provider)
    }
}
