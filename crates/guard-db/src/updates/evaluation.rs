//! Policy evaluation update builder.

use guard_core::enums::ComplianceStatus;
use serde::{Deserialize, Serialize};

use super::double_option;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub findings: Option<Option<String>>,
}

pub struct EvaluationUpdateBuilder(EvaluationUpdate);

impl EvaluationUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(EvaluationUpdate::default())
    }

    #[must_use]
    pub const fn status(mut self, status: ComplianceStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn findings(mut self, findings: Option<String>) -> Self {
        self.0.findings = Some(findings);
        self
    }

    #[must_use]
    pub fn build(self) -> EvaluationUpdate {
        self.0
    }
}

impl Default for EvaluationUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
