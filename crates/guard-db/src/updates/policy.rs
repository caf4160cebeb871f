//! Policy update builder.

use guard_core::enums::{PolicySeverity, Provider};
use serde::{Deserialize, Serialize};

use super::double_option;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<PolicySeverity>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

pub struct PolicyUpdateBuilder(PolicyUpdate);

impl PolicyUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(PolicyUpdate::default())
    }

    #[must_use]
    pub const fn provider(mut self, provider: Provider) -> Self {
        self.0.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn control_id(mut self, control_id: impl Into<String>) -> Self {
        self.0.control_id = Some(control_id.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.0.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn severity(mut self, severity: PolicySeverity) -> Self {
        self.0.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn build(self) -> PolicyUpdate {
        self.0
    }
}

impl Default for PolicyUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
