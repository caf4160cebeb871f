//! Create payloads.
//!
//! Each struct carries the caller-supplied fields of a new row; defaults for
//! omitted enum fields match the schema defaults. They deserialize directly
//! from request bodies.

use guard_core::enums::{
    AccountStatus, ComplianceStatus, NotificationType, PolicySeverity, Provider,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountCreate {
    pub provider: Provider,
    pub external_id: String,
    pub display_name: String,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub owner_id: Option<i64>,
}

impl AccountCreate {
    pub fn new(
        provider: Provider,
        external_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            external_id: external_id.into(),
            display_name: display_name.into(),
            status: AccountStatus::default(),
            owner_id: None,
        }
    }

    #[must_use]
    pub const fn status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn owner(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyCreate {
    pub provider: Provider,
    pub name: String,
    pub control_id: String,
    pub category: String,
    #[serde(default)]
    pub severity: PolicySeverity,
    #[serde(default)]
    pub description: Option<String>,
}

impl PolicyCreate {
    pub fn new(
        provider: Provider,
        name: impl Into<String>,
        control_id: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            name: name.into(),
            control_id: control_id.into(),
            category: category.into(),
            severity: PolicySeverity::default(),
            description: None,
        }
    }

    #[must_use]
    pub const fn severity(mut self, severity: PolicySeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationCreate {
    pub policy_id: i64,
    pub account_id: i64,
    #[serde(default)]
    pub status: ComplianceStatus,
    #[serde(default)]
    pub findings: Option<String>,
}

impl EvaluationCreate {
    #[must_use]
    pub const fn new(policy_id: i64, account_id: i64) -> Self {
        Self {
            policy_id,
            account_id,
            status: ComplianceStatus::Unknown,
            findings: None,
        }
    }

    #[must_use]
    pub const fn status(mut self, status: ComplianceStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn findings(mut self, findings: impl Into<String>) -> Self {
        self.findings = Some(findings.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationCreate {
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub notification_type: NotificationType,
}

impl NotificationCreate {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            notification_type: NotificationType::default(),
        }
    }

    #[must_use]
    pub const fn kind(mut self, notification_type: NotificationType) -> Self {
        self.notification_type = notification_type;
        self
    }
}
