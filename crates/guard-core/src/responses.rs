//! Response types returned as JSON by the HTTP surface.
//!
//! These are read-side views: a public user profile without the password
//! digest, and evaluation rows embedding compact policy/account summaries.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CloudAccount, Policy, PolicyEvaluation, User};
use crate::enums::Provider;

/// Public view of a [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Compact policy reference embedded in evaluation listings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PolicySummary {
    pub id: i64,
    pub name: String,
    pub control_id: String,
    pub provider: Provider,
}

impl From<&Policy> for PolicySummary {
    fn from(policy: &Policy) -> Self {
        Self {
            id: policy.id,
            name: policy.name.clone(),
            control_id: policy.control_id.clone(),
            provider: policy.provider,
        }
    }
}

/// Compact account reference embedded in evaluation listings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: i64,
    pub provider: Provider,
    pub display_name: String,
    pub external_id: String,
}

impl From<&CloudAccount> for AccountSummary {
    fn from(account: &CloudAccount) -> Self {
        Self {
            id: account.id,
            provider: account.provider,
            display_name: account.display_name.clone(),
            external_id: account.external_id.clone(),
        }
    }
}

/// An evaluation together with the policy and account it links.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvaluationDetail {
    #[serde(flatten)]
    pub evaluation: PolicyEvaluation,
    pub policy: PolicySummary,
    pub account: AccountSummary,
}
