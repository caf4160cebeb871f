use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ComplianceStatus;

/// The latest result of checking one policy against one account.
///
/// At most one row exists per `(policy_id, account_id)`. `last_checked_at`
/// is set on insert and refreshed by every applied update.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PolicyEvaluation {
    pub id: i64,
    pub policy_id: i64,
    pub account_id: i64,
    pub status: ComplianceStatus,
    pub last_checked_at: DateTime<Utc>,
    pub findings: Option<String>,
}
