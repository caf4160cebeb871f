use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AccountStatus, Provider};

/// A connected cloud account. `(provider, external_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CloudAccount {
    pub id: i64,
    pub provider: Provider,
    /// Provider-assigned identifier (AWS account number, Azure subscription, GCP project).
    pub external_id: String,
    pub display_name: String,
    pub status: AccountStatus,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub last_sync_at: Option<DateTime<Utc>>,
}
