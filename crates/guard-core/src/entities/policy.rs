use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{PolicySeverity, Provider};

/// A compliance control in the catalog. `(provider, control_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Policy {
    pub id: i64,
    pub provider: Provider,
    pub name: String,
    pub control_id: String,
    pub category: String,
    pub severity: PolicySeverity,
    pub description: Option<String>,
}
