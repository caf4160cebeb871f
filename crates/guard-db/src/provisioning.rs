//! Account provisioning cascade and sync notification.
//!
//! Creating an account emits four `provisioning` notifications describing a
//! simulated onboarding timeline. Step `i` is stamped `start + i * 2s`; the
//! offset is display metadata for a timeline view, nothing waits on it.
//! Manual sync emits a single `account_sync` notification. Neither contacts
//! a cloud provider.

use chrono::{DateTime, TimeDelta, Utc};
use libsql::Connection;

use guard_core::entities::{CloudAccount, Notification};
use guard_core::enums::NotificationType;

use crate::error::DatabaseError;
use crate::repos::notification::insert_notification;

/// Simulated spacing between consecutive cascade steps.
pub const STEP_OFFSET_SECS: i64 = 2;

/// Number of controls the "baseline policies" step claims to activate.
pub const BASELINE_CONTROLS: u32 = 25;

pub const SYNC_TITLE: &str = "Manual sync requested";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeStep {
    pub title: &'static str,
    pub message: String,
}

/// The four cascade steps for `account`, in emission order.
#[must_use]
pub fn provisioning_steps(account: &CloudAccount) -> [CascadeStep; 4] {
    [
        CascadeStep {
            title: "Initializing secure workspace",
            message: format!(
                "Preparing guardrails for {} ({})",
                account.display_name,
                account.provider.code()
            ),
        },
        CascadeStep {
            title: "Building connectors",
            message: "Linking IAM roles, service principals, and API integrations".to_string(),
        },
        CascadeStep {
            title: "Deploying baseline policies",
            message: format!("Activating {BASELINE_CONTROLS} critical controls and monitoring rules"),
        },
        CascadeStep {
            title: "Provisioning complete",
            message: format!("{} is ready to ingest findings", account.display_name),
        },
    ]
}

#[must_use]
pub fn sync_message(account: &CloudAccount) -> String {
    format!("{} is syncing now.", account.display_name)
}

/// Write the cascade for `account` on `conn`.
///
/// Callers run this inside the transaction that inserted the account.
pub(crate) async fn emit_cascade(
    conn: &Connection,
    account: &CloudAccount,
    start: DateTime<Utc>,
) -> Result<Vec<Notification>, DatabaseError> {
    let mut emitted = Vec::with_capacity(4);
    for (offset, step) in (0_i64..).zip(provisioning_steps(account)) {
        let created_at = start + TimeDelta::seconds(offset * STEP_OFFSET_SECS);
        emitted.push(
            insert_notification(
                conn,
                step.title,
                &step.message,
                NotificationType::Provisioning,
                created_at,
            )
            .await?,
        );
    }
    Ok(emitted)
}
