//! Repository modules implementing CRUD operations for all Cloud Guard entities.
//!
//! Each module adds methods to `GuardService` via `impl GuardService` blocks.
//! A public method acquires the connection once and hands `&Connection` to
//! module-private fetch/insert functions, so nested reads never re-lock.

pub mod account;
pub mod dashboard;
pub mod evaluation;
pub mod notification;
pub mod policy;
pub mod user;

use crate::error::DatabaseError;

/// Commit `tx` if `result` is `Ok`, otherwise roll it back.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "transaction rollback failed");
            }
            Err(err)
        }
    }
}
