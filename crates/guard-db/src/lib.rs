//! # guard-db
//!
//! libSQL storage for Cloud Guard.
//!
//! Handles all relational state: users, cloud accounts, policies, policy
//! evaluations and notifications. Also hosts the two pieces of domain logic
//! that write across tables: the account provisioning cascade and the
//! manual sync stub, plus the dashboard aggregation read.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) as an embedded store.

pub mod error;
pub mod helpers;
pub mod inputs;
mod migrations;
pub mod provisioning;
pub mod repos;
pub mod seed;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle.
///
/// Owns one libSQL connection behind an async mutex: every repo method
/// holds the guard for its whole duration, so the statements of one
/// transaction are never interleaved with another caller's.
pub struct GuardDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: Mutex<libsql::Connection>,
}

impl GuardDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let guard_db = Self {
            db,
            conn: Mutex::new(conn),
        };
        guard_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(guard_db)
    }

    /// Acquire the connection for direct queries.
    ///
    /// Do not call another `GuardService` method while holding the guard.
    pub async fn conn(&self) -> MutexGuard<'_, libsql::Connection> {
        self.conn.lock().await
    }
}
