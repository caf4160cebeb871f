//! Service layer hosting every repository operation.
//!
//! `GuardService` wraps `GuardDb`. All repo methods are implemented as
//! `impl GuardService` blocks under [`crate::repos`].

use crate::GuardDb;
use crate::error::DatabaseError;

/// Entry point for all reads and writes against the Cloud Guard store.
///
/// Multi-statement writes (account creation with its provisioning cascade,
/// account sync) run in a single transaction: either every row lands or none.
pub struct GuardService {
    db: GuardDb,
}

impl GuardService {
    /// Create a new service over a local database.
    ///
    /// `db_path` is a filesystem path or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = GuardDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `GuardDb`.
    #[must_use]
    pub const fn from_db(db: GuardDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &GuardDb {
        &self.db
    }
}
