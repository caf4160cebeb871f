//! Database error types for guard-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The requested id does not resolve to a row.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A uniqueness invariant would be violated. Nothing was written.
    #[error("{0}")]
    Conflict(String),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl DatabaseError {
    pub(crate) const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Map a failed write, turning a UNIQUE violation into `Conflict(message)`.
    pub(crate) fn on_write(err: libsql::Error, conflict_message: &str) -> Self {
        if err.to_string().contains("UNIQUE constraint failed") {
            Self::Conflict(conflict_message.to_string())
        } else {
            Self::LibSql(err)
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
