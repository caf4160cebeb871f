//! Store connection string handling.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Process-local in-memory database (tests, throwaway demos).
    Memory,
    /// A local database file.
    File(PathBuf),
}

impl StoreLocation {
    /// Parse a `DATABASE_URL` value.
    ///
    /// Accepted shapes: `sqlite:///<path>`, `sqlite://<path>`, `file:<path>`,
    /// `:memory:` (optionally behind any of those prefixes), or a bare path.
    /// Network URLs such as `postgresql://...` are rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for empty or unsupported URLs.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "database_url".into(),
            reason: reason.into(),
        };

        let trimmed = url.trim();
        let path = trimmed
            .strip_prefix("sqlite:///")
            .or_else(|| trimmed.strip_prefix("sqlite://"))
            .or_else(|| trimmed.strip_prefix("file:"))
            .unwrap_or(trimmed);

        if path.is_empty() {
            return Err(invalid("no database path given"));
        }
        if path.contains("://") {
            return Err(invalid("only local SQLite/libSQL databases are supported"));
        }
        if path == ":memory:" {
            return Ok(Self::Memory);
        }
        Ok(Self::File(PathBuf::from(path)))
    }

    /// Path string handed to the libSQL builder.
    #[must_use]
    pub fn as_path_str(&self) -> String {
        match self {
            Self::Memory => ":memory:".to_string(),
            Self::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}
