//! Cross-cutting error types for Cloud Guard.
//!
//! Store errors (`DatabaseError`), settings errors (`ConfigError`) and token
//! errors (`AuthError`) live in their own crates. The HTTP layer is where
//! they all converge into a single response mapping.

use thiserror::Error;

/// Errors that can be raised by any Cloud Guard crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed a shape or range check before reaching the store.
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
