//! Input shape checks shared by every write path.
//!
//! Lengths are counted in characters, not bytes.

use crate::errors::CoreError;

pub const MAX_TEXT: usize = 255;

/// Check that `value` has between `min` and `max` characters (inclusive).
///
/// # Errors
///
/// Returns `CoreError::Validation` naming `field` when the length is out of range.
pub fn check_length(value: &str, min: usize, max: usize, field: &str) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len < min {
        return Err(CoreError::validation(
            field,
            format!("must be at least {min} characters"),
        ));
    }
    if len > max {
        return Err(CoreError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Like [`check_length`] but only when a value is present.
///
/// # Errors
///
/// Returns `CoreError::Validation` when the present value is out of range.
pub fn check_optional_length(
    value: Option<&str>,
    min: usize,
    max: usize,
    field: &str,
) -> Result<(), CoreError> {
    value.map_or(Ok(()), |v| check_length(v, min, max, field))
}

/// Minimal structural email check: one `@`, non-empty local part, a dotted
/// domain, no whitespace.
///
/// # Errors
///
/// Returns `CoreError::Validation` when the address is malformed.
pub fn check_email(email: &str) -> Result<(), CoreError> {
    check_length(email, 3, MAX_TEXT, "email")?;
    let invalid = || CoreError::validation("email", "is not a valid email address");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let dotted: Vec<&str> = domain.split('.').collect();
    if dotted.len() < 2 || dotted.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}
