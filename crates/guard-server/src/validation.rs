//! Request bodies and their shape checks.
//!
//! Create/update payloads for stored entities come from `guard_db`; the
//! auth payloads are defined here. Each implements [`Validate`], which
//! [`crate::extract::ValidJson`] runs before a handler sees the value.

use guard_core::errors::CoreError;
use guard_core::validation::{MAX_TEXT, check_email, check_length, check_optional_length};
use guard_db::inputs::{AccountCreate, EvaluationCreate, NotificationCreate, PolicyCreate};
use guard_db::updates::account::AccountUpdate;
use guard_db::updates::evaluation::EvaluationUpdate;
use guard_db::updates::policy::PolicyUpdate;
use serde::Deserialize;

pub const MIN_PASSWORD: usize = 6;
pub const MAX_PASSWORD: usize = 128;

pub trait Validate {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first offending field.
    fn validate(&self) -> Result<(), CoreError>;
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), CoreError> {
        check_email(&self.email)?;
        check_length(&self.full_name, 1, MAX_TEXT, "full_name")?;
        check_length(&self.password, MIN_PASSWORD, MAX_PASSWORD, "password")
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), CoreError> {
        check_email(&self.email)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), CoreError> {
        check_optional_length(self.full_name.as_deref(), 1, MAX_TEXT, "full_name")
    }
}

impl Validate for AccountCreate {
    fn validate(&self) -> Result<(), CoreError> {
        check_length(&self.external_id, 2, MAX_TEXT, "external_id")?;
        check_length(&self.display_name, 2, MAX_TEXT, "display_name")
    }
}

impl Validate for AccountUpdate {
    fn validate(&self) -> Result<(), CoreError> {
        check_optional_length(self.display_name.as_deref(), 2, MAX_TEXT, "display_name")
    }
}

impl Validate for PolicyCreate {
    fn validate(&self) -> Result<(), CoreError> {
        check_length(&self.name, 2, MAX_TEXT, "name")?;
        check_length(&self.control_id, 2, MAX_TEXT, "control_id")?;
        check_length(&self.category, 2, MAX_TEXT, "category")
    }
}

impl Validate for PolicyUpdate {
    fn validate(&self) -> Result<(), CoreError> {
        check_optional_length(self.name.as_deref(), 2, MAX_TEXT, "name")?;
        check_optional_length(self.control_id.as_deref(), 2, MAX_TEXT, "control_id")?;
        check_optional_length(self.category.as_deref(), 2, MAX_TEXT, "category")
    }
}

impl Validate for EvaluationCreate {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Validate for EvaluationUpdate {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Validate for NotificationCreate {
    fn validate(&self) -> Result<(), CoreError> {
        check_length(&self.title, 2, MAX_TEXT, "title")?;
        check_length(&self.message, 2, usize::MAX, "message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guard_core::enums::Provider;
    use rstest::rstest;

    fn register(email: &str, full_name: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            full_name: full_name.into(),
            password: password.into(),
        }
    }

    #[rstest]
    #[case(register("ops@example.com", "Ops", "secret1"), true)]
    #[case(register("not-an-email", "Ops", "secret1"), false)]
    #[case(register("ops@example.com", "", "secret1"), false)]
    #[case(register("ops@example.com", "Ops", "short"), false)]
    #[case(register("ops@example.com", "Ops", &"x".repeat(129)), false)]
    fn register_rules(#[case] request: RegisterRequest, #[case] ok: bool) {
        assert_eq!(request.validate().is_ok(), ok);
    }

    #[rstest]
    #[case("1", false)]
    #[case("12", true)]
    fn account_external_id_minimum(#[case] external_id: &str, #[case] ok: bool) {
        let input = AccountCreate::new(Provider::Aws, external_id, "Prod");
        assert_eq!(input.validate().is_ok(), ok);
    }

    #[test]
    fn policy_update_checks_only_present_fields() {
        assert!(PolicyUpdate::default().validate().is_ok());
        let update = PolicyUpdate {
            control_id: Some("x".into()),
            ..PolicyUpdate::default()
        };
        let err = update.validate().unwrap_err();
        assert!(err.to_string().contains("control_id"));
    }

    #[test]
    fn notification_message_has_no_upper_bound() {
        let long = NotificationCreate::new("Digest", "m".repeat(10_000));
        assert!(long.validate().is_ok());
        assert!(NotificationCreate::new("Digest", "m").validate().is_err());
    }
}
