use chrono::{DateTime, Utc};

/// A registered dashboard user.
///
/// Carries the password digest, so it is deliberately not `Serialize`;
/// use [`crate::responses::UserProfile`] for anything leaving the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
