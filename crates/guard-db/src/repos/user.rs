//! User repository: registration, lookup, profile updates, authentication.

use libsql::Connection;

use guard_core::entities::User;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_bool, now, parse_datetime};
use crate::service::GuardService;
use crate::updates::user::UserUpdate;

const SELECT_COLS: &str = "id, email, full_name, password_hash, is_active, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        password_hash: row.get(3)?,
        is_active: get_bool(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

pub(crate) async fn fetch_user(conn: &Connection, id: i64) -> Result<User, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("User", id))?;
    row_to_user(&row)
}

impl GuardService {
    /// Register a user. The caller supplies an already-hashed password.
    ///
    /// # Errors
    ///
    /// `DatabaseError::Conflict` if the email is already registered.
    pub async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> Result<User, DatabaseError> {
        let now = now();
        let conn = self.db().conn().await;

        conn.execute(
            "INSERT INTO users (email, full_name, password_hash, is_active, created_at)
             VALUES (?1, ?2, ?3, 1, ?4)",
            libsql::params![email, full_name, password_hash, format_datetime(now)],
        )
        .await
        .map_err(|e| DatabaseError::on_write(e, "Email already registered"))?;
        let id = conn.last_insert_rowid();

        tracing::info!(user_id = id, "user registered");
        fetch_user(&conn, id).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_user(&conn, id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE email = ?1"),
                [email],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Check credentials.
    ///
    /// Returns `None` for an unknown email, a rejected password, or an
    /// inactive user; the caller cannot tell which. `verify` receives
    /// `(plaintext, stored_digest)` and runs on every path, with `None` as
    /// the digest for an unknown email, so each failure costs the same work.
    /// The store is not held while `verify` runs.
    pub async fn authenticate<F, Fut>(
        &self,
        email: &str,
        password: &str,
        verify: F,
    ) -> Result<Option<User>, DatabaseError>
    where
        F: FnOnce(String, Option<String>) -> Fut,
        Fut: Future<Output = bool>,
    {
        let user = self.find_user_by_email(email).await?;
        let digest = user.as_ref().map(|u| u.password_hash.clone());
        let accepted = verify(password.to_string(), digest).await;
        Ok(user.filter(|u| accepted && u.is_active))
    }

    pub async fn update_user(&self, id: i64, update: UserUpdate) -> Result<User, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref full_name) = update.full_name {
            sets.push(format!("full_name = ?{idx}"));
            params.push(full_name.clone().into());
            idx += 1;
        }
        if let Some(is_active) = update.is_active {
            sets.push(format!("is_active = ?{idx}"));
            params.push(i64::from(is_active).into());
            idx += 1;
        }

        let conn = self.db().conn().await;
        if sets.is_empty() {
            return fetch_user(&conn, id).await;
        }

        params.push(id.into());
        let sql = format!("UPDATE users SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = conn.execute(&sql, libsql::params_from_iter(params)).await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("User", id));
        }
        fetch_user(&conn, id).await
    }

    /// Delete a user and, through the schema, every account they own.
    pub async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.db().conn().await;
        let changed = conn.execute("DELETE FROM users WHERE id = ?1", [id]).await?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::test_support::helpers::test_service;
    use crate::updates::user::UserUpdateBuilder;
    use pretty_assertions::assert_eq;

    /// Stand-in verifier: the stored "digest" is the plaintext reversed.
    fn digest(plaintext: &str) -> String {
        plaintext.chars().rev().collect()
    }

    async fn verify(plaintext: String, stored: Option<String>) -> bool {
        stored.is_some_and(|stored| digest(&plaintext) == stored)
    }

    #[tokio::test]
    async fn create_and_get_user() {
        let svc = test_service().await;
        let user = svc
            .create_user("ops@example.com", "Ops Team", &digest("hunter22"))
            .await
            .unwrap();

        assert!(user.id > 0);
        assert!(user.is_active);
        assert_eq!(svc.get_user(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = test_service().await;
        svc.create_user("ops@example.com", "Ops", "x").await.unwrap();
        let err = svc
            .create_user("ops@example.com", "Other", "y")
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn find_by_email_returns_none_when_unknown() {
        let svc = test_service().await;
        assert!(svc.find_user_by_email("ghost@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn authenticate_accepts_correct_password() {
        let svc = test_service().await;
        let user = svc
            .create_user("ops@example.com", "Ops", &digest("hunter22"))
            .await
            .unwrap();
        let found = svc
            .authenticate("ops@example.com", "hunter22", verify)
            .await
            .unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn authenticate_failures_are_indistinguishable() {
        let svc = test_service().await;
        svc.create_user("ops@example.com", "Ops", &digest("hunter22"))
            .await
            .unwrap();

        let wrong_password = svc
            .authenticate("ops@example.com", "nope", verify)
            .await
            .unwrap();
        let unknown_email = svc
            .authenticate("ghost@example.com", "hunter22", verify)
            .await
            .unwrap();

        assert_eq!(wrong_password, None);
        assert_eq!(unknown_email, None);
    }

    #[tokio::test]
    async fn verifier_runs_on_every_failure_path() {
        let svc = test_service().await;
        let user = svc
            .create_user("ops@example.com", "Ops", &digest("hunter22"))
            .await
            .unwrap();
        svc.create_user("idle@example.com", "Idle", &digest("hunter22"))
            .await
            .unwrap();
        let idle = svc.find_user_by_email("idle@example.com").await.unwrap().unwrap();
        svc.update_user(idle.id, UserUpdateBuilder::new().is_active(false).build())
            .await
            .unwrap();

        let seen: Mutex<Vec<Option<String>>> = Mutex::new(Vec::new());
        for (email, password) in [
            ("ghost@example.com", "hunter22"),
            ("ops@example.com", "nope"),
            ("idle@example.com", "hunter22"),
        ] {
            let result = svc
                .authenticate(email, password, |plaintext, stored| {
                    seen.lock().unwrap().push(stored.clone());
                    verify(plaintext, stored)
                })
                .await
                .unwrap();
            assert_eq!(result, None, "{email}");
        }

        let seen = seen.into_inner().unwrap();
        assert_eq!(
            seen,
            vec![None, Some(user.password_hash.clone()), Some(digest("hunter22"))]
        );
    }

    #[tokio::test]
    async fn authenticate_rejects_inactive_user() {
        let svc = test_service().await;
        let user = svc
            .create_user("ops@example.com", "Ops", &digest("hunter22"))
            .await
            .unwrap();
        svc.update_user(user.id, UserUpdateBuilder::new().is_active(false).build())
            .await
            .unwrap();

        let result = svc
            .authenticate("ops@example.com", "hunter22", verify)
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn update_user_applies_only_given_fields() {
        let svc = test_service().await;
        let user = svc.create_user("ops@example.com", "Ops", "x").await.unwrap();

        let updated = svc
            .update_user(user.id, UserUpdateBuilder::new().full_name("Platform Ops").build())
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Platform Ops");
        assert_eq!(updated.email, user.email);
        assert!(updated.is_active);

        let unchanged = svc
            .update_user(user.id, UserUpdateBuilder::new().build())
            .await
            .unwrap();
        assert_eq!(unchanged, updated);
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .update_user(42, UserUpdateBuilder::new().full_name("Nobody").build())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = svc
            .update_user(42, UserUpdateBuilder::new().build())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_user_reports_whether_a_row_went() {
        let svc = test_service().await;
        let user = svc.create_user("ops@example.com", "Ops", "x").await.unwrap();
        assert!(svc.delete_user(user.id).await.unwrap());
        assert!(!svc.delete_user(user.id).await.unwrap());
    }
}
