//! Cloud account repository: CRUD, provisioning on create, manual sync.

use libsql::Connection;

use guard_core::entities::CloudAccount;
use guard_core::enums::NotificationType;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, now, parse_datetime, parse_enum, parse_optional_datetime};
use crate::inputs::AccountCreate;
use crate::provisioning::{SYNC_TITLE, emit_cascade, sync_message};
use crate::repos::finish;
use crate::repos::notification::insert_notification;
use crate::repos::user::fetch_user;
use crate::service::GuardService;
use crate::updates::account::AccountUpdate;

const SELECT_COLS: &str =
    "id, provider, external_id, display_name, status, owner_id, created_at, last_sync_at";

pub(crate) const CONFLICT_MESSAGE: &str = "Account with this provider and ID already exists";

fn row_to_account(row: &libsql::Row) -> Result<CloudAccount, DatabaseError> {
    Ok(CloudAccount {
        id: row.get(0)?,
        provider: parse_enum(&row.get::<String>(1)?)?,
        external_id: row.get(2)?,
        display_name: row.get(3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        owner_id: row.get::<Option<i64>>(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        last_sync_at: parse_optional_datetime(row.get::<Option<String>>(7)?.as_deref())?,
    })
}

pub(crate) async fn fetch_account(conn: &Connection, id: i64) -> Result<CloudAccount, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM cloud_accounts WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("Account", id))?;
    row_to_account(&row)
}

/// Insert the account row only. Used by seeding, which skips the cascade.
pub(crate) async fn insert_account(
    conn: &Connection,
    input: &AccountCreate,
) -> Result<CloudAccount, DatabaseError> {
    if let Some(owner_id) = input.owner_id {
        fetch_user(conn, owner_id).await?;
    }

    let now = now();
    conn.execute(
        "INSERT INTO cloud_accounts (provider, external_id, display_name, status, owner_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            input.provider.as_str(),
            input.external_id.as_str(),
            input.display_name.as_str(),
            input.status.as_str(),
            input.owner_id,
            format_datetime(now)
        ],
    )
    .await
    .map_err(|e| DatabaseError::on_write(e, CONFLICT_MESSAGE))?;

    Ok(CloudAccount {
        id: conn.last_insert_rowid(),
        provider: input.provider,
        external_id: input.external_id.clone(),
        display_name: input.display_name.clone(),
        status: input.status,
        owner_id: input.owner_id,
        created_at: now,
        last_sync_at: None,
    })
}

impl GuardService {
    /// Create an account and emit its provisioning cascade.
    ///
    /// The account row and all four notifications commit together; on any
    /// failure none of them are visible.
    ///
    /// # Errors
    ///
    /// `Conflict` for a duplicate (provider, `external_id`), `NotFound` for an
    /// unknown `owner_id`.
    pub async fn create_account(&self, input: AccountCreate) -> Result<CloudAccount, DatabaseError> {
        let conn = self.db().conn().await;
        let tx = conn.transaction().await?;

        let result = async {
            let account = insert_account(&tx, &input).await?;
            emit_cascade(&tx, &account, account.created_at).await?;
            Ok::<_, DatabaseError>(account)
        }
        .await;

        let account = finish(tx, result).await?;
        tracing::info!(
            account_id = account.id,
            provider = %account.provider,
            "account created"
        );
        Ok(account)
    }

    pub async fn get_account(&self, id: i64) -> Result<CloudAccount, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_account(&conn, id).await
    }

    /// All accounts, newest first.
    pub async fn list_accounts(&self) -> Result<Vec<CloudAccount>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM cloud_accounts ORDER BY created_at DESC, id DESC"
                ),
                (),
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_account(&row)?);
        }
        Ok(results)
    }

    pub async fn update_account(
        &self,
        id: i64,
        update: AccountUpdate,
    ) -> Result<CloudAccount, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref display_name) = update.display_name {
            sets.push(format!("display_name = ?{idx}"));
            params.push(display_name.clone().into());
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }

        let conn = self.db().conn().await;
        if sets.is_empty() {
            return fetch_account(&conn, id).await;
        }

        params.push(id.into());
        let sql = format!(
            "UPDATE cloud_accounts SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, libsql::params_from_iter(params)).await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("Account", id));
        }
        fetch_account(&conn, id).await
    }

    /// Delete an account and, through the schema, its evaluations.
    pub async fn delete_account(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.db().conn().await;
        let changed = conn
            .execute("DELETE FROM cloud_accounts WHERE id = ?1", [id])
            .await?;
        Ok(changed > 0)
    }

    /// Stamp `last_sync_at` and emit an `account_sync` notification.
    ///
    /// Purely local: no provider API is called.
    pub async fn sync_account(&self, id: i64) -> Result<CloudAccount, DatabaseError> {
        let conn = self.db().conn().await;
        let tx = conn.transaction().await?;

        let result = async {
            let mut account = fetch_account(&tx, id).await?;
            let now = now();
            tx.execute(
                "UPDATE cloud_accounts SET last_sync_at = ?1 WHERE id = ?2",
                libsql::params![format_datetime(now), id],
            )
            .await?;
            insert_notification(
                &tx,
                SYNC_TITLE,
                &sync_message(&account),
                NotificationType::AccountSync,
                now,
            )
            .await?;
            account.last_sync_at = Some(now);
            Ok::<_, DatabaseError>(account)
        }
        .await;

        let account = finish(tx, result).await?;
        tracing::info!(account_id = account.id, "account sync requested");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use guard_core::enums::{AccountStatus, NotificationType, Provider};
    use pretty_assertions::assert_eq;

    use crate::inputs::{AccountCreate, EvaluationCreate};
    use crate::provisioning::STEP_OFFSET_SECS;
    use crate::test_support::helpers::{count_rows, seed_account, seed_policy, test_service};
    use crate::updates::account::AccountUpdateBuilder;

    #[tokio::test]
    async fn create_account_defaults_to_pending() {
        let svc = test_service().await;
        let account = seed_account(&svc, Provider::Aws, "111122223333").await;
        assert_eq!(account.status, AccountStatus::Pending);
        assert!(account.last_sync_at.is_none());
        assert_eq!(svc.get_account(account.id).await.unwrap(), account);
    }

    #[tokio::test]
    async fn create_account_emits_four_step_cascade() {
        let svc = test_service().await;
        let account = seed_account(&svc, Provider::Aws, "111122223333").await;

        let mut cascade = svc.list_notifications().await.unwrap();
        cascade.reverse();
        assert_eq!(cascade.len(), 4);
        assert!(
            cascade
                .iter()
                .all(|n| n.notification_type == NotificationType::Provisioning)
        );

        let titles: Vec<&str> = cascade.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Initializing secure workspace",
                "Building connectors",
                "Deploying baseline policies",
                "Provisioning complete",
            ]
        );
        assert_eq!(
            cascade[0].message,
            "Preparing guardrails for Account 111122223333 (AWS)"
        );

        for (i, pair) in cascade.windows(2).enumerate() {
            assert!(pair[0].created_at < pair[1].created_at, "step {i} not before step {}", i + 1);
            assert_eq!(
                pair[1].created_at - pair[0].created_at,
                TimeDelta::seconds(STEP_OFFSET_SECS)
            );
        }
        assert_eq!(cascade[0].created_at, account.created_at);
    }

    #[tokio::test]
    async fn duplicate_account_conflicts_and_leaves_prior_state() {
        let svc = test_service().await;
        let policy = seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        let original = seed_account(&svc, Provider::Aws, "111122223333").await;
        svc.create_evaluation(EvaluationCreate::new(policy.id, original.id))
            .await
            .unwrap();

        let err = svc
            .create_account(AccountCreate::new(Provider::Aws, "111122223333", "Impostor"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        assert_eq!(svc.get_account(original.id).await.unwrap(), original);
        assert_eq!(svc.list_accounts().await.unwrap().len(), 1);
        assert_eq!(count_rows(&svc, "policy_evaluations").await, 1);
        // No partial cascade for the rejected account.
        assert_eq!(count_rows(&svc, "notifications").await, 4);
    }

    #[tokio::test]
    async fn same_external_id_on_another_provider_is_fine() {
        let svc = test_service().await;
        seed_account(&svc, Provider::Aws, "shared-id").await;
        seed_account(&svc, Provider::Gcp, "shared-id").await;
        assert_eq!(svc.list_accounts().await.unwrap().len(), 2);
        assert_eq!(count_rows(&svc, "notifications").await, 8);
    }

    #[tokio::test]
    async fn cascade_failure_rolls_back_the_account() {
        let svc = test_service().await;
        svc.db()
            .conn()
            .await
            .execute_batch(
                "CREATE TRIGGER fail_third_step BEFORE INSERT ON notifications
                 WHEN NEW.title = 'Deploying baseline policies'
                 BEGIN SELECT RAISE(ABORT, 'notification store unavailable'); END;",
            )
            .await
            .unwrap();

        let result = svc
            .create_account(AccountCreate::new(Provider::Azure, "tenant-1", "Finance"))
            .await;
        assert!(result.is_err());
        assert_eq!(count_rows(&svc, "cloud_accounts").await, 0);
        assert_eq!(count_rows(&svc, "notifications").await, 0);
    }

    #[tokio::test]
    async fn unknown_owner_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .create_account(AccountCreate::new(Provider::Aws, "111122223333", "Prod").owner(99))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(count_rows(&svc, "notifications").await, 0);
    }

    #[tokio::test]
    async fn deleting_owner_cascades_to_accounts_and_evaluations() {
        let svc = test_service().await;
        let owner = svc.create_user("ops@example.com", "Ops", "x").await.unwrap();
        let policy = seed_policy(&svc, Provider::Gcp, "GCP-1.1").await;
        let account = svc
            .create_account(AccountCreate::new(Provider::Gcp, "proj-1", "Analytics").owner(owner.id))
            .await
            .unwrap();
        svc.create_evaluation(EvaluationCreate::new(policy.id, account.id))
            .await
            .unwrap();

        assert!(svc.delete_user(owner.id).await.unwrap());
        assert!(svc.get_account(account.id).await.unwrap_err().is_not_found());
        assert_eq!(count_rows(&svc, "policy_evaluations").await, 0);
        assert_eq!(count_rows(&svc, "policies").await, 1);
    }

    #[tokio::test]
    async fn list_accounts_newest_first() {
        let svc = test_service().await;
        let first = seed_account(&svc, Provider::Aws, "a-1").await;
        let second = seed_account(&svc, Provider::Azure, "b-2").await;
        let ids: Vec<i64> = svc.list_accounts().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn update_account_is_partial() {
        let svc = test_service().await;
        let account = seed_account(&svc, Provider::Aws, "111122223333").await;

        let updated = svc
            .update_account(
                account.id,
                AccountUpdateBuilder::new().status(AccountStatus::Connected).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, AccountStatus::Connected);
        assert_eq!(updated.display_name, account.display_name);

        let noop = svc
            .update_account(account.id, AccountUpdateBuilder::new().build())
            .await
            .unwrap();
        assert_eq!(noop, updated);
    }

    #[tokio::test]
    async fn update_missing_account_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .update_account(5, AccountUpdateBuilder::new().display_name("Gone").build())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_account_cascades_evaluations() {
        let svc = test_service().await;
        let policy = seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        let account = seed_account(&svc, Provider::Aws, "111122223333").await;
        svc.create_evaluation(EvaluationCreate::new(policy.id, account.id))
            .await
            .unwrap();

        assert!(svc.delete_account(account.id).await.unwrap());
        assert!(!svc.delete_account(account.id).await.unwrap());
        assert_eq!(count_rows(&svc, "policy_evaluations").await, 0);
    }

    #[tokio::test]
    async fn sync_stamps_and_notifies() {
        let svc = test_service().await;
        let account = seed_account(&svc, Provider::Gcp, "proj-7").await;

        let synced = svc.sync_account(account.id).await.unwrap();
        let stamp = synced.last_sync_at.unwrap();
        assert_eq!(svc.get_account(account.id).await.unwrap(), synced);
        assert_eq!(synced.status, account.status);

        let sync_notes: Vec<_> = svc
            .list_notifications()
            .await
            .unwrap()
            .into_iter()
            .filter(|n| n.notification_type == NotificationType::AccountSync)
            .collect();
        assert_eq!(sync_notes.len(), 1);
        assert_eq!(sync_notes[0].title, "Manual sync requested");
        assert_eq!(sync_notes[0].message, "Account proj-7 is syncing now.");
        assert_eq!(sync_notes[0].created_at, stamp);
    }

    #[tokio::test]
    async fn sync_missing_account_writes_nothing() {
        let svc = test_service().await;
        assert!(svc.sync_account(404).await.unwrap_err().is_not_found());
        assert_eq!(count_rows(&svc, "notifications").await, 0);
    }
}
