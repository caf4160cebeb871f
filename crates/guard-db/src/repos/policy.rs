//! Policy catalog repository.

use libsql::Connection;

use guard_core::entities::Policy;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_text, parse_enum};
use crate::inputs::PolicyCreate;
use crate::service::GuardService;
use crate::updates::policy::PolicyUpdate;

const SELECT_COLS: &str = "id, provider, name, control_id, category, severity, description";

pub(crate) const CONFLICT_MESSAGE: &str = "Policy with this provider and control ID already exists";

fn row_to_policy(row: &libsql::Row) -> Result<Policy, DatabaseError> {
    Ok(Policy {
        id: row.get(0)?,
        provider: parse_enum(&row.get::<String>(1)?)?,
        name: row.get(2)?,
        control_id: row.get(3)?,
        category: row.get(4)?,
        severity: parse_enum(&row.get::<String>(5)?)?,
        description: get_opt_string(row, 6)?,
    })
}

pub(crate) async fn fetch_policy(conn: &Connection, id: i64) -> Result<Policy, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM policies WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("Policy", id))?;
    row_to_policy(&row)
}

pub(crate) async fn insert_policy(
    conn: &Connection,
    input: &PolicyCreate,
) -> Result<Policy, DatabaseError> {
    conn.execute(
        "INSERT INTO policies (provider, name, control_id, category, severity, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            input.provider.as_str(),
            input.name.as_str(),
            input.control_id.as_str(),
            input.category.as_str(),
            input.severity.as_str(),
            opt_text(input.description.as_deref())
        ],
    )
    .await
    .map_err(|e| DatabaseError::on_write(e, CONFLICT_MESSAGE))?;

    Ok(Policy {
        id: conn.last_insert_rowid(),
        provider: input.provider,
        name: input.name.clone(),
        control_id: input.control_id.clone(),
        category: input.category.clone(),
        severity: input.severity,
        description: input.description.clone(),
    })
}

impl GuardService {
    /// # Errors
    ///
    /// `Conflict` if (provider, `control_id`) already exists.
    pub async fn create_policy(&self, input: PolicyCreate) -> Result<Policy, DatabaseError> {
        let conn = self.db().conn().await;
        let policy = insert_policy(&conn, &input).await?;
        tracing::debug!(policy_id = policy.id, control_id = %policy.control_id, "policy created");
        Ok(policy)
    }

    pub async fn get_policy(&self, id: i64) -> Result<Policy, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_policy(&conn, id).await
    }

    /// All policies, ordered by provider then control id.
    pub async fn list_policies(&self) -> Result<Vec<Policy>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM policies ORDER BY provider, control_id"),
                (),
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_policy(&row)?);
        }
        Ok(results)
    }

    pub async fn update_policy(&self, id: i64, update: PolicyUpdate) -> Result<Policy, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(provider) = update.provider {
            sets.push(format!("provider = ?{idx}"));
            params.push(provider.as_str().into());
            idx += 1;
        }
        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref control_id) = update.control_id {
            sets.push(format!("control_id = ?{idx}"));
            params.push(control_id.clone().into());
            idx += 1;
        }
        if let Some(ref category) = update.category {
            sets.push(format!("category = ?{idx}"));
            params.push(category.clone().into());
            idx += 1;
        }
        if let Some(severity) = update.severity {
            sets.push(format!("severity = ?{idx}"));
            params.push(severity.as_str().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(opt_text(description.as_deref()));
            idx += 1;
        }

        let conn = self.db().conn().await;
        if sets.is_empty() {
            return fetch_policy(&conn, id).await;
        }

        params.push(id.into());
        let sql = format!("UPDATE policies SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = conn
            .execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(|e| DatabaseError::on_write(e, CONFLICT_MESSAGE))?;
        if changed == 0 {
            return Err(DatabaseError::not_found("Policy", id));
        }
        fetch_policy(&conn, id).await
    }

    /// Delete a policy and, through the schema, its evaluations.
    pub async fn delete_policy(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.db().conn().await;
        let changed = conn.execute("DELETE FROM policies WHERE id = ?1", [id]).await?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use guard_core::enums::{PolicySeverity, Provider};
    use pretty_assertions::assert_eq;

    use crate::inputs::{EvaluationCreate, PolicyCreate};
    use crate::test_support::helpers::{count_rows, seed_account, seed_policy, test_service};
    use crate::updates::policy::PolicyUpdateBuilder;

    #[tokio::test]
    async fn create_and_get_policy() {
        let svc = test_service().await;
        let policy = svc
            .create_policy(
                PolicyCreate::new(Provider::Aws, "Root MFA", "CIS-1.5", "Identity")
                    .severity(PolicySeverity::Critical)
                    .description("Root account must use MFA"),
            )
            .await
            .unwrap();
        assert_eq!(svc.get_policy(policy.id).await.unwrap(), policy);
        assert_eq!(policy.description.as_deref(), Some("Root account must use MFA"));
    }

    #[tokio::test]
    async fn duplicate_control_conflicts() {
        let svc = test_service().await;
        seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        let err = svc
            .create_policy(PolicyCreate::new(Provider::Aws, "Dup", "CIS-1.1", "Identity"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Policy with this provider and control ID already exists");

        // Same control id under another provider is a different control.
        seed_policy(&svc, Provider::Azure, "CIS-1.1").await;
    }

    #[tokio::test]
    async fn list_orders_by_provider_then_control() {
        let svc = test_service().await;
        seed_policy(&svc, Provider::Gcp, "GCP-2.1").await;
        seed_policy(&svc, Provider::Aws, "CIS-2.1").await;
        seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        seed_policy(&svc, Provider::Azure, "AZ-1.1").await;

        let keys: Vec<(Provider, String)> = svc
            .list_policies()
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.provider, p.control_id))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Provider::Aws, "CIS-1.1".to_string()),
                (Provider::Aws, "CIS-2.1".to_string()),
                (Provider::Azure, "AZ-1.1".to_string()),
                (Provider::Gcp, "GCP-2.1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn update_can_clear_description() {
        let svc = test_service().await;
        let policy = svc
            .create_policy(
                PolicyCreate::new(Provider::Aws, "Root MFA", "CIS-1.5", "Identity")
                    .description("temporary"),
            )
            .await
            .unwrap();

        let updated = svc
            .update_policy(
                policy.id,
                PolicyUpdateBuilder::new()
                    .severity(PolicySeverity::High)
                    .description(None)
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.severity, PolicySeverity::High);
        assert_eq!(updated.description, None);
        assert_eq!(updated.name, policy.name);
    }

    #[tokio::test]
    async fn noop_update_returns_unchanged_policy() {
        let svc = test_service().await;
        let policy = seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        let same = svc
            .update_policy(policy.id, PolicyUpdateBuilder::new().build())
            .await
            .unwrap();
        assert_eq!(same, policy);
    }

    #[tokio::test]
    async fn update_onto_existing_pair_conflicts() {
        let svc = test_service().await;
        seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        let other = seed_policy(&svc, Provider::Aws, "CIS-1.2").await;

        let err = svc
            .update_policy(other.id, PolicyUpdateBuilder::new().control_id("CIS-1.1").build())
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(svc.get_policy(other.id).await.unwrap(), other);
    }

    #[tokio::test]
    async fn update_missing_policy_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .update_policy(3, PolicyUpdateBuilder::new().name("Ghost").build())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_policy_cascades_evaluations() {
        let svc = test_service().await;
        let policy = seed_policy(&svc, Provider::Aws, "CIS-1.1").await;
        let account = seed_account(&svc, Provider::Aws, "111122223333").await;
        svc.create_evaluation(EvaluationCreate::new(policy.id, account.id))
            .await
            .unwrap();

        assert!(svc.delete_policy(policy.id).await.unwrap());
        assert!(!svc.delete_policy(policy.id).await.unwrap());
        assert_eq!(count_rows(&svc, "policy_evaluations").await, 0);
        assert_eq!(count_rows(&svc, "cloud_accounts").await, 1);
    }
}
