//! Policy evaluation repository.
//!
//! Reads always join the evaluated policy and account so callers get an
//! [`EvaluationDetail`] with both summaries embedded.

use libsql::Connection;

use guard_core::entities::PolicyEvaluation;
use guard_core::responses::{AccountSummary, EvaluationDetail, PolicySummary};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, now, opt_text, parse_datetime, parse_enum};
use crate::inputs::EvaluationCreate;
use crate::repos::account::fetch_account;
use crate::repos::policy::fetch_policy;
use crate::service::GuardService;
use crate::updates::evaluation::EvaluationUpdate;

const DETAIL_SELECT: &str = "SELECT e.id, e.policy_id, e.account_id, e.status, e.last_checked_at, e.findings,
            p.name, p.control_id, p.provider,
            a.provider, a.display_name, a.external_id
     FROM policy_evaluations e
     JOIN policies p ON p.id = e.policy_id
     JOIN cloud_accounts a ON a.id = e.account_id";

pub(crate) const CONFLICT_MESSAGE: &str = "Evaluation for this policy and account already exists";

fn row_to_detail(row: &libsql::Row) -> Result<EvaluationDetail, DatabaseError> {
    let evaluation = PolicyEvaluation {
        id: row.get(0)?,
        policy_id: row.get(1)?,
        account_id: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        last_checked_at: parse_datetime(&row.get::<String>(4)?)?,
        findings: get_opt_string(row, 5)?,
    };
    let policy = PolicySummary {
        id: evaluation.policy_id,
        name: row.get(6)?,
        control_id: row.get(7)?,
        provider: parse_enum(&row.get::<String>(8)?)?,
    };
    let account = AccountSummary {
        id: evaluation.account_id,
        provider: parse_enum(&row.get::<String>(9)?)?,
        display_name: row.get(10)?,
        external_id: row.get(11)?,
    };
    Ok(EvaluationDetail {
        evaluation,
        policy,
        account,
    })
}

async fn fetch_detail(conn: &Connection, id: i64) -> Result<EvaluationDetail, DatabaseError> {
    let mut rows = conn
        .query(&format!("{DETAIL_SELECT} WHERE e.id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("Evaluation", id))?;
    row_to_detail(&row)
}

/// Insert one evaluation after checking both ends exist.
pub(crate) async fn insert_evaluation(
    conn: &Connection,
    input: &EvaluationCreate,
) -> Result<i64, DatabaseError> {
    fetch_policy(conn, input.policy_id).await?;
    fetch_account(conn, input.account_id).await?;

    conn.execute(
        "INSERT INTO policy_evaluations (policy_id, account_id, status, last_checked_at, findings)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            input.policy_id,
            input.account_id,
            input.status.as_str(),
            format_datetime(now()),
            opt_text(input.findings.as_deref())
        ],
    )
    .await
    .map_err(|e| DatabaseError::on_write(e, CONFLICT_MESSAGE))?;
    Ok(conn.last_insert_rowid())
}

impl GuardService {
    /// Record the result of checking one policy against one account.
    ///
    /// # Errors
    ///
    /// `NotFound` if either id is dangling, `Conflict` if the pair already
    /// has an evaluation.
    pub async fn create_evaluation(
        &self,
        input: EvaluationCreate,
    ) -> Result<EvaluationDetail, DatabaseError> {
        let conn = self.db().conn().await;
        let id = insert_evaluation(&conn, &input).await?;
        tracing::debug!(
            evaluation_id = id,
            policy_id = input.policy_id,
            account_id = input.account_id,
            status = %input.status,
            "evaluation recorded"
        );
        fetch_detail(&conn, id).await
    }

    pub async fn get_evaluation(&self, id: i64) -> Result<EvaluationDetail, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_detail(&conn, id).await
    }

    /// All evaluations, most recently checked first.
    pub async fn list_evaluations(&self) -> Result<Vec<EvaluationDetail>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                &format!("{DETAIL_SELECT} ORDER BY e.last_checked_at DESC, e.id DESC"),
                (),
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_detail(&row)?);
        }
        Ok(results)
    }

    /// Apply the given fields and refresh `last_checked_at`.
    ///
    /// With no fields set, returns the stored row untouched.
    pub async fn update_evaluation(
        &self,
        id: i64,
        update: EvaluationUpdate,
    ) -> Result<EvaluationDetail, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(ref findings) = update.findings {
            sets.push(format!("findings = ?{idx}"));
            params.push(opt_text(findings.as_deref()));
            idx += 1;
        }

        let conn = self.db().conn().await;
        if sets.is_empty() {
            return fetch_detail(&conn, id).await;
        }

        sets.push(format!("last_checked_at = ?{idx}"));
        params.push(format_datetime(now()).into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE policy_evaluations SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, libsql::params_from_iter(params)).await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("Evaluation", id));
        }
        fetch_detail(&conn, id).await
    }

    pub async fn delete_evaluation(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.db().conn().await;
        let changed = conn
            .execute("DELETE FROM policy_evaluations WHERE id = ?1", [id])
            .await?;
        Ok(changed > 0)
    }
}
