//! Notification repository.
//!
//! `is_read` only ever moves from false to true.

use chrono::{DateTime, Utc};
use libsql::Connection;

use guard_core::entities::Notification;
use guard_core::enums::NotificationType;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_bool, now, parse_datetime, parse_enum};
use crate::inputs::NotificationCreate;
use crate::service::GuardService;

const SELECT_COLS: &str = "id, title, message, type, is_read, created_at";

fn row_to_notification(row: &libsql::Row) -> Result<Notification, DatabaseError> {
    Ok(Notification {
        id: row.get(0)?,
        title: row.get(1)?,
        message: row.get(2)?,
        notification_type: parse_enum(&row.get::<String>(3)?)?,
        is_read: get_bool(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

async fn fetch_notification(conn: &Connection, id: i64) -> Result<Notification, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM notifications WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("Notification", id))?;
    row_to_notification(&row)
}

/// Insert one unread notification with an explicit creation time.
///
/// Runs on whatever connection or transaction the caller holds.
pub(crate) async fn insert_notification(
    conn: &Connection,
    title: &str,
    message: &str,
    notification_type: NotificationType,
    created_at: DateTime<Utc>,
) -> Result<Notification, DatabaseError> {
    conn.execute(
        "INSERT INTO notifications (title, message, type, is_read, created_at)
         VALUES (?1, ?2, ?3, 0, ?4)",
        libsql::params![
            title,
            message,
            notification_type.as_str(),
            format_datetime(created_at)
        ],
    )
    .await?;

    Ok(Notification {
        id: conn.last_insert_rowid(),
        title: title.to_string(),
        message: message.to_string(),
        notification_type,
        is_read: false,
        created_at,
    })
}

impl GuardService {
    pub async fn create_notification(
        &self,
        input: NotificationCreate,
    ) -> Result<Notification, DatabaseError> {
        let conn = self.db().conn().await;
        insert_notification(
            &conn,
            &input.title,
            &input.message,
            input.notification_type,
            now(),
        )
        .await
    }

    pub async fn get_notification(&self, id: i64) -> Result<Notification, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_notification(&conn, id).await
    }

    /// All notifications, newest first.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM notifications ORDER BY created_at DESC, id DESC"
                ),
                (),
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_notification(&row)?);
        }
        Ok(results)
    }

    /// Mark one notification read. Idempotent.
    pub async fn mark_notification_read(&self, id: i64) -> Result<Notification, DatabaseError> {
        let conn = self.db().conn().await;
        conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND is_read = 0",
            [id],
        )
        .await?;
        fetch_notification(&conn, id).await
    }

    /// Mark every unread notification read, returning how many changed.
    pub async fn mark_all_notifications_read(&self) -> Result<u64, DatabaseError> {
        let conn = self.db().conn().await;
        let changed = conn
            .execute("UPDATE notifications SET is_read = 1 WHERE is_read = 0", ())
            .await?;
        tracing::debug!(count = changed, "notifications marked read");
        Ok(changed)
    }

    pub async fn unread_count(&self) -> Result<u64, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query("SELECT COUNT(*) FROM notifications WHERE is_read = 0", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        u64::try_from(row.get::<i64>(0)?)
            .map_err(|e| DatabaseError::InvalidState(format!("negative count: {e}")))
    }

    pub async fn delete_notification(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.db().conn().await;
        let changed = conn
            .execute("DELETE FROM notifications WHERE id = ?1", [id])
            .await?;
        Ok(changed > 0)
    }
}
