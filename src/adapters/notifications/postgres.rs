//! PostgreSQL implementation of NotificationStore.
//!
//! Rows live in the `notifications` table (see `migrations/`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, NotificationId, TenantId, Timestamp, UserId,
    ValidationError,
};
use crate::domain::notification::{NotificationKind, NotificationRecord};
use crate::ports::NotificationStore;

/// PostgreSQL implementation of the NotificationStore port.
pub struct PostgresNotificationStore {
    pool: PgPool,
}

impl PostgresNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a notification.
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: String,
    tenant_id: String,
    kind: String,
    title: String,
    message: String,
    payload: JsonValue,
    source_event_id: Uuid,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for NotificationRecord {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let corrupt = |e: ValidationError| DomainError::new(ErrorCode::DatabaseError, e.to_string());

        Ok(NotificationRecord {
            id: NotificationId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(corrupt)?,
            tenant_id: TenantId::new(row.tenant_id).map_err(corrupt)?,
            kind: row.kind.parse::<NotificationKind>().map_err(corrupt)?,
            title: row.title,
            message: row.message,
            payload: row.payload,
            source_event_id: EventId::from_uuid(row.source_event_id),
            is_read: row.is_read,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn save(&self, record: &NotificationRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, user_id, tenant_id, kind, title, message, payload,
                source_event_id, is_read, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_str())
        .bind(record.tenant_id.as_str())
        .bind(record.kind.as_str())
        .bind(&record.title)
        .bind(&record.message)
        .bind(&record.payload)
        .bind(record.source_event_id.as_uuid())
        .bind(record.is_read)
        .bind(record.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::PersistenceFailure,
                format!("Failed to save notification: {}", e),
            )
        })?;

        Ok(())
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE user_id = $1 AND tenant_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(user_id.as_str())
        .bind(tenant_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark notifications read", e))?;

        Ok(result.rows_affected())
    }

    async fn mark_read(&self, id: &NotificationId, user_id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark notification read", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::NotificationNotFound,
                format!("Notification {} not found", id),
            ));
        }
        Ok(())
    }

    async fn unread_count(&self, user_id: &UserId, tenant_id: &TenantId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE user_id = $1 AND tenant_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(user_id.as_str())
        .bind(tenant_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count unread notifications", e))?;

        Ok(count.max(0) as u64)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, DomainError> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, tenant_id, kind, title, message, payload,
                   source_event_id, is_read, created_at
            FROM notifications
            WHERE user_id = $1 AND tenant_id = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(tenant_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list notifications", e))?;

        rows.into_iter().map(NotificationRecord::try_from).collect()
    }
}
