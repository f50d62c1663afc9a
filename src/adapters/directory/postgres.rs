//! PostgreSQL implementation of EnrollmentDirectory.
//!
//! Reads the `enrollments` and `tenant_memberships` tables owned by the
//! surrounding platform.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, TenantId, UserId};
use crate::ports::EnrollmentDirectory;

pub struct PostgresEnrollmentDirectory {
    pool: PgPool,
}

impl PostgresEnrollmentDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_user_ids(rows: Vec<String>) -> Result<Vec<UserId>, DomainError> {
    rows.into_iter()
        .map(|raw| {
            UserId::new(raw).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })
        })
        .collect()
}

#[async_trait]
impl EnrollmentDirectory for PostgresEnrollmentDirectory {
    async fn students_in_course(
        &self,
        tenant_id: &TenantId,
        course_id: &CourseId,
    ) -> Result<Vec<UserId>, DomainError> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM enrollments
            WHERE tenant_id = $1 AND course_id = $2 AND status = 'active'
            ORDER BY user_id
            "#,
        )
        .bind(tenant_id.as_str())
        .bind(course_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load course enrollments: {}", e),
            )
        })?;

        to_user_ids(rows)
    }

    async fn students_in_tenant(&self, tenant_id: &TenantId) -> Result<Vec<UserId>, DomainError> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM tenant_memberships
            WHERE tenant_id = $1 AND role = 'student'
            ORDER BY user_id
            "#,
        )
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load tenant members: {}", e),
            )
        })?;

        to_user_ids(rows)
    }
}
