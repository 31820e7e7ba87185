//! PostgreSQL implementation of session lookup.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::SessionRecord;
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

/// PostgreSQL repository for session storage.
///
/// Only hashed tokens ever touch this table; issuing sessions is the admin
/// CLI's job.
pub struct PgSessionRepository {
    pool: Arc<PgPool>,
}

impl PgSessionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, AppError> {
        let session = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT s.id AS session_id, u.id AS user_id, u.name AS user_name, s.expires_at
            FROM auth_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(session)
    }

    async fn delete(&self, session_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
