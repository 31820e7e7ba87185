//! PostgreSQL implementation of link lookup.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link retrieval.
///
/// Uses prepared statements with positional binds; rows map onto the entity
/// through `FromRow`, so the column list must match the entity fields.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, user_id, alias, destination_url, description, status,
                   forward_params, expires_at, max_visits, visit_count,
                   last_visited_at, created
            FROM short_links
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_alias_and_owner(
        &self,
        alias: &str,
        user_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, user_id, alias, destination_url, description, status,
                   forward_params, expires_at, max_visits, visit_count,
                   last_visited_at, created
            FROM short_links
            WHERE alias = $1 AND user_id = $2
            "#,
        )
        .bind(alias)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
