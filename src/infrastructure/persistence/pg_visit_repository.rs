//! PostgreSQL implementation of visit accounting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Visit, VisitBucket};
use crate::domain::repositories::VisitRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;

/// PostgreSQL repository for the visit accounting unit and the analytics
/// read path.
///
/// All three writes of `register_visit` run inside one transaction. The
/// counter increment comes first on purpose: it takes the link's row lock,
/// so concurrent registrations for the same link queue up behind it and the
/// uniqueness probe and bucket upsert always see a consistent prefix of
/// earlier visits. Different links share nothing and proceed in parallel.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn register_visit(
        &self,
        event: &VisitEvent,
        bucket_start: DateTime<Utc>,
        window_start: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE short_links
            SET visit_count = visit_count + 1, last_visited_at = $2
            WHERE id = $1
            "#,
        )
        .bind(event.link_id)
        .bind(event.occurred_at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Link vanished during accounting",
                json!({ "link_id": event.link_id }),
            ));
        }

        let is_unique = if event.ip.is_empty() {
            false
        } else {
            let seen: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM short_link_visits
                    WHERE link_id = $1 AND ip = $2 AND created >= $3
                )
                "#,
            )
            .bind(event.link_id)
            .bind(&event.ip)
            .bind(window_start)
            .fetch_one(&mut *tx)
            .await?;
            !seen
        };

        sqlx::query(
            r#"
            INSERT INTO short_link_visits (link_id, ip, user_agent, referer, is_unique, created)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.link_id)
        .bind(&event.ip)
        .bind(&event.user_agent)
        .bind(&event.referer)
        .bind(is_unique)
        .bind(event.occurred_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO short_link_visit_buckets (link_id, bucket_start, visits, unique_ips)
            VALUES ($1, $2, 1, $3)
            ON CONFLICT (link_id, bucket_start) DO UPDATE
            SET visits = short_link_visit_buckets.visits + 1,
                unique_ips = short_link_visit_buckets.unique_ips + EXCLUDED.unique_ips
            "#,
        )
        .bind(event.link_id)
        .bind(bucket_start)
        .bind(if is_unique { 1i64 } else { 0i64 })
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_buckets_since(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<VisitBucket>, AppError> {
        let buckets = sqlx::query_as::<_, VisitBucket>(
            r#"
            SELECT link_id, bucket_start, visits, unique_ips
            FROM short_link_visit_buckets
            WHERE link_id = $1 AND bucket_start >= $2
            ORDER BY bucket_start ASC
            "#,
        )
        .bind(link_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(buckets)
    }

    async fn list_recent(&self, link_id: i64, limit: i64) -> Result<Vec<Visit>, AppError> {
        let visits = sqlx::query_as::<_, Visit>(
            r#"
            SELECT id, link_id, ip, user_agent, referer, is_unique, created
            FROM short_link_visits
            WHERE link_id = $1
            ORDER BY created DESC
            LIMIT $2
            "#,
        )
        .bind(link_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(visits)
    }

    async fn count_distinct_ips(&self, link_id: i64) -> Result<i64, AppError> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT ip)
            FROM short_link_visits
            WHERE link_id = $1
            "#,
        )
        .bind(link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count.unwrap_or(0))
    }
}
