//! Read-path aggregation over pre-computed visit buckets.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::domain::entities::{Link, Principal, Visit, VisitBucket};
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::error::AppError;

pub const MIN_RANGE_DAYS: i64 = 1;
pub const MAX_RANGE_DAYS: i64 = 30;

/// Size of the best-effort "recent activity" sample. Not used for any
/// aggregate; purely presentational.
const RECENT_VISITS_LIMIT: i64 = 10;

/// Aggregated view of one link's visit history.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub link: Link,
    pub range_days: i64,
    /// Distinct ips over the link's entire history. Intentionally not
    /// limited to the bucket range: the original behavior mixes a
    /// range-limited bucket series with an all-time visitor count, and that
    /// discrepancy is preserved as observed rather than silently changed.
    pub unique_visitors: i64,
    /// Ascending by `bucket_start`, range-limited.
    pub buckets: Vec<VisitBucket>,
    /// Newest first, at most [`RECENT_VISITS_LIMIT`].
    pub recent: Vec<Visit>,
}

/// Assembles stats snapshots from buckets instead of scanning raw visits.
///
/// Summary totals (`visit_count`, `last_visited_at`) are read from the link
/// row, not summed from buckets, so pruned history cannot skew them.
pub struct StatsService {
    links: Arc<dyn LinkRepository>,
    visits: Arc<dyn VisitRepository>,
}

impl StatsService {
    pub fn new(links: Arc<dyn LinkRepository>, visits: Arc<dyn VisitRepository>) -> Self {
        Self { links, visits }
    }

    /// Computes the snapshot for one of the principal's links.
    ///
    /// Buckets with `bucket_start` exactly at `now - range_days` are
    /// included.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - `range_days` outside `[1, 30]`
    /// - [`AppError::NotFound`] - alias unknown or owned by someone else
    /// - [`AppError::Internal`] - storage errors
    pub async fn compute_stats(
        &self,
        principal: &Principal,
        alias: &str,
        range_days: i64,
        now: DateTime<Utc>,
    ) -> Result<StatsSnapshot, AppError> {
        if !(MIN_RANGE_DAYS..=MAX_RANGE_DAYS).contains(&range_days) {
            return Err(AppError::validation(
                format!("range must be between {MIN_RANGE_DAYS} and {MAX_RANGE_DAYS} days"),
                json!({ "range": range_days }),
            ));
        }

        let link = self
            .links
            .find_by_alias_and_owner(alias, principal.id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "alias": alias })))?;

        let range_start = now - Duration::days(range_days);

        let buckets = self.visits.list_buckets_since(link.id, range_start).await?;
        let recent = self.visits.list_recent(link.id, RECENT_VISITS_LIMIT).await?;
        let unique_visitors = self.visits.count_distinct_ips(link.id).await?;

        Ok(StatsSnapshot {
            link,
            range_days,
            unique_visitors,
            buckets,
            recent,
        })
    }
}
