//! Visit and hourly rollup entities.

use chrono::{DateTime, Utc};

/// One row per resolved redirect.
///
/// Append-only: `is_unique` is decided when the row is written and never
/// revised afterwards, even if the classification window has since moved.
/// The ip is stored as given by the transport; an empty string means the
/// client address was unknown.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Visit {
    pub id: i64,
    pub link_id: i64,
    pub ip: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub is_unique: bool,
    pub created: DateTime<Utc>,
}

/// Hourly pre-aggregated rollup for one link.
///
/// Keyed by `(link_id, bucket_start)` where `bucket_start` is the visit
/// timestamp truncated to the top of the hour. Counters only increase; for
/// a fixed link the sum of `visits` over all buckets equals the link's
/// `visit_count`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VisitBucket {
    pub link_id: i64,
    pub bucket_start: DateTime<Utc>,
    pub visits: i64,
    pub unique_ips: i64,
}
