//! DTOs for the stats snapshot endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::StatsSnapshot;

/// Query parameters for `GET /stats/{alias}`.
#[derive(Debug, Deserialize)]
pub struct StatsQueryParams {
    /// Range in days; defaults to 7, bounded to 1-30 by the service.
    pub range: Option<i64>,
}

/// Snapshot of a link's visit history.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub link: LinkInfo,
    pub summary: StatsSummary,
    pub buckets: Vec<BucketPoint>,
    pub recent: Vec<RecentVisit>,
}

#[derive(Debug, Serialize)]
pub struct LinkInfo {
    pub alias: String,
    pub destination_url: String,
    pub description: Option<String>,
    pub created: DateTime<Utc>,
    pub visit_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Totals come from the link row itself, not from summing buckets, so
/// pruned history cannot skew them. `unique_visitors` counts distinct ips
/// over the full history while `buckets` are range-limited.
#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub last_visit: Option<DateTime<Utc>>,
    pub range_days: i64,
}

#[derive(Debug, Serialize)]
pub struct BucketPoint {
    pub bucket_start: DateTime<Utc>,
    pub visits: i64,
    pub unique_ips: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentVisit {
    pub ip: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub is_unique: bool,
    pub created: DateTime<Utc>,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(snapshot: StatsSnapshot) -> Self {
        let link = snapshot.link;
        Self {
            summary: StatsSummary {
                total_visits: link.visit_count,
                unique_visitors: snapshot.unique_visitors,
                last_visit: link.last_visited_at,
                range_days: snapshot.range_days,
            },
            link: LinkInfo {
                alias: link.alias,
                destination_url: link.destination_url,
                description: link.description,
                created: link.created,
                visit_count: link.visit_count,
                expires_at: link.expires_at,
            },
            buckets: snapshot
                .buckets
                .into_iter()
                .map(|b| BucketPoint {
                    bucket_start: b.bucket_start,
                    visits: b.visits,
                    unique_ips: b.unique_ips,
                })
                .collect(),
            recent: snapshot
                .recent
                .into_iter()
                .map(|v| RecentVisit {
                    ip: v.ip,
                    user_agent: v.user_agent,
                    referer: v.referer,
                    is_unique: v.is_unique,
                    created: v.created,
                })
                .collect(),
        }
    }
}
