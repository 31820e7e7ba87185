//! Repository trait for visit accounting and analytics queries.

use crate::domain::entities::{Visit, VisitBucket};
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Write and read access to visit accounting state.
///
/// `register_visit` is the single write entry point and owns the
/// consistency guarantees: the link counter bump, the visit row, and the
/// bucket upsert become visible together or not at all, and concurrent
/// registrations for the same link must not lose increments. Serialization
/// happens in the storage engine (row locks / conditional updates), never
/// with in-process locks, since several server instances may run at once.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVisitRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`; an in-memory implementation
///   lives in the integration test support code
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Atomically applies the three-way accounting update for one visit.
    ///
    /// In one unit: increments the link's `visit_count` and sets
    /// `last_visited_at`, inserts the visit row with its uniqueness
    /// classification, and upserts the `(link_id, bucket_start)` rollup.
    ///
    /// Classification: the visit is unique iff the ip is non-empty and no
    /// prior visit for the same `(link_id, ip)` exists with
    /// `created >= window_start`. Both `bucket_start` and `window_start`
    /// are computed by the caller from the event timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link no longer exists,
    /// [`AppError::Contention`] on retryable storage conflicts, and
    /// [`AppError::Internal`] on other database errors.
    async fn register_visit(
        &self,
        event: &VisitEvent,
        bucket_start: DateTime<Utc>,
        window_start: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Buckets for a link with `bucket_start >= since`, ascending.
    ///
    /// The ordering is a presentation contract: consumers render the series
    /// without re-sorting. A bucket starting exactly at `since` is included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_buckets_since(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<VisitBucket>, AppError>;

    /// Most recent visits for a link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_recent(&self, link_id: i64, limit: i64) -> Result<Vec<Visit>, AppError>;

    /// Count of distinct ips over the link's entire visit history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_distinct_ips(&self, link_id: i64) -> Result<i64, AppError>;
}
