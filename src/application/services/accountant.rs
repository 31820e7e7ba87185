//! Visit accounting service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Timelike, Utc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;

use crate::domain::repositories::VisitRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;

/// Rolling uniqueness window, anchored at the visit timestamp.
///
/// Deliberately a different window than the hourly bucket truncation: two
/// visits can share a bucket yet both be unique, and vice versa.
const UNIQUENESS_WINDOW_HOURS: i64 = 1;

/// Retries after the first attempt; keeps worst-case accounting latency
/// bounded instead of spinning on a contended link.
const RETRY_ATTEMPTS: usize = 2;
const RETRY_DELAY_MS: u64 = 50;

/// Owns the accounting policy for registered visits.
///
/// Derives the bucket key and the uniqueness window from the event
/// timestamp and drives the atomic three-way update through the repository,
/// retrying a bounded number of times on storage contention. Callers never
/// wait for this in the redirect path; the worker invokes it off-request.
pub struct AccountantService {
    visits: Arc<dyn VisitRepository>,
}

impl AccountantService {
    pub fn new(visits: Arc<dyn VisitRepository>) -> Self {
        Self { visits }
    }

    /// Registers one visit: counter bump, visit row, bucket upsert.
    ///
    /// # Errors
    ///
    /// Returns the repository error once the retry budget is exhausted or
    /// immediately for non-retryable failures. The caller reports it; it is
    /// never retried synchronously in a request path.
    pub async fn register_visit(&self, event: &VisitEvent) -> Result<(), AppError> {
        let bucket = bucket_start(event.occurred_at);
        let window_start = event.occurred_at - Duration::hours(UNIQUENESS_WINDOW_HOURS);

        let strategy = FixedInterval::from_millis(RETRY_DELAY_MS).take(RETRY_ATTEMPTS);
        RetryIf::spawn(
            strategy,
            || self.visits.register_visit(event, bucket, window_start),
            |e: &AppError| e.is_retryable(),
        )
        .await
    }
}

/// Truncates a timestamp to the top of its hour.
pub fn bucket_start(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .expect("zeroing sub-hour fields is always valid")
}
