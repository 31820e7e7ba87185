//! Visit event queued for asynchronous accounting.

use chrono::{DateTime, Utc};

/// Everything the accountant needs to register one redirect.
///
/// `occurred_at` is captured when the redirect is decided, so the uniqueness
/// window and the hourly bucket are anchored at request time even when the
/// event sits in the queue for a while.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub link_id: i64,
    /// Empty when the client address is unknown.
    pub ip: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl VisitEvent {
    pub fn new(
        link_id: i64,
        ip: String,
        user_agent: Option<&str>,
        referer: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            link_id,
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
            occurred_at,
        }
    }
}
