//! Link entity representing a short alias mapped to a destination URL.

use chrono::{DateTime, Utc};

/// Status value for a link that may be redirected to.
pub const STATUS_ENABLED: i32 = 0;

/// A short link with its accounting state.
///
/// The alias is unique and immutable once created. `visit_count` and
/// `last_visited_at` are owned by the visit accounting path and only ever
/// move forward; nothing else mutates them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub user_id: i64,
    pub alias: String,
    pub destination_url: String,
    pub description: Option<String>,
    /// `0` means enabled; any other value disables the link.
    pub status: i32,
    /// When set, the incoming query string is appended to the destination.
    pub forward_params: bool,
    pub expires_at: Option<DateTime<Utc>>,
    /// `0` means unlimited.
    pub max_visits: i64,
    pub visit_count: i64,
    pub last_visited_at: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
}

impl Link {
    pub fn is_enabled(&self) -> bool {
        self.status == STATUS_ENABLED
    }

    /// A link whose expiry is exactly `now` counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_visits > 0 && self.visit_count >= self.max_visits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_link() -> Link {
        Link {
            id: 1,
            user_id: 1,
            alias: "promo".to_string(),
            destination_url: "https://example.com/landing".to_string(),
            description: None,
            status: STATUS_ENABLED,
            forward_params: false,
            expires_at: None,
            max_visits: 0,
            visit_count: 0,
            last_visited_at: None,
            created: Utc::now(),
        }
    }

    #[test]
    fn test_enabled_status() {
        let mut link = sample_link();
        assert!(link.is_enabled());

        link.status = 1;
        assert!(!link.is_enabled());
    }

    #[test]
    fn test_expiry_boundary_counts_as_expired() {
        let now = Utc::now();
        let mut link = sample_link();

        link.expires_at = Some(now);
        assert!(link.is_expired(now));

        link.expires_at = Some(now + Duration::seconds(1));
        assert!(!link.is_expired(now));

        link.expires_at = None;
        assert!(!link.is_expired(now));
    }

    #[test]
    fn test_visit_cap() {
        let mut link = sample_link();
        link.max_visits = 3;

        link.visit_count = 2;
        assert!(!link.is_exhausted());

        link.visit_count = 3;
        assert!(link.is_exhausted());
    }

    #[test]
    fn test_zero_cap_is_unlimited() {
        let mut link = sample_link();
        link.max_visits = 0;
        link.visit_count = 1_000_000;
        assert!(!link.is_exhausted());
    }
}
