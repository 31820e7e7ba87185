//! Authenticated principal and session record.

use chrono::{DateTime, Utc};

/// The authenticated owner of a session, attached to stats requests.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: i64,
    pub name: String,
}

/// A session row joined with its user, looked up by token hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRecord {
    pub session_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.user_id,
            name: self.user_name.clone(),
        }
    }
}
