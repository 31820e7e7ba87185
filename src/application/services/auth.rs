//! Session authentication service.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::Principal;
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;
use chrono::Utc;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Resolves session cookies to authenticated principals.
///
/// Raw session tokens are hashed with HMAC-SHA256 (keyed by
/// `signing_secret`) before lookup, so a read-only copy of the database is
/// not enough to forge a session. Expired sessions are deleted when seen.
pub struct AuthService {
    sessions: Arc<dyn SessionRepository>,
    signing_secret: String,
}

impl AuthService {
    /// # Arguments
    ///
    /// - `sessions` - session repository
    /// - `signing_secret` - HMAC key; must match the value used when the
    ///   sessions were issued
    pub fn new(sessions: Arc<dyn SessionRepository>, signing_secret: String) -> Self {
        Self {
            sessions,
            signing_secret,
        }
    }

    /// Authenticates a raw session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when the token is unknown or the
    /// session has expired, [`AppError::Internal`] on storage errors.
    pub async fn require_user(&self, token: &str) -> Result<Principal, AppError> {
        let token_hash = hash_session_token(&self.signing_secret, token);

        let session = self
            .sessions
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Unknown session" }))
            })?;

        if session.is_expired(Utc::now()) {
            // Best effort: a failed reap still rejects the session.
            let _ = self.sessions.delete(session.session_id).await;
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Session expired" }),
            ));
        }

        Ok(session.principal())
    }
}

/// Hashes a raw session token with HMAC-SHA256.
///
/// Returns a 64-character lowercase hex-encoded MAC. Shared with the admin
/// CLI so issued tokens and lookups agree.
pub fn hash_session_token(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
