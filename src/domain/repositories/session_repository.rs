//! Repository trait for session lookup.

use crate::domain::entities::SessionRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage behind the authentication collaborator.
///
/// Sessions are created by the admin tooling and only looked up (and
/// eventually deleted) here; tokens arrive already hashed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSessionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session (joined with its user) by token hash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, AppError>;

    /// Deletes a session by id. Used to reap expired sessions on sight.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, session_id: i64) -> Result<(), AppError>;
}
