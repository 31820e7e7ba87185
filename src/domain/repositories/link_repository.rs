//! Repository trait for link lookup.

use crate::domain::entities::Link;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-side access to links.
///
/// The redirect path only ever reads links; the accounting path mutates the
/// counters through [`crate::domain::repositories::VisitRepository`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Looks up a link by its alias, regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError>;

    /// Looks up a link by alias, scoped to its owner.
    ///
    /// Used by the stats path so a principal can only inspect their own
    /// links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_alias_and_owner(
        &self,
        alias: &str,
        user_id: i64,
    ) -> Result<Option<Link>, AppError>;

    /// Cheap connectivity probe for the health endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the database is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
