//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link lookup for the redirect and stats paths
//! - [`VisitRepository`] - Atomic visit accounting and analytics queries
//! - [`SessionRepository`] - Session lookup for the auth collaborator

pub mod link_repository;
pub mod session_repository;
pub mod visit_repository;

pub use link_repository::LinkRepository;
pub use session_repository::SessionRepository;
pub use visit_repository::VisitRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
