//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx prepared
//! statements over a shared connection pool.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link lookup
//! - [`PgVisitRepository`] - Atomic visit accounting and analytics queries
//! - [`PgSessionRepository`] - Session storage

pub mod pg_link_repository;
pub mod pg_session_repository;
pub mod pg_visit_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_visit_repository::PgVisitRepository;
