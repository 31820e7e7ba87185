//! Application layer orchestrating domain operations.
//!
//! Services coordinate between the HTTP layer and the repository traits:
//!
//! - [`services::ResolverService`] - alias eligibility and redirect decisions
//! - [`services::AccountantService`] - transactional visit accounting
//! - [`services::StatsService`] - bucketed analytics snapshots
//! - [`services::AuthService`] - session-cookie authentication

pub mod services;
