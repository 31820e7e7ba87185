//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer against real
//! backing services.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations

pub mod persistence;
