//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, and the visit accounting pipeline
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_event`] - Visit accounting event model
//! - [`visit_worker`] - Asynchronous visit accounting worker
//!
//! # Visit Accounting Flow
//!
//! 1. The redirect handler resolves the alias and decides the redirect
//! 2. A [`visit_event::VisitEvent`] is sent to a bounded async channel
//! 3. [`visit_worker::run_visit_worker`] drains events into the accountant
//! 4. The accountant commits the three-way update through
//!    [`repositories::VisitRepository`]; failures are logged, never bounced
//!    back into the request path

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
