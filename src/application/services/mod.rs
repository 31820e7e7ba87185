//! Business logic services.

pub mod accountant;
pub mod auth;
pub mod resolver;
pub mod stats;

pub use accountant::AccountantService;
pub use auth::AuthService;
pub use resolver::{RedirectOutcome, ResolverService, VisitContext};
pub use stats::{StatsService, StatsSnapshot};
