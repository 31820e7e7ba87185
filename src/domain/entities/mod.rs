//! Core business entities.

pub mod link;
pub mod principal;
pub mod visit;

pub use link::{Link, STATUS_ENABLED};
pub use principal::{Principal, SessionRecord};
pub use visit::{Visit, VisitBucket};
