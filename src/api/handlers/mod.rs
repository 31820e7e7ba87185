//! HTTP request handlers.

pub mod health;
pub mod redirect;
pub mod stats;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use stats::stats_handler;
