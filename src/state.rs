//! Shared application state injected into handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, ResolverService, StatsService};
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;

/// Handler-facing state.
///
/// Repositories are held as trait objects so tests can swap in in-memory
/// implementations without a database. `visit_tx` is exposed for the health
/// endpoint's queue check; handlers themselves enqueue through the resolver.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ResolverService>,
    pub stats: Arc<StatsService>,
    pub auth: Arc<AuthService>,
    pub links: Arc<dyn LinkRepository>,
    pub visit_tx: mpsc::Sender<VisitEvent>,
    /// Trust forwarded-for headers for client ip extraction.
    pub behind_proxy: bool,
}
