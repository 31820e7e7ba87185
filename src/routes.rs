//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /s/{alias}`      - Short link redirect (public)
//! - `GET /health`         - Health check: database, visit queue (public)
//! - `GET /stats/{alias}`  - Visit statistics (session cookie required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the stats surface
//! - **Authentication** - Session cookie resolved to a principal
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, redirect_handler, stats_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting keys on forwarded-for
///   headers instead of the peer socket address; enable only behind a
///   trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let stats_routes = Router::new()
        .route("/stats/{alias}", get(stats_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    let stats_routes = if behind_proxy {
        stats_routes.layer(rate_limit::smart_layer())
    } else {
        stats_routes.layer(rate_limit::peer_layer())
    };

    let router = Router::new()
        .route("/s/{alias}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(stats_routes)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
