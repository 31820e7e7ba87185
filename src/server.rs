//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, worker spawning, and the Axum
//! server lifecycle.

use crate::application::services::{AccountantService, AuthService, ResolverService, StatsService};
use crate::config::Config;
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::persistence::{
    PgLinkRepository, PgSessionRepository, PgVisitRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (tuned from config)
/// - Migrations
/// - Background visit accounting worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migrations, bind, or the
/// server runtime fail.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let visit_repository = Arc::new(PgVisitRepository::new(pool.clone()));
    let session_repository = Arc::new(PgSessionRepository::new(pool.clone()));

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);

    let accountant = Arc::new(AccountantService::new(visit_repository.clone()));
    tokio::spawn(run_visit_worker(visit_rx, accountant));
    tracing::info!("Visit worker started");

    let state = AppState {
        resolver: Arc::new(ResolverService::new(
            link_repository.clone(),
            visit_tx.clone(),
        )),
        stats: Arc::new(StatsService::new(
            link_repository.clone(),
            visit_repository,
        )),
        auth: Arc::new(AuthService::new(
            session_repository,
            config.session_signing_secret.clone(),
        )),
        links: link_repository,
        visit_tx,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
