//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: all components healthy
/// - **503 Service Unavailable**: database unreachable or visit queue gone
///
/// A degraded visit queue means redirects still work but counters are
/// silently falling behind, which is worth paging on.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let queue_check = check_visit_queue(&state);

    let all_healthy = db_check.status == "ok" && queue_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            visit_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.links.ping().await {
        Ok(()) => CheckStatus {
            status: "ok".to_string(),
            message: "Connected".to_string(),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: format!("Database unreachable: {e:?}"),
        },
    }
}

fn check_visit_queue(state: &AppState) -> CheckStatus {
    if state.visit_tx.is_closed() {
        CheckStatus {
            status: "error".to_string(),
            message: "Visit worker stopped; accounting halted".to_string(),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: format!(
                "Queue slots free: {}/{}",
                state.visit_tx.capacity(),
                state.visit_tx.max_capacity()
            ),
        }
    }
}
