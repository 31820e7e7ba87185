//! Handler for short alias redirect.

use axum::{
    extract::{ConnectInfo, Path, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use std::net::SocketAddr;

use crate::application::services::VisitContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short alias to its destination URL.
///
/// # Endpoint
///
/// `GET /s/{alias}`
///
/// # Request Flow
///
/// 1. Capture the visit context (ip, user agent, referer, query, now) once
/// 2. Resolve the alias and check eligibility
/// 3. A visit event is enqueued for background accounting; this response
///    never waits for it
/// 4. Return `302 Found` with the computed destination
///
/// # Errors
///
/// - 404 for an unknown alias
/// - 410 for disabled, expired, or visit-capped links, with distinct
///   `code` values in the error body
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = VisitContext {
        ip: client_ip(&headers, Some(addr), state.behind_proxy),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
        referer: headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
        query,
        now: Utc::now(),
    };

    let outcome = state.resolver.resolve(&alias, &ctx).await?;

    let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::FOUND);
    Ok((status, [(header::LOCATION, outcome.destination)]))
}
