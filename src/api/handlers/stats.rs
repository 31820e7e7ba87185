//! Handler for link visit statistics.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Utc;

use crate::api::dto::stats::{StatsQueryParams, StatsResponse};
use crate::domain::entities::Principal;
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_RANGE_DAYS: i64 = 7;

/// Returns the bucketed visit snapshot for one of the caller's links.
///
/// # Endpoint
///
/// `GET /stats/{alias}?range=N`
///
/// # Query Parameters
///
/// - `range` (optional): days of bucket history, default 7, bound 1-30
///
/// # Response
///
/// JSON `{link, summary, buckets, recent}`. Buckets ascend by hour and
/// include the range boundary; `recent` is a newest-first sample of up to
/// 10 visits.
///
/// # Errors
///
/// - 401 without a valid session (enforced by the auth middleware)
/// - 404 if the alias is unknown or owned by another user
/// - 422 if `range` is out of bounds
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
    Query(params): Query<StatsQueryParams>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<StatsResponse>, AppError> {
    let range_days = params.range.unwrap_or(DEFAULT_RANGE_DAYS);

    let snapshot = state
        .stats
        .compute_stats(&principal, &alias, range_days, Utc::now())
        .await?;

    Ok(Json(StatsResponse::from(snapshot)))
}
