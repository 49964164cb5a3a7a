use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, HealthResponse};
use crate::db::CatalogCounts;

/// `GET /api/system/health`
///
/// 200 when the store answers, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let database = state.store().ping().await.is_ok();
    let response = HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ApiResponse::success(response))).into_response()
}

/// `GET /api/system/stats`
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CatalogCounts>>, ApiError> {
    let counts = state.store().catalog_counts().await?;
    Ok(Json(ApiResponse::success(counts)))
}
