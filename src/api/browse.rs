use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, BrowseQuery};
use crate::domain::paging::ResultPage;
use crate::services::MovieSearchResult;

/// `GET /api/browse/movies`
pub async fn browse_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ApiResponse<ResultPage<MovieSearchResult>>>, ApiError> {
    let movies = state
        .search_service()
        .browse(query.page, query.page_size)
        .await?;
    Ok(Json(ApiResponse::success(movies)))
}

/// `GET /api/browse/actors`
pub async fn browse_actors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ApiResponse<ResultPage<String>>>, ApiError> {
    let actors = state
        .search_service()
        .get_actors(query.page, query.page_size)
        .await?;
    Ok(Json(ApiResponse::success(actors)))
}
