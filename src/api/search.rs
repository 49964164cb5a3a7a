//! Movie, genre and actor search endpoints.
//!
//! Handlers only translate HTTP input into [`SearchService`] calls.
//!
//! [`SearchService`]: crate::services::SearchService

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SearchPageQuery};
use crate::domain::paging::ResultPage;
use crate::services::{
    ActorSearchByNameRequest, MovieSearchByTitleAndGenreRequest, MovieSearchByTitleRequest,
    MovieSearchRequest, MovieSearchResult, SearchError,
};

type MoviePage = Json<ApiResponse<ResultPage<MovieSearchResult>>>;
type NamePage = Json<ApiResponse<ResultPage<String>>>;

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Unsupported(msg) => Self::NotImplemented(msg),
            SearchError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/search/movie/{title}`
pub async fn search_movie_by_title(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    Query(page): Query<SearchPageQuery>,
) -> Result<MoviePage, ApiError> {
    let request = MovieSearchByTitleRequest {
        title,
        page: page.page,
        page_size: page.page_size,
        ..Default::default()
    };
    let results = state.search_service().search_by_title(request).await?;
    Ok(Json(ApiResponse::success(results)))
}

/// `POST /api/search/movie`
pub async fn search_movie(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MovieSearchByTitleRequest>,
) -> Result<MoviePage, ApiError> {
    let results = state.search_service().search_by_title(request).await?;
    Ok(Json(ApiResponse::success(results)))
}

/// `POST /api/search/movie-genre`
pub async fn search_movie_and_genre(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MovieSearchByTitleAndGenreRequest>,
) -> Result<MoviePage, ApiError> {
    let results = state
        .search_service()
        .search_by_title_and_genre(request)
        .await?;
    Ok(Json(ApiResponse::success(results)))
}

/// `POST /api/search/movies`
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MovieSearchRequest>,
) -> Result<MoviePage, ApiError> {
    let results = state
        .search_service()
        .search_by_title_genre_and_actor(request)
        .await?;
    Ok(Json(ApiResponse::success(results)))
}

/// `GET /api/search/genres`
pub async fn get_genres(State(state): State<Arc<AppState>>) -> Result<NamePage, ApiError> {
    let genres = state.search_service().get_genres().await?;
    Ok(Json(ApiResponse::success(genres)))
}

/// `GET /api/search/genre/{name}`
pub async fn search_genre(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(page): Query<SearchPageQuery>,
) -> Result<MoviePage, ApiError> {
    let results = state
        .search_service()
        .search_by_genre(page.page, page.page_size, &[name])
        .await?;
    Ok(Json(ApiResponse::success(results)))
}

const fn first_page() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreIdsQuery {
    #[serde(default)]
    pub ids: String,
    #[serde(default = "first_page")]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
}

/// `GET /api/search/genre-ids?ids=1,2`
pub async fn search_genre_ids(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GenreIdsQuery>,
) -> Result<MoviePage, ApiError> {
    let ids = query
        .ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i32>()
                .map_err(|_| ApiError::validation(format!("Invalid genre id: {id}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let results = state
        .search_service()
        .search_by_genre_ids(query.page, query.page_size, &ids)
        .await?;
    Ok(Json(ApiResponse::success(results)))
}

/// `POST /api/search/actors`
pub async fn search_actors(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActorSearchByNameRequest>,
) -> Result<NamePage, ApiError> {
    let actors = state.search_service().search_actors_by_name(request).await?;
    Ok(Json(ApiResponse::success(actors)))
}
