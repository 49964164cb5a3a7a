//! Domain service for catalog searches.
//!
//! Title, genre and actor filters are evaluated independently against the
//! whole catalog and intersected by movie id, then counted and paginated
//! through [`PageRequest`].

use crate::domain::paging::{PageRequest, ResultPage};
use crate::domain::{MatchMode, MovieId, MovieOrdering};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Database error: {0}")]
    Database(String),

    /// The variant exists but is not wired up; distinct from a failure.
    #[error("Unsupported search: {0}")]
    Unsupported(String),
}

impl From<sea_orm::DbErr> for SearchError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// One movie as returned by searches, with its genre and actor names
/// flattened into sorted, comma-joined strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSearchResult {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
    pub original_language: String,
    pub popularity: f64,
    pub vote_count: i64,
    pub vote_average: f64,
    pub poster_url: Option<String>,
    pub genre: String,
    pub actors: String,
}

const fn default_page() -> i64 {
    1
}

/// Title-only movie search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieSearchByTitleRequest {
    pub title: String,
    #[serde(default = "default_page")]
    pub page: i64,
    /// Zero returns every result.
    pub page_size: i64,
    /// Treat `title` as a raw SQL `LIKE` pattern.
    #[serde(alias = "useWildcard")]
    pub use_sql_like_operator: bool,
    pub sort: MovieOrdering,
}

/// Title plus genre movie search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieSearchByTitleAndGenreRequest {
    pub title: String,
    pub genres: Vec<String>,
    pub match_all_genres: bool,
    #[serde(default = "default_page")]
    pub page: i64,
    pub page_size: i64,
    #[serde(alias = "useWildcard")]
    pub use_sql_like_operator: bool,
    pub sort: MovieOrdering,
}

/// Title, genre and actor movie search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieSearchRequest {
    pub title: String,
    pub genres: Vec<String>,
    pub match_all_genres: bool,
    pub actors: Vec<String>,
    pub match_all_actors: bool,
    #[serde(default = "default_page")]
    pub page: i64,
    pub page_size: i64,
    #[serde(alias = "useWildcard")]
    pub use_sql_like_operator: bool,
    pub sort: MovieOrdering,
}

impl From<MovieSearchByTitleAndGenreRequest> for MovieSearchRequest {
    fn from(request: MovieSearchByTitleAndGenreRequest) -> Self {
        Self {
            title: request.title,
            genres: request.genres,
            match_all_genres: request.match_all_genres,
            actors: Vec::new(),
            match_all_actors: false,
            page: request.page,
            page_size: request.page_size,
            use_sql_like_operator: request.use_sql_like_operator,
            sort: request.sort,
        }
    }
}

impl MovieSearchRequest {
    #[must_use]
    pub const fn genre_mode(&self) -> MatchMode {
        MatchMode::from_match_all(self.match_all_genres)
    }

    #[must_use]
    pub const fn actor_mode(&self) -> MatchMode {
        MatchMode::from_match_all(self.match_all_actors)
    }

    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::sanitize(self.page, self.page_size)
    }
}

/// Actor name search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActorSearchByNameRequest {
    pub name: String,
    #[serde(default = "default_page")]
    pub page: i64,
    pub page_size: i64,
    #[serde(alias = "useWildcard")]
    pub use_sql_like_operator: bool,
}

/// Domain service trait for searching the catalog.
///
/// Implementations never write to the store.
#[async_trait::async_trait]
pub trait SearchService: Send + Sync {
    /// Movies whose title matches; blank matches everything.
    async fn search_by_title(
        &self,
        request: MovieSearchByTitleRequest,
    ) -> Result<ResultPage<MovieSearchResult>, SearchError>;

    /// Movies carrying any of `genres`.
    async fn search_by_genre(
        &self,
        page: i64,
        page_size: i64,
        genres: &[String],
    ) -> Result<ResultPage<MovieSearchResult>, SearchError>;

    /// Genre search by stored id. Always [`SearchError::Unsupported`].
    async fn search_by_genre_ids(
        &self,
        page: i64,
        page_size: i64,
        genre_ids: &[i32],
    ) -> Result<ResultPage<MovieSearchResult>, SearchError>;

    async fn search_by_title_and_genre(
        &self,
        request: MovieSearchByTitleAndGenreRequest,
    ) -> Result<ResultPage<MovieSearchResult>, SearchError>;

    async fn search_by_title_genre_and_actor(
        &self,
        request: MovieSearchRequest,
    ) -> Result<ResultPage<MovieSearchResult>, SearchError>;

    /// Unfiltered listing in store order.
    async fn browse(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<ResultPage<MovieSearchResult>, SearchError>;

    /// Every genre name, alphabetical, on one page.
    async fn get_genres(&self) -> Result<ResultPage<String>, SearchError> {
        self.list_genres(PageRequest::all()).await
    }

    /// Genre names, alphabetical, paginated.
    async fn list_genres(&self, page: PageRequest) -> Result<ResultPage<String>, SearchError>;

    /// Actor names, alphabetical, paginated.
    async fn get_actors(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<ResultPage<String>, SearchError>;

    async fn search_actors_by_name(
        &self,
        request: ActorSearchByNameRequest,
    ) -> Result<ResultPage<String>, SearchError>;
}
