//! `SeaORM` implementation of the [`SearchService`] trait.
//!
//! Every dimension of a search is resolved into a [`MovieFilter`] against
//! the full catalog. Dimensions are resolved concurrently and intersected,
//! then one count query and one page query run against the result.

use std::collections::HashMap;
use std::sync::Arc;

use crate::db::Store;
use crate::domain::paging::{PageRequest, ResultPage};
use crate::domain::{MatchMode, MovieId, MovieOrdering};
use crate::entities::movies;
use crate::services::filter::{MovieFilter, TextMatch, join_names};
use crate::services::search_service::{
    ActorSearchByNameRequest, MovieSearchByTitleAndGenreRequest, MovieSearchByTitleRequest,
    MovieSearchRequest, MovieSearchResult, SearchError, SearchService,
};
use crate::services::timing::timed;

/// Filters of one movie search before they are resolved against the store.
struct MovieQuery<'a> {
    title: TextMatch,
    genres: &'a [String],
    genre_mode: MatchMode,
    actors: &'a [String],
    actor_mode: MatchMode,
    ordering: MovieOrdering,
    page: PageRequest,
}

impl<'a> MovieQuery<'a> {
    fn everything(page: PageRequest) -> Self {
        Self {
            title: TextMatch::Everything,
            genres: &[],
            genre_mode: MatchMode::Any,
            actors: &[],
            actor_mode: MatchMode::Any,
            ordering: MovieOrdering::default(),
            page,
        }
    }

    fn from_request(request: &'a MovieSearchRequest) -> Self {
        Self {
            title: TextMatch::new(&request.title, request.use_sql_like_operator),
            genres: &request.genres,
            genre_mode: request.genre_mode(),
            actors: &request.actors,
            actor_mode: request.actor_mode(),
            ordering: request.sort,
            page: request.page_request(),
        }
    }
}

pub struct SeaOrmSearchService {
    store: Arc<Store>,
}

impl SeaOrmSearchService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    async fn run(&self, query: MovieQuery<'_>) -> Result<ResultPage<MovieSearchResult>, SearchError> {
        let title_filter = if query.title.is_everything() {
            MovieFilter::Unrestricted
        } else {
            MovieFilter::Matching(
                query
                    .title
                    .condition(movies::Column::Title, movies::Column::TitleFolded),
            )
        };

        let genre_repo = self.store.genres();
        let actor_repo = self.store.actors();
        let (genre_filter, actor_filter) = futures::try_join!(
            genre_repo.movie_filter(query.genres, query.genre_mode),
            actor_repo.movie_filter(query.actors, query.actor_mode),
        )?;

        let filter = MovieFilter::intersect([title_filter, genre_filter, actor_filter]);
        let (rows, window) = self
            .store
            .movies()
            .filtered_page(filter, query.ordering, query.page)
            .await?;

        let results = self.shape(rows).await?;
        Ok(ResultPage::new(results, window))
    }

    /// Flattens rows into results, attaching genre and actor names.
    async fn shape(&self, rows: Vec<movies::Model>) -> Result<Vec<MovieSearchResult>, SearchError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|m| m.id).collect();
        let genre_repo = self.store.genres();
        let actor_repo = self.store.actors();
        let (mut genres, mut actors) = futures::try_join!(
            genre_repo.names_for_movies(&ids),
            actor_repo.names_for_movies(&ids),
        )?;

        Ok(rows
            .into_iter()
            .map(|movie| to_result(movie, &mut genres, &mut actors))
            .collect())
    }
}

fn to_result(
    movie: movies::Model,
    genres: &mut HashMap<i32, Vec<String>>,
    actors: &mut HashMap<i32, Vec<String>>,
) -> MovieSearchResult {
    MovieSearchResult {
        id: MovieId::new(movie.id),
        genre: join_names(genres.remove(&movie.id).unwrap_or_default()),
        actors: join_names(actors.remove(&movie.id).unwrap_or_default()),
        title: movie.title,
        overview: movie.overview,
        release_date: movie.release_date,
        original_language: movie.original_language,
        popularity: movie.popularity,
        vote_count: movie.vote_count,
        vote_average: movie.vote_average,
        poster_url: movie.poster_url,
    }
}

#[async_trait::async_trait]
impl SearchService for SeaOrmSearchService {
    async fn search_by_title(
        &self,
        request: MovieSearchByTitleRequest,
    ) -> Result<ResultPage<MovieSearchResult>, SearchError> {
        timed("search_by_title", async {
            let mut query = MovieQuery::everything(PageRequest::sanitize(
                request.page,
                request.page_size,
            ));
            query.title = TextMatch::new(&request.title, request.use_sql_like_operator);
            query.ordering = request.sort;
            self.run(query).await
        })
        .await
    }

    async fn search_by_genre(
        &self,
        page: i64,
        page_size: i64,
        genres: &[String],
    ) -> Result<ResultPage<MovieSearchResult>, SearchError> {
        timed("search_by_genre", async {
            let mut query = MovieQuery::everything(PageRequest::sanitize(page, page_size));
            query.genres = genres;
            self.run(query).await
        })
        .await
    }

    async fn search_by_genre_ids(
        &self,
        _page: i64,
        _page_size: i64,
        genre_ids: &[i32],
    ) -> Result<ResultPage<MovieSearchResult>, SearchError> {
        timed("search_by_genre_ids", async {
            Err(SearchError::Unsupported(format!(
                "search by genre ids ({} requested)",
                genre_ids.len()
            )))
        })
        .await
    }

    async fn search_by_title_and_genre(
        &self,
        request: MovieSearchByTitleAndGenreRequest,
    ) -> Result<ResultPage<MovieSearchResult>, SearchError> {
        let request = MovieSearchRequest::from(request);
        timed("search_by_title_and_genre", async {
            self.run(MovieQuery::from_request(&request)).await
        })
        .await
    }

    async fn search_by_title_genre_and_actor(
        &self,
        request: MovieSearchRequest,
    ) -> Result<ResultPage<MovieSearchResult>, SearchError> {
        timed("search_by_title_genre_and_actor", async {
            self.run(MovieQuery::from_request(&request)).await
        })
        .await
    }

    async fn browse(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<ResultPage<MovieSearchResult>, SearchError> {
        timed("browse", async {
            self.run(MovieQuery::everything(PageRequest::sanitize(page, page_size)))
                .await
        })
        .await
    }

    async fn list_genres(&self, page: PageRequest) -> Result<ResultPage<String>, SearchError> {
        timed("get_genres", async {
            self.store
                .genres()
                .list_names(&TextMatch::Everything, page)
                .await
                .map_err(SearchError::from)
        })
        .await
    }

    async fn get_actors(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<ResultPage<String>, SearchError> {
        timed("get_actors", async {
            self.store
                .actors()
                .list_names(&TextMatch::Everything, PageRequest::sanitize(page, page_size))
                .await
                .map_err(SearchError::from)
        })
        .await
    }

    async fn search_actors_by_name(
        &self,
        request: ActorSearchByNameRequest,
    ) -> Result<ResultPage<String>, SearchError> {
        timed("search_actors_by_name", async {
            let text = TextMatch::new(&request.name, request.use_sql_like_operator);
            self.store
                .actors()
                .list_names(&text, PageRequest::sanitize(request.page, request.page_size))
                .await
                .map_err(SearchError::from)
        })
        .await
    }
}
