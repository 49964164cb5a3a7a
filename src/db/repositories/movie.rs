use sea_orm::{DatabaseConnection, DbErr, Order};

use super::query::QueryRepository;
use crate::domain::paging::{PageRequest, PageWindow};
use crate::domain::{MovieOrdering, MovieSortField};
use crate::entities::movies;
use crate::services::filter::MovieFilter;

/// Repository for movie rows.
pub struct MovieRepository {
    movies: QueryRepository<movies::Entity>,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            movies: QueryRepository::new(conn),
        }
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    fn order_columns(ordering: MovieOrdering) -> Vec<(movies::Column, Order)> {
        let direction = if ordering.order().is_ascending() {
            Order::Asc
        } else {
            Order::Desc
        };

        let primary = match ordering.field {
            MovieSortField::Natural => return vec![(movies::Column::Id, direction)],
            MovieSortField::Title => movies::Column::Title,
            MovieSortField::ReleaseDate => movies::Column::ReleaseDate,
            MovieSortField::Popularity => movies::Column::Popularity,
            MovieSortField::VoteAverage => movies::Column::VoteAverage,
            MovieSortField::VoteCount => movies::Column::VoteCount,
        };

        // Ties fall back to insertion order so pages never overlap
        vec![(primary, direction), (movies::Column::Id, Order::Asc)]
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of movies passing `filter`.
    pub async fn count(&self, filter: &MovieFilter) -> Result<u64, DbErr> {
        match filter.clone().into_condition() {
            Some(condition) => self.movies.count(condition).await,
            None => Ok(0),
        }
    }

    /// Counts the filtered set, resolves the page window against that
    /// count, then fetches exactly that window.
    pub async fn filtered_page(
        &self,
        filter: MovieFilter,
        ordering: MovieOrdering,
        page: PageRequest,
    ) -> Result<(Vec<movies::Model>, PageWindow), DbErr> {
        let Some(condition) = filter.into_condition() else {
            return Ok((Vec::new(), page.window(0)));
        };

        let total = self.movies.count(condition.clone()).await?;
        let window = page.window(total);
        if total == 0 {
            return Ok((Vec::new(), window));
        }

        let rows = self
            .movies
            .page(condition, &Self::order_columns(ordering), &window)
            .await?;

        Ok((rows, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_is_by_id() {
        let columns = MovieRepository::order_columns(MovieOrdering::default());
        assert_eq!(columns.len(), 1);
        assert!(matches!(columns[0], (movies::Column::Id, Order::Asc)));
    }

    #[test]
    fn explicit_order_breaks_ties_by_id() {
        let columns = MovieRepository::order_columns(MovieOrdering {
            field: MovieSortField::Popularity,
            descending: true,
        });
        assert!(matches!(columns[0], (movies::Column::Popularity, Order::Desc)));
        assert!(matches!(columns[1], (movies::Column::Id, Order::Asc)));
    }
}
