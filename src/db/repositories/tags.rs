use std::collections::HashMap;
use std::marker::PhantomData;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter,
    QuerySelect, QueryTrait, RelationDef, RelationTrait,
};
use tracing::debug;

use super::query::QueryRepository;
use crate::domain::MatchMode;
use crate::domain::paging::{PageRequest, ResultPage};
use crate::entities::{actors, genres, movie_actors, movie_genres, movies};
use crate::services::filter::{MovieFilter, TextMatch, normalize_names};

/// Ids bound per `IN (...)` list, well under SQLite's variable limit.
pub const LOOKUP_CHUNK_SIZE: usize = 500;

/// A named entity attached to movies through a link table.
///
/// Genres and actors share their filtering rules; this trait names the
/// tables and columns so one repository serves both.
pub trait Tagging: Send + Sync + 'static {
    type Tag: EntityTrait;
    type Link: EntityTrait;

    /// Used in log lines.
    const KIND: &'static str;

    fn tag_id() -> <Self::Tag as EntityTrait>::Column;
    fn tag_name() -> <Self::Tag as EntityTrait>::Column;
    fn tag_folded() -> <Self::Tag as EntityTrait>::Column;
    fn link_movie() -> <Self::Link as EntityTrait>::Column;
    fn link_tag() -> <Self::Link as EntityTrait>::Column;
    fn link_to_tag() -> RelationDef;
}

pub struct GenreTags;

impl Tagging for GenreTags {
    type Tag = genres::Entity;
    type Link = movie_genres::Entity;

    const KIND: &'static str = "genre";

    fn tag_id() -> genres::Column {
        genres::Column::Id
    }

    fn tag_name() -> genres::Column {
        genres::Column::Name
    }

    fn tag_folded() -> genres::Column {
        genres::Column::NameFolded
    }

    fn link_movie() -> movie_genres::Column {
        movie_genres::Column::MovieId
    }

    fn link_tag() -> movie_genres::Column {
        movie_genres::Column::GenreId
    }

    fn link_to_tag() -> RelationDef {
        movie_genres::Relation::Genre.def()
    }
}

pub struct ActorTags;

impl Tagging for ActorTags {
    type Tag = actors::Entity;
    type Link = movie_actors::Entity;

    const KIND: &'static str = "actor";

    fn tag_id() -> actors::Column {
        actors::Column::Id
    }

    fn tag_name() -> actors::Column {
        actors::Column::Name
    }

    fn tag_folded() -> actors::Column {
        actors::Column::NameFolded
    }

    fn link_movie() -> movie_actors::Column {
        movie_actors::Column::MovieId
    }

    fn link_tag() -> movie_actors::Column {
        movie_actors::Column::ActorId
    }

    fn link_to_tag() -> RelationDef {
        movie_actors::Relation::Actor.def()
    }
}

pub type GenreRepository = TagRepository<GenreTags>;
pub type ActorRepository = TagRepository<ActorTags>;

/// Repository for genre or actor lookups and the movie filters built on them.
pub struct TagRepository<T: Tagging> {
    conn: DatabaseConnection,
    tags: QueryRepository<T::Tag>,
    _tagging: PhantomData<T>,
}

impl<T> TagRepository<T>
where
    T: Tagging,
    <T::Tag as EntityTrait>::Model: Send + Sync,
    <T::Link as EntityTrait>::Model: Send + Sync,
{
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            tags: QueryRepository::new(conn.clone()),
            conn,
            _tagging: PhantomData,
        }
    }

    /// Ids of stored tags whose folded name is in `folded_names`.
    ///
    /// Two stored tags differing only by case both match.
    pub async fn ids_named(&self, folded_names: &[String]) -> Result<Vec<i32>, DbErr> {
        let mut ids = Vec::new();
        for chunk in folded_names.chunks(LOOKUP_CHUNK_SIZE) {
            let found: Vec<i32> = T::Tag::find()
                .select_only()
                .column(T::tag_id())
                .filter(T::tag_folded().is_in(chunk.iter().cloned()))
                .into_tuple()
                .all(&self.conn)
                .await?;
            ids.extend(found);
        }
        Ok(ids)
    }

    /// Candidate movies for a set of requested names.
    ///
    /// `Any` keeps movies linked to at least one matched tag. `All` counts
    /// the stored tags that matched and keeps movies linked to exactly that
    /// many of them; when none matched nothing qualifies.
    pub async fn movie_filter<S: AsRef<str>>(
        &self,
        names: &[S],
        mode: MatchMode,
    ) -> Result<MovieFilter, DbErr> {
        let names = normalize_names(names);
        if names.is_empty() {
            return Ok(MovieFilter::Unrestricted);
        }

        let tag_ids = self.ids_named(&names).await?;
        debug!(
            kind = T::KIND,
            requested = names.len(),
            matched = tag_ids.len(),
            ?mode,
            "Resolved tag names"
        );
        if tag_ids.is_empty() {
            return Ok(MovieFilter::Empty);
        }

        let linked = T::Link::find()
            .select_only()
            .column(T::link_movie())
            .filter(T::link_tag().is_in(tag_ids.iter().copied()));

        let movie_ids = match mode {
            MatchMode::Any => linked.distinct().into_query(),
            MatchMode::All => {
                let to_match = i64::try_from(tag_ids.len()).unwrap_or(i64::MAX);
                linked
                    .group_by(T::link_movie())
                    .having(Expr::expr(T::link_tag().count()).eq(to_match))
                    .into_query()
            }
        };

        Ok(MovieFilter::Matching(
            Condition::all().add(movies::Column::Id.in_subquery(movie_ids)),
        ))
    }

    /// Tag names per movie for the given movies.
    pub async fn names_for_movies(
        &self,
        movie_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<String>>, DbErr> {
        if movie_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut map: HashMap<i32, Vec<String>> = HashMap::new();
        for chunk in movie_ids.chunks(LOOKUP_CHUNK_SIZE) {
            let rows: Vec<(i32, String)> = T::Link::find()
                .select_only()
                .column(T::link_movie())
                .column(T::tag_name())
                .join(JoinType::InnerJoin, T::link_to_tag())
                .filter(T::link_movie().is_in(chunk.iter().copied()))
                .into_tuple()
                .all(&self.conn)
                .await?;

            for (movie_id, name) in rows {
                map.entry(movie_id).or_default().push(name);
            }
        }
        Ok(map)
    }

    /// Distinct names matching `text`, alphabetical, paginated.
    pub async fn list_names(
        &self,
        text: &TextMatch,
        page: PageRequest,
    ) -> Result<ResultPage<String>, DbErr> {
        let condition = text.condition(T::tag_name(), T::tag_folded());
        let total = self
            .tags
            .count_distinct(T::tag_name(), condition.clone())
            .await?;
        let window = page.window(total);

        let names = if total == 0 {
            Vec::new()
        } else {
            self.tags
                .distinct_values(T::tag_name(), condition, &window)
                .await?
        };

        Ok(ResultPage::new(names, window))
    }
}
