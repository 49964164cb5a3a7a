//! `SeaORM` implementation of the [`ImportService`] trait.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};
use tracing::{debug, info};

use crate::db::Store;
use crate::entities::{actors, genres, movie_actors, movie_genres, movies};
use crate::importer::{self, MovieDataset, MovieRecord};
use crate::services::filter::fold_case;
use crate::services::import_service::{ImportError, ImportService, ImportSummary};

/// Link rows carry two values each, so they go in larger chunks than movies.
const LINK_BATCH_SIZE: usize = 400;

pub struct SeaOrmImportService {
    store: Arc<Store>,
    batch_size: usize,
}

impl SeaOrmImportService {
    #[must_use]
    pub fn new(store: Arc<Store>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    async fn clear_movies(txn: &DatabaseTransaction) -> Result<(), DbErr> {
        movie_genres::Entity::delete_many().exec(txn).await?;
        movie_actors::Entity::delete_many().exec(txn).await?;
        movies::Entity::delete_many().exec(txn).await?;
        Ok(())
    }

    /// Movies get ids `1..=n` in dataset order; the table was just cleared.
    async fn insert_movies(
        &self,
        txn: &DatabaseTransaction,
        records: &[MovieRecord],
    ) -> Result<(), DbErr> {
        for (chunk_index, chunk) in records.chunks(self.batch_size).enumerate() {
            let first_id = chunk_index * self.batch_size + 1;
            let models: Vec<movies::ActiveModel> = chunk
                .iter()
                .enumerate()
                .map(|(offset, record)| movie_model(movie_id(first_id + offset), record))
                .collect();
            movies::Entity::insert_many(models).exec(txn).await?;
        }
        Ok(())
    }
}

fn movie_id(position: usize) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}

fn movie_model(id: i32, record: &MovieRecord) -> movies::ActiveModel {
    movies::ActiveModel {
        id: Set(id),
        title: Set(record.title.clone()),
        title_folded: Set(fold_case(&record.title)),
        overview: Set(record.overview.clone()),
        release_date: Set(record.release_date),
        original_language: Set(record.original_language.clone()),
        popularity: Set(record.popularity),
        vote_count: Set(record.vote_count),
        vote_average: Set(record.vote_average),
        poster_url: Set(record.poster_url.clone()),
    }
}

/// Ids of genres named exactly as in `names`, creating the missing ones.
async fn genre_ids<C: ConnectionTrait>(
    conn: &C,
    names: &[String],
) -> Result<HashMap<String, i32>, DbErr> {
    let mut ids: HashMap<String, i32> = HashMap::with_capacity(names.len());
    for chunk in names.chunks(LINK_BATCH_SIZE) {
        let found = genres::Entity::find()
            .filter(genres::Column::Name.is_in(chunk.iter().cloned()))
            .all(conn)
            .await?;
        ids.extend(found.into_iter().map(|g| (g.name, g.id)));
    }

    for name in names {
        if !ids.contains_key(name) {
            let created = genres::Entity::insert(genres::ActiveModel {
                name: Set(name.clone()),
                name_folded: Set(fold_case(name)),
                ..Default::default()
            })
            .exec(conn)
            .await?;
            ids.insert(name.clone(), created.last_insert_id);
        }
    }

    Ok(ids)
}

/// Ids of actors named exactly as in `names`, creating the missing ones.
async fn actor_ids<C: ConnectionTrait>(
    conn: &C,
    names: &[String],
) -> Result<HashMap<String, i32>, DbErr> {
    let mut ids: HashMap<String, i32> = HashMap::with_capacity(names.len());
    for chunk in names.chunks(LINK_BATCH_SIZE) {
        let found = actors::Entity::find()
            .filter(actors::Column::Name.is_in(chunk.iter().cloned()))
            .all(conn)
            .await?;
        ids.extend(found.into_iter().map(|a| (a.name, a.id)));
    }

    for name in names {
        if !ids.contains_key(name) {
            let created = actors::Entity::insert(actors::ActiveModel {
                name: Set(name.clone()),
                name_folded: Set(fold_case(name)),
                ..Default::default()
            })
            .exec(conn)
            .await?;
            ids.insert(name.clone(), created.last_insert_id);
        }
    }

    Ok(ids)
}

/// `(movie_id, tag_id)` pairs for every name a record carries.
fn link_pairs(
    records: &[MovieRecord],
    names_of: impl Fn(&MovieRecord) -> &[String],
    ids: &HashMap<String, i32>,
) -> Vec<(i32, i32)> {
    records
        .iter()
        .enumerate()
        .flat_map(|(position, record)| {
            let movie = movie_id(position + 1);
            names_of(record)
                .iter()
                .filter_map(move |name| ids.get(name).map(|tag| (movie, *tag)))
        })
        .collect()
}

#[async_trait::async_trait]
impl ImportService for SeaOrmImportService {
    async fn load(&self, dataset: MovieDataset) -> Result<ImportSummary, ImportError> {
        if dataset.is_empty() {
            return Err(ImportError::EmptyDataset);
        }

        let genre_names = dataset.genre_names();
        let actor_names = dataset.actor_names();

        let txn = self.store.conn.begin().await?;

        Self::clear_movies(&txn).await?;
        let genre_ids = genre_ids(&txn, &genre_names).await?;
        let actor_ids = actor_ids(&txn, &actor_names).await?;
        debug!(
            genres = genre_ids.len(),
            actors = actor_ids.len(),
            "Resolved genre and actor ids"
        );

        self.insert_movies(&txn, &dataset.records).await?;

        let genre_links = link_pairs(&dataset.records, |r| r.genres.as_slice(), &genre_ids);
        for chunk in genre_links.chunks(LINK_BATCH_SIZE) {
            let models = chunk.iter().map(|(movie_id, genre_id)| movie_genres::ActiveModel {
                movie_id: Set(*movie_id),
                genre_id: Set(*genre_id),
            });
            movie_genres::Entity::insert_many(models).exec(&txn).await?;
        }

        let actor_links = link_pairs(&dataset.records, |r| r.actors.as_slice(), &actor_ids);
        for chunk in actor_links.chunks(LINK_BATCH_SIZE) {
            let models = chunk.iter().map(|(movie_id, actor_id)| movie_actors::ActiveModel {
                movie_id: Set(*movie_id),
                actor_id: Set(*actor_id),
            });
            movie_actors::Entity::insert_many(models).exec(&txn).await?;
        }

        txn.commit().await?;

        Ok(ImportSummary {
            movies: dataset.records.len(),
            genres: genre_names.len(),
            actors: actor_names.len(),
            genre_links: genre_links.len(),
            actor_links: actor_links.len(),
            skipped_rows: dataset.skipped_rows,
        })
    }

    async fn import_file(&self, path: &Path) -> Result<ImportSummary, ImportError> {
        let start = Instant::now();
        tokio::fs::metadata(path).await?;

        let owned = path.to_path_buf();
        let dataset = tokio::task::spawn_blocking(move || importer::read_path(&owned))
            .await
            .map_err(std::io::Error::other)??;

        info!(
            path = %path.display(),
            rows = dataset.records.len(),
            skipped = dataset.skipped_rows,
            "Parsed movie dataset"
        );

        let summary = self.load(dataset).await?;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            movies = summary.movies,
            genres = summary.genres,
            actors = summary.actors,
            elapsed_ms,
            "Import finished"
        );
        metrics::counter!("movies_imported_total")
            .increment(u64::try_from(summary.movies).unwrap_or(u64::MAX));

        Ok(summary)
    }
}
