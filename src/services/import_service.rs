//! Domain service for loading the movie dataset into the store.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::importer::MovieDataset;

/// Errors raised while reading or loading a dataset.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset contains no movies")]
    EmptyDataset,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ImportError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Outcome of one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub movies: usize,
    /// Distinct genre names referenced by the dataset.
    pub genres: usize,
    /// Distinct actor names referenced by the dataset.
    pub actors: usize,
    pub genre_links: usize,
    pub actor_links: usize,
    pub skipped_rows: usize,
}

/// Replaces the catalog with a dataset.
///
/// Movies and link rows are cleared and rewritten on every load. Genres and
/// actors are looked up by exact name and created when missing, so they
/// survive across loads.
#[async_trait::async_trait]
pub trait ImportService: Send + Sync {
    /// Loads an already parsed dataset in a single transaction.
    ///
    /// # Errors
    ///
    /// - [`ImportError::EmptyDataset`] when there is nothing to load; the
    ///   store is left untouched.
    /// - [`ImportError::Database`] on store failures; the transaction is
    ///   rolled back.
    async fn load(&self, dataset: MovieDataset) -> Result<ImportSummary, ImportError>;

    /// Reads a CSV file and loads it.
    async fn import_file(&self, path: &Path) -> Result<ImportSummary, ImportError>;
}
