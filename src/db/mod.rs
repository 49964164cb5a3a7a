use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::services::filter::MovieFilter;

pub mod migrator;
pub mod repositories;

pub use repositories::movie::MovieRepository;
pub use repositories::query::QueryRepository;
pub use repositories::tags::{ActorRepository, GenreRepository};

/// Row counts of the catalog tables.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CatalogCounts {
    pub movies: u64,
    pub genres: u64,
    pub actors: u64,
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn movies(&self) -> MovieRepository {
        MovieRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn genres(&self) -> GenreRepository {
        GenreRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn actors(&self) -> ActorRepository {
        ActorRepository::new(self.conn.clone())
    }

    pub async fn catalog_counts(&self) -> Result<CatalogCounts> {
        use crate::entities::prelude::*;
        use sea_orm::{EntityTrait, PaginatorTrait};

        let movie_repo = self.movies();
        let everything = MovieFilter::Unrestricted;
        let (movies, genres, actors) = futures::try_join!(
            movie_repo.count(&everything),
            Genres::find().count(&self.conn),
            Actors::find().count(&self.conn),
        )?;

        Ok(CatalogCounts {
            movies,
            genres,
            actors,
        })
    }
}
