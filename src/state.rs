use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ImportService, SeaOrmImportService, SeaOrmSearchService, SearchService};

/// Services shared by the HTTP layer and the CLI, wired explicitly.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Arc<Store>,

    pub search_service: Arc<dyn SearchService>,

    pub import_service: Arc<dyn ImportService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Builds the services on top of an already opened store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let store = Arc::new(store);

        let search_service: Arc<dyn SearchService> =
            Arc::new(SeaOrmSearchService::new(store.clone()));
        let import_service: Arc<dyn ImportService> = Arc::new(SeaOrmImportService::new(
            store.clone(),
            config.import.batch_size,
        ));

        info!("Services initialized");

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            search_service,
            import_service,
        }
    }
}
