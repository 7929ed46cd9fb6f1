//! Application state shared across routes

use std::sync::Arc;

use crate::config::{Config, StoreBackendKind};
use crate::store::{
    DocumentBackend, ItemStore, MemoryBackend, MongoBackend, StoreError, SupplierStore, UserStore,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: UserStore,
    pub items: ItemStore,
    pub suppliers: SupplierStore,
}

impl AppState {
    /// Build state over an already-constructed backend
    pub fn with_backend(config: Config, backend: Arc<dyn DocumentBackend>) -> Self {
        let config = Arc::new(config);

        // Initialize stores
        let users = UserStore::new(backend.clone());
        let items = ItemStore::new(backend.clone());
        let suppliers = SupplierStore::new(backend);

        Self {
            config,
            users,
            items,
            suppliers,
        }
    }

    /// Connect the configured backend and prepare indexes
    pub async fn connect(config: Config) -> Result<Self, StoreError> {
        let backend: Arc<dyn DocumentBackend> = match config.store_backend {
            StoreBackendKind::Mongodb => {
                let uri = config.mongodb_uri.as_deref().ok_or_else(|| {
                    StoreError::Connection("MONGODB_URI is not set".to_string())
                })?;
                Arc::new(MongoBackend::connect(uri, &config.database_name).await?)
            }
            StoreBackendKind::Memory => Arc::new(MemoryBackend::new()),
        };

        let state = Self::with_backend(config, backend);
        state.ensure_indexes().await?;
        Ok(state)
    }

    /// Create the unique indexes the repositories rely on
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.users.ensure_indexes().await?;
        self.items.ensure_indexes().await?;
        self.suppliers.ensure_indexes().await
    }
}
