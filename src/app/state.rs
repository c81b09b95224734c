//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::store::InventoryStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub inventory_store: InventoryStore,
}

impl AppState {
    /// Build state around a freshly seeded store
    pub fn new(config: Config) -> Self {
        Self::with_store(config, InventoryStore::seeded())
    }

    pub fn with_store(config: Config, inventory_store: InventoryStore) -> Self {
        Self {
            config: Arc::new(config),
            inventory_store,
        }
    }
}
