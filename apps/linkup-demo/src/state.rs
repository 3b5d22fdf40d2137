//! Application state - the store, clock and session shared by the feed.

use std::sync::Arc;

use linkup_core::SessionStore;
use linkup_core::StorageError;
use linkup_core::clock::SystemClock;
use linkup_core::ports::{Clock, KeyValueStore};
use linkup_infra::{InMemoryStore, open_store};

use crate::config::{AppConfig, StoreBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build the application state with the configured store.
    pub fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let store: Arc<dyn KeyValueStore> = match config.backend {
            StoreBackend::File => open_store(&config.file_store)?,
            StoreBackend::Memory => {
                tracing::warn!("LINKUP_STORE=memory. Nothing will be saved.");
                Arc::new(InMemoryStore::new())
            }
        };

        tracing::info!("Application state initialized");

        Ok(Self {
            store,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.store.clone())
    }

    /// Name to attribute new posts to: the signed-in user, else the fallback.
    pub fn author(&self, fallback: &str) -> String {
        match self.session().display_name() {
            Ok(Some(name)) => name,
            Ok(None) => fallback.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable session record, posting as fallback author");
                fallback.to_string()
            }
        }
    }
}
