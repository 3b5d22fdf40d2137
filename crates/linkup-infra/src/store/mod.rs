//! Durable store implementations - files and in-memory fallback.

mod file;
mod memory;

use std::sync::Arc;

use linkup_core::StorageError;
use linkup_core::ports::KeyValueStore;

pub use file::{FileStore, FileStoreConfig};
pub use memory::InMemoryStore;

/// Open the file store, falling back to memory when allowed.
pub fn open_store(config: &FileStoreConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match FileStore::open(config) {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) if config.fallback_to_memory => {
            tracing::error!(
                error = %e,
                "Failed to open file store. Using in-memory fallback; nothing will be saved."
            );
            Ok(Arc::new(InMemoryStore::new()))
        }
        Err(e) => Err(e),
    }
}
