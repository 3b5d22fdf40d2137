//! # LinkUp Infrastructure
//!
//! Concrete implementations of the ports defined in `linkup-core`.
//!
//! - [`FileStore`] - one JSON file per key under a data directory
//! - [`InMemoryStore`] - process-local fallback, nothing survives a restart

pub mod store;

pub use store::{FileStore, FileStoreConfig, InMemoryStore, open_store};
