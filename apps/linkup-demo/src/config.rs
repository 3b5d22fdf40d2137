//! Application configuration loaded from environment variables.

use std::env;

use anyhow::Context;
use linkup_core::domain::FeedFilter;
use linkup_infra::FileStoreConfig;

/// Which store backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Memory,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub file_store: FileStoreConfig,
    /// Display name used when nobody is signed in.
    pub fallback_author: String,
    /// Text to publish before rendering, if any.
    pub new_post: Option<String>,
    pub new_post_image: Option<String>,
    pub search: String,
    pub filter: FeedFilter,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = match env::var("LINKUP_STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            _ => StoreBackend::File,
        };

        let filter = match env::var("FEED_FILTER") {
            Ok(raw) => raw
                .parse::<FeedFilter>()
                .with_context(|| format!("FEED_FILTER={raw} is not a feed filter"))?,
            Err(_) => FeedFilter::default(),
        };

        Ok(Self {
            backend,
            file_store: FileStoreConfig::from_env(),
            fallback_author: env::var("LINKUP_AUTHOR").unwrap_or_else(|_| "Guest".to_string()),
            new_post: env::var("FEED_POST").ok().filter(|text| !text.trim().is_empty()),
            new_post_image: env::var("FEED_POST_IMAGE").ok(),
            search: env::var("FEED_SEARCH").unwrap_or_default(),
            filter,
        })
    }
}
