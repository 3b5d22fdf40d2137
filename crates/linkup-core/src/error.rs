//! Domain-level error types.

use thiserror::Error;

use crate::domain::PostId;

/// Feed errors - failures surfaced to the UI layer.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Post not found: {id}")]
    NotFound { id: PostId },

    #[error("No post ids left after {last}")]
    IdsExhausted { last: PostId },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Durable store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O failed: {0}")]
    Io(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("Unsupported schema version: {0}")]
    UnsupportedVersion(u32),
}
