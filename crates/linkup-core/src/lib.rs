//! # LinkUp Core
//!
//! The feed layer of LinkUp: post entities, the repository that owns them,
//! and the query engine that turns them into a feed.
//! Storage and time come in through the ports; this crate has no
//! infrastructure dependencies.

pub mod clock;
pub mod domain;
pub mod error;
pub mod feed;
pub mod ports;
pub mod record;
pub mod repository;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{FeedError, StorageError};
pub use feed::{FeedItem, FeedState};
pub use repository::{Applied, PostRepository};
pub use session::SessionStore;
