//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod store;

pub use clock::Clock;
pub use store::{CURRENT_USER_KEY, KeyValueStore, POSTS_KEY, USERS_KEY};
