use crate::error::StorageError;

/// Key holding the serialized post collection.
pub const POSTS_KEY: &str = "socialmedia_posts";

/// Key holding the signed-in user record.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Key holding the user directory. Owned by the auth layer; the feed never writes it.
pub const USERS_KEY: &str = "users";

/// Key-value store trait - abstraction over durable backends (files, in-memory).
///
/// Calls are synchronous and last-write-wins.
pub trait KeyValueStore: Send + Sync {
    /// Get a value from the store.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}
