//! Session context - the signed-in user record.
//!
//! Credential checks live with the auth layer. This only remembers who is
//! signed in so new posts can be attributed.

use std::sync::Arc;

use crate::domain::User;
use crate::error::StorageError;
use crate::ports::{CURRENT_USER_KEY, KeyValueStore};

pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.store.get(CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt(format!("session record: {e}")))
    }

    /// Display name used for attribution.
    pub fn display_name(&self) -> Result<Option<String>, StorageError> {
        Ok(self.current_user()?.map(|user| user.name))
    }

    pub fn sign_in(&self, user: &User) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(user).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(CURRENT_USER_KEY, &raw)?;
        tracing::info!(user_id = user.id, "Session started");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), StorageError> {
        self.store.remove(CURRENT_USER_KEY)?;
        tracing::info!("Session ended");
        Ok(())
    }
}
