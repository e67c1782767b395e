use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::storage::{self, KeyValueStore, StorageError, USERS_KEY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Locally known users, keyed by email. Entries are never updated or removed.
pub struct UserRegistry {
    users: Vec<StoredUser>,
    storage: Arc<dyn KeyValueStore>,
}

impl UserRegistry {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let users: Vec<StoredUser> =
            storage::load_json(storage.as_ref(), USERS_KEY)?.unwrap_or_default();
        debug!(count = users.len(), "Loaded user registry");
        Ok(Self { users, storage })
    }

    pub fn exists(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email == email)
    }

    pub fn get(&self, email: &str) -> Option<&StoredUser> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn all(&self) -> &[StoredUser] {
        &self.users
    }

    /// Insert a user unless the email is already known. Returns `true` on insert;
    /// an existing entry (and its `created_at`) is left as is.
    pub fn save(&mut self, email: &str, name: &str) -> Result<bool, StorageError> {
        if self.exists(email) {
            return Ok(false);
        }
        let mut next = self.users.clone();
        next.push(StoredUser {
            email: email.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        });
        storage::save_json(self.storage.as_ref(), USERS_KEY, &next)?;
        self.users = next;
        info!(email, "Registered user");
        Ok(true)
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        storage::save_json(self.storage.as_ref(), USERS_KEY, &self.users)
    }
}
