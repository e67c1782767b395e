use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::storage::{self, KeyValueStore, StorageError, SESSION_KEY};

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub name: String,
}

/// Holds the current session (or none) and keeps it in durable storage so a
/// login outlives the process.
pub struct SessionHolder {
    current: Option<Session>,
    storage: Arc<dyn KeyValueStore>,
}

impl SessionHolder {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let current = storage::load_json(storage.as_ref(), SESSION_KEY)?;
        Ok(Self { current, storage })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn establish(&mut self, session: Session) -> Result<(), StorageError> {
        storage::save_json(self.storage.as_ref(), SESSION_KEY, &session)?;
        info!(email = %session.email, "Session established");
        self.current = Some(session);
        Ok(())
    }

    /// Drop the session, returning whoever was logged in
    pub fn clear(&mut self) -> Result<Option<Session>, StorageError> {
        self.storage.remove(SESSION_KEY)?;
        let previous = self.current.take();
        if let Some(s) = &previous {
            info!(email = %s.email, "Session cleared");
        }
        Ok(previous)
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        match &self.current {
            Some(session) => storage::save_json(self.storage.as_ref(), SESSION_KEY, session),
            None => self.storage.remove(SESSION_KEY),
        }
    }
}
