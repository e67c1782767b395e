// storage/mod.rs - Durable key-value substrate
//
// Ledger, user registry and session all persist through the same store,
// each under its own string key. Values are whole JSON documents.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the ledger snapshot
pub const LEDGER_KEY: &str = "expense-tracker-storage";
/// Key holding the registered users
pub const USERS_KEY: &str = "expense-tracker-users";
/// Key holding the authenticated session
pub const SESSION_KEY: &str = "expense-tracker-auth";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage directory unavailable: {0}")]
    MissingDirectory(String),
}

/// String-keyed store of serialized JSON documents
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Load and deserialize a document, `None` when the key was never written
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json { key: key.to_string(), source }),
        None => Ok(None),
    }
}

/// Serialize and write a full document under `key`
pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|source| StorageError::Json { key: key.to_string(), source })?;
    store.set(key, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let store = MemoryStore::new();
        let doc: Option<Doc> = load_json(&store, "absent").unwrap();
        assert!(doc.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let doc = Doc { name: "groceries".into(), count: 3 };
        save_json(&store, "doc", &doc).unwrap();
        assert_eq!(load_json::<Doc>(&store, "doc").unwrap(), Some(doc));
    }

    #[test]
    fn test_corrupt_document_reports_key() {
        let store = MemoryStore::new();
        store.set("doc", "{not json").unwrap();
        let err = load_json::<Doc>(&store, "doc").unwrap_err();
        assert!(matches!(err, StorageError::Json { ref key, .. } if key == "doc"));
    }
}
