//! Best-effort key-value persistence
//!
//! Features:
//! - `KvStore` trait over string keys and values
//! - In-memory backend (native builds, tests)
//! - LocalStorage backend (wasm32)
//! - JSON helpers that log and fall back instead of failing

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
mod local;
mod memory;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Storage failure
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// No storage is available (private browsing, blocked, headless)
    Unavailable,
    /// The backend rejected the operation (quota, security error)
    Backend(String),
    /// A value could not be encoded or decoded
    Encode(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            StorageError::Backend(msg) => write!(f, "storage backend error: {}", msg),
            StorageError::Encode(msg) => write!(f, "storage encoding error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Encode(err.to_string())
    }
}

/// String key-value store
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value; `None` if missing, unreadable or corrupt
pub fn load_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt {}: {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(
    store: &mut dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Write, logging instead of returning a failure
pub fn save_json_or_warn<T: Serialize>(store: &mut dyn KvStore, key: &str, value: &T) {
    if let Err(e) = save_json(store, key, value) {
        log::warn!("Failed to save {}: {}", key, e);
    }
}
