//! Key-value persistence
//!
//! Features:
//! - One storage seam (`KeyValueStore`) for browser LocalStorage and in-memory use
//! - JSON values under fixed keys
//! - Typed errors; callers decide whether to fall back to defaults

pub mod storage;

pub use storage::{KeyValueStore, MemoryStore, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Read and decode the JSON value under `key`, `None` if the slot is empty
pub fn load_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and write it under `key`
pub fn save_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Load `key`, logging and falling back to `T::default()` on any failure
pub fn load_or_default<T: DeserializeOwned + Default>(store: &impl KeyValueStore, key: &str) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => {
            log::info!("Loaded {} from storage", key);
            value
        }
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Ignoring stored {}: {}", key, e);
            T::default()
        }
    }
}
