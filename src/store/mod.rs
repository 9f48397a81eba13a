//! Client-side key-value persistence
//!
//! The checkout flow keeps two best-effort caches: the last selected product
//! payload and the user's chosen default address. Both go through the
//! [`KeyValueStore`] trait so the flow never depends on a concrete storage
//! mechanism. Values are string-serialized JSON; last writer wins.

mod file;
mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the last selected product or cart payload
pub const SELECTED_PRODUCT_KEY: &str = "selectedProduct";

/// Key holding the default address for `user_id`
pub fn default_address_key(user_id: &str) -> String {
    format!("defaultAddress_{}", user_id)
}

/// String key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and deserialize a JSON value.
///
/// A value that no longer parses is treated as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("ignoring unreadable cache entry {}: {}", key, e);
            Ok(None)
        }
    }
}

/// Serialize and store a JSON value
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        save_json(&store, "k", &json!({ "a": 1 })).unwrap();
        let value: Option<Value> = load_json(&store, "k").unwrap();
        assert_eq!(value, Some(json!({ "a": 1 })));
    }

    #[test]
    fn test_unreadable_entry_is_absent() {
        let store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        let value: Option<Value> = load_json(&store, "k").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_default_address_key() {
        assert_eq!(default_address_key("u42"), "defaultAddress_u42");
    }
}
