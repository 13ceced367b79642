//! In-memory key-value store
//!
//! Nothing survives the process. Used by tests and as the fallback when no
//! storage path is configured.

use cadence_core::{CoreError, KeyValueStore, Result};
use std::collections::HashMap;

/// Key-value store backed by a `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        if key.is_empty() {
            return Err(CoreError::invalid_input("storage key must not be empty"));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);

        store.set("k", "v1".to_string()).unwrap();
        store.set("k", "v2".to_string()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        assert!(store.is_empty());

        // Removing again is fine
        store.remove("k").unwrap();
    }

    #[test]
    fn empty_key_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.set("", "v".to_string()),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn with_entries_prepopulates() {
        let store = MemoryStore::with_entries([("recentlyPlayed", "[]")]);
        assert_eq!(store.get("recentlyPlayed").as_deref(), Some("[]"));
    }
}
