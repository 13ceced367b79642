//! Core traits for Cadence
use crate::error::Result;

/// Durable string key-value store
///
/// The client keeps its per-browser state (recently played songs, tokens)
/// in a store shaped like the browser's `localStorage`. Implementations live
/// in `cadence-storage`.
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns an error if the value could not be made durable
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    ///
    /// # Errors
    /// Returns an error if the deletion could not be made durable
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
