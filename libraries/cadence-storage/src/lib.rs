//! Cadence Storage
//!
//! Durable key-value stores backing the client's local state.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::KeyValueStore;
//! use cadence_storage::JsonFileStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = JsonFileStore::open("state/local-storage.json")?;
//! store.set("recentlyPlayed", "[]".to_string())?;
//! assert_eq!(store.get("recentlyPlayed").as_deref(), Some("[]"));
//! # Ok(())
//! # }
//! ```

mod error;
mod file;
mod memory;

pub use error::{Result, StorageError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
