//! File-backed key-value store
//!
//! Persists every entry as one JSON object on disk, written after each
//! mutation. This is the desktop stand-in for the browser's `localStorage`.

use crate::error::{Result, StorageError};
use cadence_core::KeyValueStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store persisted to a JSON file
///
/// All entries are cached in memory; reads never touch the disk. A missing
/// file is an empty store. A file that is not a JSON object of strings is
/// logged and treated as empty, and is overwritten on the next write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => parse_entries(&path, &contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        Ok(Self { path, entries })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all entries to disk atomically (temp file + rename)
    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn parse_entries(path: &Path, contents: &str) -> BTreeMap<String, String> {
    if contents.trim().is_empty() {
        return BTreeMap::new();
    }

    match serde_json::from_str::<BTreeMap<String, String>>(contents) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                "Ignoring unreadable store {}: {}",
                path.display(),
                e
            );
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> cadence_core::Result<()> {
        if key.is_empty() {
            return Err(cadence_core::CoreError::invalid_input(
                "storage key must not be empty",
            ));
        }
        self.entries.insert(key.to_string(), value);
        self.flush().map_err(Into::into)
    }

    fn remove(&mut self, key: &str) -> cadence_core::Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
