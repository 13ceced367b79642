//! Recently-played history
//!
//! Maintains the bounded, deduplicated "Recently Played" shelf and keeps it
//! in the durable key-value store across sessions.

use cadence_core::{KeyValueStore, Track};
use serde_json::Value;
use std::collections::VecDeque;

/// Bounded most-recent-first list of played tracks
///
/// Replaying a track moves it to the front instead of duplicating it; the
/// oldest entries fall off once `max_size` is exceeded.
#[derive(Debug, Clone)]
pub struct RecentlyPlayed {
    /// History buffer (most recent = front)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl RecentlyPlayed {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a play: dedup by id, insert at front, truncate
    pub fn push(&mut self, track: Track) {
        self.tracks.retain(|t| t.id != track.id);
        self.tracks.push_front(track);
        self.tracks.truncate(self.max_size);
    }

    /// Most recent track
    pub fn peek(&self) -> Option<&Track> {
        self.tracks.front()
    }

    /// All tracks, most recent first
    pub fn get_all(&self) -> Vec<&Track> {
        self.tracks.iter().collect()
    }

    /// Get number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Append an older entry while restoring from storage
    ///
    /// Skips duplicates and anything past the bound, so a hand-edited or
    /// oversized stored list still yields a valid history.
    fn restore_back(&mut self, track: Track) {
        if self.tracks.len() >= self.max_size || self.tracks.iter().any(|t| t.id == track.id) {
            return;
        }
        self.tracks.push_back(track);
    }
}

/// Recently-played list bound to its storage key
///
/// Loaded once when the engine starts and written back after every change.
/// Storage problems are logged, never returned: losing the shelf must not
/// interrupt playback.
pub struct HistoryRecorder {
    list: RecentlyPlayed,
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl HistoryRecorder {
    /// Load the list stored under `key`
    ///
    /// A missing key gives an empty list. Unparseable or non-array data is
    /// logged, removed from the store, and treated as empty. `null` and
    /// malformed entries inside the array are skipped.
    pub fn load(
        mut store: Box<dyn KeyValueStore>,
        key: impl Into<String>,
        max_size: usize,
    ) -> Self {
        let key = key.into();
        let mut list = RecentlyPlayed::new(max_size);

        if let Some(raw) = store.get(&key) {
            match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(items)) => {
                    for item in items {
                        if item.is_null() {
                            continue;
                        }
                        match serde_json::from_value::<Track>(item) {
                            Ok(track) => list.restore_back(track),
                            Err(e) => tracing::warn!("Skipping unreadable history entry: {}", e),
                        }
                    }
                }
                Ok(_) => {
                    tracing::warn!("Stored history under {:?} is not a list, discarding", key);
                    discard(store.as_mut(), &key);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse recently played: {}", e);
                    discard(store.as_mut(), &key);
                }
            }
        }

        tracing::debug!("Loaded {} recently played tracks", list.len());

        Self { list, store, key }
    }

    /// Record an explicitly played track and persist
    pub fn record(&mut self, track: &Track) {
        self.list.push(track.clone());
        self.persist();
    }

    /// Empty the list and persist
    pub fn clear(&mut self) {
        self.list.clear();
        self.persist();
    }

    /// The in-memory list
    pub fn list(&self) -> &RecentlyPlayed {
        &self.list
    }

    fn persist(&mut self) {
        let snapshot: Vec<&Track> = self.list.get_all();
        let result = serde_json::to_string(&snapshot)
            .map_err(crate::PlaybackError::from)
            .and_then(|json| self.store.set(&self.key, json).map_err(Into::into));

        if let Err(e) = result {
            tracing::warn!("Failed to persist recently played: {}", e);
        }
    }
}

impl std::fmt::Debug for HistoryRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryRecorder")
            .field("key", &self.key)
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}

fn discard(store: &mut dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!("Failed to remove corrupt history: {}", e);
    }
}
