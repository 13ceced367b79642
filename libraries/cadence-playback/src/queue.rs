//! Play queue
//!
//! The queue is the ordered list handed over by whatever view started
//! playback (search results, a playlist, liked songs). It is replaced
//! wholesale, never spliced.

use cadence_core::{Track, TrackId};

/// Ordered play queue
///
/// Insertion order is playback order for non-shuffled playback. Lookup is by
/// identifier: two tracks with the same id are the same slot.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole queue, keeping the given order
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    /// Position of the first entry with this identifier
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Whether an entry with this identifier is queued
    pub fn contains(&self, id: &TrackId) -> bool {
        self.position_of(id).is_some()
    }

    /// Track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All queued tracks in playback order
    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    /// Queue length
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
