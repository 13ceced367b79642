//! Playback Events
//!
//! Event-based communication for UI synchronization. The engine queues one
//! event per observable change; the UI drains them after each call:
//! - Play/pause state and track changes
//! - Queue, shuffle, repeat, and sleep timer changes
//! - Position and volume updates
//! - Recently-played changes and playback failures

use crate::types::RepeatMode;
use cadence_core::TrackId;
use serde::{Deserialize, Serialize};

/// Notice shown when the audio element cannot play a track
pub const PLAYBACK_FAILED_NOTICE: &str =
    "Cannot play this song. The link might be broken or not supported.";

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Playing flag changed
    StateChanged {
        /// Whether playback is now active
        is_playing: bool,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Queue replaced
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is on
        enabled: bool,
    },

    /// Repeat mode cycled
    RepeatChanged {
        /// New repeat mode
        mode: RepeatMode,
    },

    /// Sleep timer armed, cleared, or expired
    SleepTimerChanged {
        /// Armed minutes, `None` when no timer is pending
        minutes: Option<u32>,
    },

    /// Position update from the audio output or a seek
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration (0 while unknown)
        duration_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Recently-played list changed
    HistoryChanged {
        /// New list length
        length: usize,
    },

    /// The audio output could not play the current track
    PlaybackFailed {
        /// Track that failed
        track_id: Option<TrackId>,
        /// User-facing notice
        message: String,
    },
}
