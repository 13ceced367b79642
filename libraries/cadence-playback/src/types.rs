//! Core types for playback management

use crate::error::{PlaybackError, Result};
use cadence_core::types::{DEFAULT_MEDIA_BASE_URL, DEFAULT_PLACEHOLDER_COVER_URL};
use cadence_core::MediaResolver;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when an automatic advance reaches the end of the queue
    #[default]
    Off,

    /// Wrap to the start of the queue
    All,

    /// Loop the current track (delegated to the audio output)
    One,
}

impl RepeatMode {
    /// Next mode in the repeat button cycle: Off → All → One → Off
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    /// Whether the audio output should loop the current track
    pub fn loops_track(self) -> bool {
        self == RepeatMode::One
    }
}

/// Configuration for playback manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum recently-played entries (default: 10)
    pub history_size: usize,

    /// Storage key of the recently-played list (default: "recentlyPlayed")
    pub history_key: String,

    /// Initial volume, 0.0-1.0 (default: 1.0)
    pub volume: f32,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Sleep timer cycle in minutes (default: 15, 30, 60)
    pub sleep_timer_presets: Vec<u32>,

    /// Backend serving relative media paths
    pub media_base_url: String,

    /// Cover shown for tracks without artwork
    pub placeholder_cover_url: String,
}

impl PlaybackConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.history_size == 0 {
            return Err(PlaybackError::Config(
                "history_size must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.volume) {
            return Err(PlaybackError::Config(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.volume
            )));
        }

        if self.sleep_timer_presets.contains(&0) {
            return Err(PlaybackError::Config(
                "sleep_timer_presets must not contain 0".to_string(),
            ));
        }

        if self.history_key.trim().is_empty() {
            return Err(PlaybackError::Config(
                "history_key must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Media resolver for the configured backend
    pub fn media_resolver(&self) -> MediaResolver {
        MediaResolver::new(&self.media_base_url, &self.placeholder_cover_url)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 10,
            history_key: "recentlyPlayed".to_string(),
            volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
            sleep_timer_presets: vec![15, 30, 60],
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_string(),
            placeholder_cover_url: DEFAULT_PLACEHOLDER_COVER_URL.to_string(),
        }
    }
}

/// Format a playback position as `m:ss`
///
/// Minutes are not wrapped into hours, matching the player bar.
pub fn format_time(time: Duration) -> String {
    let total = time.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
