//! Audio output boundary
//!
//! The engine never decodes audio. It drives a media element through
//! `AudioOutput` and receives the element's callbacks back as typed
//! `AudioEvent` messages.
//!
//! Every load carries a generation number. Callbacks are tagged with the
//! generation of the load they belong to, and the engine drops any callback
//! whose load has since been replaced.

use cadence_core::TrackId;
use std::time::Duration;

/// What the output should load when the current track changes
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// Load generation; tag every callback for this source with it
    pub generation: u64,

    /// Track being loaded
    pub track_id: TrackId,

    /// Resolved audio URL, `None` if the track has no audio reference
    pub url: Option<String>,

    /// Duration reported by the backend, if any
    pub duration_hint: Option<Duration>,

    /// Loop flag (`true` exactly when repeat mode is One)
    pub looping: bool,
}

/// Controllable media element
///
/// Implementations report back by sending `EngineMessage::Audio` on the
/// sender obtained from `PlaybackManager::message_sender`, tagged with the
/// generation of the most recent `LoadRequest`. Callbacks must be delivered
/// after the triggering call returns, never re-entrantly.
pub trait AudioOutput: Send {
    /// Replace the element source; resets position to zero
    ///
    /// A request without a URL must be answered with `AudioEvent::Error`.
    fn load(&mut self, request: &LoadRequest);

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Jump to a position in the loaded media
    fn seek(&mut self, position: Duration);

    /// Set output volume (0.0-1.0)
    fn set_volume(&mut self, level: f32);

    /// Loop the loaded media indefinitely
    fn set_loop(&mut self, looping: bool);

    /// Stop delivering callbacks; the output is being torn down
    fn detach(&mut self) {}
}

/// Callbacks of the media element
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Playback position advanced
    TimeUpdate { position: Duration },

    /// Media metadata (duration) became available
    LoadedMetadata { duration: Duration },

    /// Media played to the end (never sent while looping)
    Ended,

    /// Media failed to load or decode
    Error { message: String },

    /// Element started playing
    Play,

    /// Element paused
    Pause,
}

/// Deferred input to the engine, applied one at a time
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Callback from the audio output
    Audio {
        /// Generation of the load the callback belongs to
        generation: u64,
        event: AudioEvent,
    },

    /// A sleep timer expired
    SleepTimerElapsed {
        /// Generation of the timer that fired
        generation: u64,
    },
}

impl EngineMessage {
    /// Callback for the source loaded with `generation`
    pub fn audio(generation: u64, event: AudioEvent) -> Self {
        EngineMessage::Audio { generation, event }
    }
}
