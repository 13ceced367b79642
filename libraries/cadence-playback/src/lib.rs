//! Cadence - Playback Engine
//!
//! Platform-agnostic playback management for Cadence.
//!
//! This crate provides:
//! - Play queue replaced wholesale from whatever list started playback
//! - Transport: play/pause, next/previous with the auto-advance stop rule
//! - Shuffle without immediate repeats (injectable index source)
//! - Repeat modes (Off, All, One)
//! - Sleep timer that pauses playback once
//! - Recently-played history persisted through `KeyValueStore`
//! - Volume with mute/unmute, seek, keyboard shortcuts
//!
//! # Architecture
//!
//! `cadence-playback` never touches audio samples or the network. The
//! media element sits behind the `AudioOutput` trait; its callbacks and the
//! sleep timer come back as `EngineMessage`s on the engine's inbox and are
//! applied one at a time. UI state is synchronized through `PlaybackEvent`s.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_core::Track;
//! use cadence_playback::{PlaybackConfig, PlaybackManager, RepeatMode};
//! use cadence_storage::MemoryStore;
//!
//! let mut manager = PlaybackManager::new(PlaybackConfig::default(), Box::new(MemoryStore::new()));
//!
//! let songs = vec![
//!     Track::new("a", "Intro", "Band", "uploads/a.mp3"),
//!     Track::new("b", "Outro", "Band", "uploads/b.mp3"),
//! ];
//! manager.set_queue_and_play(songs[0].clone(), songs.clone());
//! assert!(manager.is_playing());
//!
//! // Manual skip wraps even with repeat off
//! manager.play_next(false);
//! manager.play_next(false);
//! assert_eq!(manager.current_track().map(|t| t.id.as_str()), Some("a"));
//!
//! manager.toggle_repeat();
//! assert_eq!(manager.repeat_mode(), RepeatMode::All);
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use cadence_playback::{AudioEvent, AudioOutput, EngineMessage, LoadRequest};
//! use std::time::Duration;
//! use tokio::sync::mpsc::UnboundedSender;
//!
//! // Wrap your platform's media element
//! struct MyElement {
//!     events: UnboundedSender<EngineMessage>,
//!     generation: u64,
//! }
//!
//! impl AudioOutput for MyElement {
//!     fn load(&mut self, request: &LoadRequest) {
//!         self.generation = request.generation;
//!         if request.url.is_none() {
//!             let error = AudioEvent::Error { message: "no source".into() };
//!             let _ = self.events.send(EngineMessage::audio(self.generation, error));
//!         }
//!     }
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position: Duration) {}
//!     fn set_volume(&mut self, _level: f32) {}
//!     fn set_loop(&mut self, _looping: bool) {}
//! }
//! ```

mod error;
mod events;
mod history;
mod manager;
mod output;
mod queue;
mod shortcuts;
mod shuffle;
mod sleep_timer;
pub mod types;
mod volume;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::{PlaybackEvent, PLAYBACK_FAILED_NOTICE};
pub use history::{HistoryRecorder, RecentlyPlayed};
pub use manager::PlaybackManager;
pub use output::{AudioEvent, AudioOutput, EngineMessage, LoadRequest};
pub use queue::Queue;
pub use shortcuts::{KeyCode, KeyPress, Shortcut};
pub use shuffle::{pick_shuffle_index, IndexSource, RandomIndexSource, ScriptedIndexSource};
pub use sleep_timer::{next_preset, SleepTimer};
pub use types::{format_time, PlaybackConfig, RepeatMode};
pub use volume::Volume;
