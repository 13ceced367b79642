//! Cadence Core
//!
//! Platform-agnostic domain types and traits shared by every Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, and `MediaResolver` for turning
//!   backend media references into loadable URLs
//! - **Core Traits**: `KeyValueStore`, the durable client-side storage used
//!   for the recently-played list
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{filter_tracks, MediaResolver, Track};
//!
//! let songs = vec![
//!     Track::new("1", "Blinding Lights", "The Weeknd", "uploads/blinding.mp3"),
//!     Track::new("2", "Levitating", "Dua Lipa", "uploads/levitating.mp3"),
//! ];
//!
//! let visible = filter_tracks(&songs, "weeknd");
//! assert_eq!(visible.len(), 1);
//!
//! let resolver = MediaResolver::default();
//! assert_eq!(
//!     resolver.audio_url(&visible[0].audio_url).as_deref(),
//!     Some("http://localhost:5000/uploads/blinding.mp3")
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::KeyValueStore;
pub use types::{filter_tracks, MediaResolver, Track, TrackId};
