//! Error types for playback management
//!
//! Transport operations never fail; these errors only come out of
//! configuration and persistence plumbing.

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Persistence boundary failure
    #[error("Storage error: {0}")]
    Storage(#[from] cadence_core::CoreError),

    /// History (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
