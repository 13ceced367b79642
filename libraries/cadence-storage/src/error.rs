//! Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<StorageError> for cadence_core::CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => cadence_core::CoreError::Io(e),
            StorageError::SerializationError(msg) => cadence_core::CoreError::storage(msg),
        }
    }
}
