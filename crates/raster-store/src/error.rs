//! Error types for the workspace store.

use thiserror::Error;

/// Result type for workspace operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the workspace.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata sidecar could not be read or written
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// The named raster is not in the workspace
    #[error("Raster not found in workspace: {0}")]
    NotFound(String),

    /// The named raster already exists and overwriting is disabled
    #[error("Raster already exists in workspace: {0}")]
    AlreadyExists(String),

    /// Payload length does not match the recorded shape
    #[error("Corrupt payload for '{name}': expected {expected} cells, found {actual}")]
    CorruptPayload {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Raster names become file names; path separators are rejected
    #[error("Invalid raster name: {0}")]
    InvalidName(String),
}
