//! Error types for zonal statistics.

use thiserror::Error;

/// Result type for zonal statistics operations.
pub type ZonalResult<T> = Result<T, ZonalError>;

/// Errors that can occur while computing or persisting zonal statistics.
#[derive(Error, Debug)]
pub enum ZonalError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A persisted table row could not be interpreted
    #[error("Malformed table row in '{file}': {message}")]
    MalformedRow { file: String, message: String },
}
