//! Error types for GeoTIFF reading.

use thiserror::Error;

/// Result type for GeoTIFF parser operations.
pub type GeoTiffResult<T> = Result<T, GeoTiffError>;

/// Errors that can occur while reading a GeoTIFF.
#[derive(Error, Debug)]
pub enum GeoTiffError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying TIFF decoding error
    #[error("TIFF decode error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// The file lacks the tags needed to place it on the ground
    #[error("Missing georeferencing: {0}")]
    MissingGeoreference(String),

    /// Sample format the pipeline does not handle
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Decoded data does not match the declared dimensions
    #[error("Truncated image: expected {expected} samples, got {actual}")]
    Truncated { expected: usize, actual: usize },
}
