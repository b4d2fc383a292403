//! Error types for grid operations.

use thiserror::Error;

/// Result type for grid operations.
pub type GridOpsResult<T> = Result<T, GridOpsError>;

/// Errors that can occur during grid operations.
#[derive(Error, Debug)]
pub enum GridOpsError {
    /// Clip extent and raster extent share no cells
    #[error("Clip extent does not overlap the raster")]
    NoOverlap,

    /// A mask or companion grid does not match the raster shape
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Operation requires a different spatial reference
    #[error("Wrong spatial reference: expected {expected}, got {actual}")]
    WrongSpatialRef { expected: String, actual: String },
}
