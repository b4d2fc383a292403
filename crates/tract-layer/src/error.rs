//! Error types for tract layer handling.

use thiserror::Error;

/// Result type for tract layer operations.
pub type TractResult<T> = Result<T, TractError>;

/// Errors that can occur while reading or writing tract layers.
#[derive(Error, Debug)]
pub enum TractError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying shapefile error
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// A feature has no usable join key
    #[error("Feature {index} in '{file}' is missing the '{field}' field")]
    MissingKeyField {
        field: String,
        file: String,
        index: usize,
    },

    /// The layer holds no features
    #[error("Layer '{0}' contains no features")]
    EmptyLayer(String),

    /// An attribute name is not valid for the output table
    #[error("Invalid attribute field name: {0}")]
    InvalidFieldName(String),
}
