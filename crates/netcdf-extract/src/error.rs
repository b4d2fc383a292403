//! Error types for NetCDF extraction.

use thiserror::Error;

/// Result type for NetCDF extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur while extracting a pollutant grid.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying NetCDF library error
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// The requested variable is not in the file
    #[error("Variable '{name}' not found; file has: {available}")]
    MissingVariable { name: String, available: String },

    /// Coordinate variables could not be located
    #[error("Missing coordinate data: {0}")]
    MissingCoordinates(String),

    /// The variable layout is not the expected lat/lon grid
    #[error("Invalid grid layout: {0}")]
    InvalidLayout(String),

    /// The template bbox selects no cells
    #[error("Template {0} does not overlap the file's grid")]
    NoOverlap(String),
}
