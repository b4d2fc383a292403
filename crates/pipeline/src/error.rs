//! Error types for the pipeline stages.

use thiserror::Error;

use aq_common::City;

/// Errors that can occur while running a pipeline stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("No input directory configured for the {0} stage")]
    MissingInputDir(&'static str),

    #[error("No study area configured for {0}")]
    MissingStudyArea(City),

    #[error("Unrecognized filename '{file}': {reason}")]
    UnrecognizedFilename { file: String, reason: String },

    #[error("Failed to read raster: {0}")]
    GeoTiff(#[from] geotiff_parser::GeoTiffError),

    #[error("Failed to extract pollutant grid: {0}")]
    Extract(#[from] netcdf_extract::ExtractError),

    #[error("Grid operation failed: {0}")]
    GridOps(#[from] grid_ops::GridOpsError),

    #[error("Workspace error: {0}")]
    Store(#[from] raster_store::StoreError),

    #[error("Tract layer error: {0}")]
    Tract(#[from] tract_layer::TractError),

    #[error("Zonal statistics error: {0}")]
    Zonal(#[from] zonal_stats::ZonalError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
