//! Stage drivers for the urban air-quality tract-statistics pipeline.
//!
//! Three stages, run manually in sequence and sharing only a workspace
//! directory and the raster naming convention:
//!
//! 1. [`landcover`] clips annual land-cover rasters to the study areas.
//! 2. [`pollutant`] converts pollutant NetCDF grids into projected
//!    study-area rasters.
//! 3. [`zonal`] computes per-tract statistics of every workspace raster
//!    and joins them back onto tract geometry.
//!
//! Each stage is synchronous and sequential; a filename outside the
//! documented conventions fails that file with a logged error, while
//! I/O and format errors abort the stage.

pub mod config;
pub mod error;
pub mod landcover;
pub mod metadata;
pub mod pollutant;
pub mod zonal;

use std::path::{Path, PathBuf};

pub use config::{LandCoverConfig, PipelineConfig, PollutantConfig, StudyAreaConfig};
pub use error::{PipelineError, Result};

/// Outcome of one stage run.
#[derive(Debug, Default)]
pub struct StageSummary {
    /// Input files (or workspace rasters) fully processed.
    pub processed: usize,
    /// Inputs skipped: wrong extension or unrecognized name.
    pub skipped: usize,
    /// Names of the artifacts produced, in creation order.
    pub outputs: Vec<String>,
}

/// Sorted regular files of a directory.
///
/// Every stage walks its input this way so runs are deterministic
/// regardless of directory enumeration order.
fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
