//! Pure grid operations: windowing, masking, reclassification, and
//! projection of rasters held in memory.

pub mod clip;
pub mod error;
pub mod reclassify;
pub mod reproject;

pub use clip::{apply_mask, clip_to_bbox};
pub use error::{GridOpsError, GridOpsResult};
pub use reclassify::{reclassify, RemapRange};
pub use reproject::{project_to_albers, InterpolationMethod};
