//! Common types shared across the tract-statistics pipeline crates.

pub mod bbox;
pub mod crs;
pub mod naming;
pub mod raster;
pub mod study_area;

pub use bbox::BoundingBox;
pub use crs::SpatialRef;
pub use naming::{NameError, RasterName};
pub use raster::{RasterGrid, RasterMetadata};
pub use study_area::City;
