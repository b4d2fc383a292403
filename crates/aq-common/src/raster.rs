//! In-memory raster grids and their persisted metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BoundingBox, SpatialRef};

/// A single-band raster held in memory.
///
/// Values are stored in row-major order, top row first. Missing cells
/// are NaN; `nodata` records the value that stands in for missing cells
/// when the raster is materialized outside the workspace.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
    /// Cell-edge extent in the units of `spatial_ref`.
    pub bbox: BoundingBox,
    pub spatial_ref: SpatialRef,
    pub nodata: Option<f32>,
}

impl RasterGrid {
    /// Create a raster from row-major data.
    pub fn new(
        data: Vec<f32>,
        width: usize,
        height: usize,
        bbox: BoundingBox,
        spatial_ref: SpatialRef,
        nodata: Option<f32>,
    ) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
            bbox,
            spatial_ref,
            nodata,
        }
    }

    /// Create a raster filled with a constant value.
    pub fn filled(
        value: f32,
        width: usize,
        height: usize,
        bbox: BoundingBox,
        spatial_ref: SpatialRef,
    ) -> Self {
        Self::new(vec![value; width * height], width, height, bbox, spatial_ref, None)
    }

    /// Value at a grid position.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Set the value at a grid position. Out-of-range positions are ignored.
    pub fn set(&mut self, col: usize, row: usize, value: f32) {
        if col < self.width && row < self.height {
            self.data[row * self.width + col] = value;
        }
    }

    /// Cell size in coordinate units, (x, y).
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.bbox.width() / self.width as f64,
            self.bbox.height() / self.height as f64,
        )
    }

    /// Area of one cell in squared coordinate units.
    pub fn cell_area(&self) -> f64 {
        let (rx, ry) = self.resolution();
        rx * ry
    }

    /// Coordinates of a cell center.
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        let (rx, ry) = self.resolution();
        (
            self.bbox.min_x + (col as f64 + 0.5) * rx,
            self.bbox.max_y - (row as f64 + 0.5) * ry,
        )
    }

    /// Grid position of the cell containing a coordinate.
    pub fn coords_to_cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !self.bbox.contains_point(x, y) {
            return None;
        }

        let (rx, ry) = self.resolution();
        let col = ((x - self.bbox.min_x) / rx).floor() as usize;
        let row = ((self.bbox.max_y - y) / ry).floor() as usize;

        if col < self.width && row < self.height {
            Some((col, row))
        } else {
            None
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the raster has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of cells carrying data (non-NaN).
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Build the metadata record persisted alongside this raster.
    pub fn metadata(&self, name: &str, units: Option<&str>) -> RasterMetadata {
        RasterMetadata {
            name: name.to_string(),
            epsg: self.spatial_ref.epsg(),
            bbox: self.bbox,
            shape: (self.width, self.height),
            nodata: self.nodata,
            units: units.map(|u| u.to_string()),
            created: Utc::now(),
        }
    }
}

/// Metadata persisted alongside a workspace raster payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterMetadata {
    pub name: String,
    pub epsg: u32,
    pub bbox: BoundingBox,
    /// Grid dimensions (width, height).
    pub shape: (usize, usize),
    pub nodata: Option<f32>,
    pub units: Option<String>,
    pub created: DateTime<Utc>,
}

impl RasterMetadata {
    /// Resolve the spatial reference recorded in this metadata.
    pub fn spatial_ref(&self) -> Option<SpatialRef> {
        SpatialRef::from_epsg(self.epsg)
    }
}
