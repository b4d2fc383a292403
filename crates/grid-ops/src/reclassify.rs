//! Value-range reclassification.

use aq_common::RasterGrid;

/// An inclusive source value range mapped to a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemapRange {
    pub from: f32,
    pub to: f32,
    pub value: f32,
}

impl RemapRange {
    pub fn new(from: f32, to: f32, value: f32) -> Self {
        Self { from, to, value }
    }

    /// Check if a cell value falls in this range.
    pub fn matches(&self, v: f32) -> bool {
        v >= self.from && v <= self.to
    }
}

/// Remap every cell through a range table.
///
/// The first matching range wins. Cells matched by no range, and cells
/// that are already missing, become NaN.
pub fn reclassify(grid: &RasterGrid, table: &[RemapRange]) -> RasterGrid {
    let data = grid
        .data
        .iter()
        .map(|&v| {
            if v.is_nan() {
                return f32::NAN;
            }
            table
                .iter()
                .find(|range| range.matches(v))
                .map(|range| range.value)
                .unwrap_or(f32::NAN)
        })
        .collect();

    RasterGrid::new(
        data,
        grid.width,
        grid.height,
        grid.bbox,
        grid.spatial_ref,
        grid.nodata,
    )
}
