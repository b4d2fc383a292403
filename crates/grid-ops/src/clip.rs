//! Raster windowing and masking.

use aq_common::{BoundingBox, RasterGrid};

use crate::error::{GridOpsError, GridOpsResult};

/// Window a raster to a clip extent, snapped outward to cell edges.
///
/// The result covers every source cell whose footprint intersects the
/// clip extent; no resampling takes place.
pub fn clip_to_bbox(grid: &RasterGrid, clip: &BoundingBox) -> GridOpsResult<RasterGrid> {
    let (res_x, res_y) = grid.resolution();
    let inter = grid
        .bbox
        .intersection(clip)
        .ok_or(GridOpsError::NoOverlap)?;

    let col0 = (((inter.min_x - grid.bbox.min_x) / res_x).floor().max(0.0)) as usize;
    let col1 = ((((inter.max_x - grid.bbox.min_x) / res_x).ceil()) as usize).min(grid.width);
    let row0 = (((grid.bbox.max_y - inter.max_y) / res_y).floor().max(0.0)) as usize;
    let row1 = ((((grid.bbox.max_y - inter.min_y) / res_y).ceil()) as usize).min(grid.height);

    if col1 <= col0 || row1 <= row0 {
        return Err(GridOpsError::NoOverlap);
    }

    let width = col1 - col0;
    let height = row1 - row0;
    let mut data = Vec::with_capacity(width * height);
    for row in row0..row1 {
        let start = row * grid.width + col0;
        data.extend_from_slice(&grid.data[start..start + width]);
    }

    let min_x = grid.bbox.min_x + col0 as f64 * res_x;
    let max_y = grid.bbox.max_y - row0 as f64 * res_y;
    let bbox = BoundingBox::new(
        min_x,
        max_y - height as f64 * res_y,
        min_x + width as f64 * res_x,
        max_y,
    );

    Ok(RasterGrid::new(
        data,
        width,
        height,
        bbox,
        grid.spatial_ref,
        grid.nodata,
    ))
}

/// Blank out cells not covered by a mask.
///
/// `mask` is row-major over the same shape as `grid`; cells where it is
/// false become NaN.
pub fn apply_mask(grid: &RasterGrid, mask: &[bool]) -> GridOpsResult<RasterGrid> {
    if mask.len() != grid.len() {
        return Err(GridOpsError::ShapeMismatch(format!(
            "mask has {} cells, raster has {}",
            mask.len(),
            grid.len()
        )));
    }

    let data = grid
        .data
        .iter()
        .zip(mask)
        .map(|(&v, &keep)| if keep { v } else { f32::NAN })
        .collect();

    Ok(RasterGrid::new(
        data,
        grid.width,
        grid.height,
        grid.bbox,
        grid.spatial_ref,
        grid.nodata,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_common::SpatialRef;

    fn grid_4x4() -> RasterGrid {
        let data: Vec<f32> = (0..16).map(|i| i as f32).collect();
        RasterGrid::new(
            data,
            4,
            4,
            BoundingBox::new(0.0, 0.0, 40.0, 40.0),
            SpatialRef::ConusAlbers,
            None,
        )
    }

    #[test]
    fn test_clip_interior_window() {
        let grid = grid_4x4();
        // covers the center 2x2 block exactly
        let clipped = clip_to_bbox(&grid, &BoundingBox::new(10.0, 10.0, 30.0, 30.0)).unwrap();

        assert_eq!(clipped.width, 2);
        assert_eq!(clipped.height, 2);
        assert_eq!(clipped.bbox, BoundingBox::new(10.0, 10.0, 30.0, 30.0));
        assert_eq!(clipped.data, vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn test_clip_snaps_outward() {
        let grid = grid_4x4();
        // straddles cell edges; every touched cell is kept
        let clipped = clip_to_bbox(&grid, &BoundingBox::new(5.0, 5.0, 25.0, 25.0)).unwrap();

        assert_eq!(clipped.width, 3);
        assert_eq!(clipped.height, 3);
        assert_eq!(clipped.bbox, BoundingBox::new(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn test_clip_beyond_raster_is_clamped() {
        let grid = grid_4x4();
        let clipped = clip_to_bbox(&grid, &BoundingBox::new(-100.0, -100.0, 100.0, 100.0)).unwrap();
        assert_eq!(clipped.width, 4);
        assert_eq!(clipped.height, 4);
        assert_eq!(clipped.bbox, grid.bbox);
    }

    #[test]
    fn test_clip_no_overlap() {
        let grid = grid_4x4();
        let result = clip_to_bbox(&grid, &BoundingBox::new(100.0, 100.0, 200.0, 200.0));
        assert!(matches!(result, Err(GridOpsError::NoOverlap)));
    }

    #[test]
    fn test_apply_mask() {
        let grid = grid_4x4();
        let mut mask = vec![true; 16];
        mask[0] = false;
        mask[15] = false;

        let masked = apply_mask(&grid, &mask).unwrap();
        assert!(masked.data[0].is_nan());
        assert!(masked.data[15].is_nan());
        assert_eq!(masked.data[1], 1.0);
        assert_eq!(masked.valid_count(), 14);
    }

    #[test]
    fn test_apply_mask_shape_mismatch() {
        let grid = grid_4x4();
        let result = apply_mask(&grid, &[true; 3]);
        assert!(matches!(result, Err(GridOpsError::ShapeMismatch(_))));
    }
}
