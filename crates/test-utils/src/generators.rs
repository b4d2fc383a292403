//! Synthetic grid generators with predictable, verifiable patterns.

use aq_common::{BoundingBox, RasterGrid, SpatialRef};

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`, which makes it
/// easy to verify that data survives windowing and storage unchanged.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[0], 0.0);    // col=0, row=0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Land-cover class codes used by the synthetic land-cover pattern.
pub const LANDCOVER_CLASSES: [u8; 9] = [11, 21, 22, 23, 24, 31, 42, 52, 95];

/// Creates a land-cover grid cycling through the class codes.
///
/// Deterministic: cell (col, row) carries
/// `LANDCOVER_CLASSES[(row * width + col) % 9]`.
pub fn create_landcover_grid(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .map(|i| LANDCOVER_CLASSES[i % LANDCOVER_CLASSES.len()])
        .collect()
}

/// Creates a pollutant-like concentration grid in µg/m³.
///
/// A smooth gradient from roughly 5 at the top-left corner to 25 at the
/// bottom-right, similar in magnitude to annual PM2.5 surfaces.
pub fn create_pollutant_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f32 / width.max(1) as f32;
            let y_factor = row as f32 / height.max(1) as f32;
            data.push(5.0 + x_factor * 10.0 + y_factor * 10.0);
        }
    }
    data
}

/// Creates a grid with NaN values at specified positions, zeros elsewhere.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    nan_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = vec![0.0f32; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f32::NAN;
        }
    }
    data
}

/// Wrap raw values in a projected (Conus Albers) raster grid.
pub fn albers_raster(data: Vec<f32>, width: usize, height: usize, bbox: BoundingBox) -> RasterGrid {
    RasterGrid::new(data, width, height, bbox, SpatialRef::ConusAlbers, None)
}

/// Wrap raw values in a geographic raster grid.
pub fn geographic_raster(
    data: Vec<f32>,
    width: usize,
    height: usize,
    bbox: BoundingBox,
) -> RasterGrid {
    RasterGrid::new(data, width, height, bbox, SpatialRef::Geographic, None)
}
