//! Projection of geographic grids onto the Albers plane.

use aq_common::{RasterGrid, SpatialRef};
use projection::AlbersEqualArea;

use crate::error::{GridOpsError, GridOpsResult};

/// Resampling method used when projecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMethod {
    /// Nearest neighbor (preserves exact values).
    Nearest,
    /// Bilinear interpolation (smooth, slight value changes).
    #[default]
    Bilinear,
}

impl InterpolationMethod {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nearest" => Self::Nearest,
            _ => Self::Bilinear,
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// Project a geographic grid to the Albers plane.
///
/// The output grid covers the projected extent of the input with the
/// same pixel count; every output cell center is mapped back through
/// the inverse projection and sampled from the source. Cells that land
/// outside the source extent are NaN.
pub fn project_to_albers(
    grid: &RasterGrid,
    proj: &AlbersEqualArea,
    method: InterpolationMethod,
) -> GridOpsResult<RasterGrid> {
    if grid.spatial_ref != SpatialRef::Geographic {
        return Err(GridOpsError::WrongSpatialRef {
            expected: SpatialRef::Geographic.to_string(),
            actual: grid.spatial_ref.to_string(),
        });
    }

    let bounds = proj.projected_bounds(&grid.bbox);

    let out_width = grid.width;
    let out_height = grid.height;
    let step_x = bounds.width() / out_width as f64;
    let step_y = bounds.height() / out_height as f64;

    let (res_x, res_y) = grid.resolution();
    let mut output = vec![f32::NAN; out_width * out_height];

    for out_row in 0..out_height {
        for out_col in 0..out_width {
            let x = bounds.min_x + (out_col as f64 + 0.5) * step_x;
            let y = bounds.max_y - (out_row as f64 + 0.5) * step_y;

            let (lon, lat) = proj.inverse(x, y);
            if !grid.bbox.contains_point(lon, lat) {
                continue;
            }

            // Fractional source position, zero at the first cell center
            let src_col = (lon - grid.bbox.min_x) / res_x - 0.5;
            let src_row = (grid.bbox.max_y - lat) / res_y - 0.5;

            output[out_row * out_width + out_col] = match method {
                InterpolationMethod::Nearest => {
                    nearest_sample(&grid.data, grid.width, grid.height, src_col, src_row)
                }
                InterpolationMethod::Bilinear => {
                    bilinear_sample(&grid.data, grid.width, grid.height, src_col, src_row)
                }
            };
        }
    }

    Ok(RasterGrid::new(
        output,
        out_width,
        out_height,
        bounds,
        SpatialRef::ConusAlbers,
        grid.nodata,
    ))
}

/// Value of the nearest source cell, NaN off-grid.
fn nearest_sample(data: &[f32], width: usize, height: usize, x: f64, y: f64) -> f32 {
    let col = x.round();
    let row = y.round();
    if col < 0.0 || row < 0.0 {
        return f32::NAN;
    }
    let (col, row) = (col as usize, row as usize);
    if col >= width || row >= height {
        return f32::NAN;
    }
    data[row * width + col]
}

/// Bilinear blend of the four surrounding source cells.
///
/// Falls back to the nearest cell at the grid edges; any NaN corner
/// makes the result NaN so missing data never bleeds into averages.
fn bilinear_sample(data: &[f32], width: usize, height: usize, x: f64, y: f64) -> f32 {
    let x = x.clamp(0.0, (width - 1) as f64);
    let y = y.clamp(0.0, (height - 1) as f64);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let xf = (x - x0 as f64) as f32;
    let yf = (y - y0 as f64) as f32;

    let v00 = data[y0 * width + x0];
    let v10 = data[y0 * width + x1];
    let v01 = data[y1 * width + x0];
    let v11 = data[y1 * width + x1];

    if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
        return f32::NAN;
    }

    let top = v00 * (1.0 - xf) + v10 * xf;
    let bottom = v01 * (1.0 - xf) + v11 * xf;
    top * (1.0 - yf) + bottom * yf
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_common::BoundingBox;

    fn geographic_grid(value: f32) -> RasterGrid {
        RasterGrid::filled(
            value,
            20,
            16,
            BoundingBox::new(-113.7, 32.1, -109.7, 34.7),
            SpatialRef::Geographic,
        )
    }

    #[test]
    fn test_projection_preserves_constant() {
        let grid = geographic_grid(7.5);
        let proj = AlbersEqualArea::conus();

        let projected =
            project_to_albers(&grid, &proj, InterpolationMethod::Bilinear).unwrap();

        assert_eq!(projected.spatial_ref, SpatialRef::ConusAlbers);
        assert_eq!(projected.width, grid.width);
        assert_eq!(projected.height, grid.height);

        let values: Vec<f32> = projected.data.iter().copied().filter(|v| !v.is_nan()).collect();
        assert!(!values.is_empty());
        assert!(values.iter().all(|&v| (v - 7.5).abs() < 1e-4));
    }

    #[test]
    fn test_projection_covers_interior() {
        let grid = geographic_grid(1.0);
        let proj = AlbersEqualArea::conus();

        let projected = project_to_albers(&grid, &proj, InterpolationMethod::Nearest).unwrap();

        // The projected image of the source rectangle is curved, so
        // some corner cells fall outside it, but most cells carry data.
        let valid = projected.valid_count();
        assert!(valid > projected.len() / 2, "only {} valid cells", valid);

        // The output grid center maps back inside the source extent
        let (cx, cy) = projected.cell_center(projected.width / 2, projected.height / 2);
        let (lon, lat) = proj.inverse(cx, cy);
        assert!(grid.bbox.contains_point(lon, lat));
    }

    #[test]
    fn test_projection_rejects_projected_input() {
        let grid = RasterGrid::filled(
            1.0,
            4,
            4,
            BoundingBox::new(0.0, 0.0, 120.0, 120.0),
            SpatialRef::ConusAlbers,
        );
        let proj = AlbersEqualArea::conus();

        let result = project_to_albers(&grid, &proj, InterpolationMethod::Bilinear);
        assert!(matches!(result, Err(GridOpsError::WrongSpatialRef { .. })));
    }

    #[test]
    fn test_bilinear_sample_nan_corner() {
        let data = vec![1.0, f32::NAN, 3.0, 4.0];
        assert!(bilinear_sample(&data, 2, 2, 0.5, 0.5).is_nan());
        assert_eq!(bilinear_sample(&data, 2, 2, 0.0, 1.0), 3.0);
    }

    #[test]
    fn test_nearest_sample_off_grid() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert!(nearest_sample(&data, 2, 2, -1.0, 0.0).is_nan());
        assert!(nearest_sample(&data, 2, 2, 0.0, 5.0).is_nan());
        assert_eq!(nearest_sample(&data, 2, 2, 0.4, 0.4), 1.0);
    }
}
