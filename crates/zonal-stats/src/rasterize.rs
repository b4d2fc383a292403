//! Zone rasterization: assigning raster cells to tracts.

use aq_common::RasterGrid;
use tract_layer::TractLayer;

/// For each cell of `grid`, the index of the tract containing the cell
/// center, or None for uncovered cells.
///
/// Iterates tract-by-tract so each polygon is only tested against the
/// cells inside its own extent. Cells on shared boundaries go to the
/// first tract in file order that claims them.
pub fn zone_index(grid: &RasterGrid, layer: &TractLayer) -> Vec<Option<usize>> {
    let mut zones: Vec<Option<usize>> = vec![None; grid.len()];
    let (res_x, res_y) = grid.resolution();

    for (index, tract) in layer.tracts().iter().enumerate() {
        // Cell range overlapped by the tract extent
        let col0 = (((tract.bbox.min_x - grid.bbox.min_x) / res_x).floor().max(0.0)) as usize;
        let col1 = ((((tract.bbox.max_x - grid.bbox.min_x) / res_x).ceil()).max(0.0) as usize)
            .min(grid.width);
        let row0 = (((grid.bbox.max_y - tract.bbox.max_y) / res_y).floor().max(0.0)) as usize;
        let row1 = ((((grid.bbox.max_y - tract.bbox.min_y) / res_y).ceil()).max(0.0) as usize)
            .min(grid.height);

        for row in row0..row1 {
            for col in col0..col1 {
                let cell = row * grid.width + col;
                if zones[cell].is_some() {
                    continue;
                }
                let (x, y) = grid.cell_center(col, row);
                if tract.contains(x, y) {
                    zones[cell] = Some(index);
                }
            }
        }
    }

    zones
}

/// Boolean coverage mask from a zone assignment.
pub fn coverage_mask(zones: &[Option<usize>]) -> Vec<bool> {
    zones.iter().map(|z| z.is_some()).collect()
}
