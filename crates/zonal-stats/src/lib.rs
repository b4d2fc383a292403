//! Zonal statistics of rasters against tract layers.
//!
//! A raster and a tract layer in the same projected spatial reference
//! go in; a [`ZonalTable`] keyed by GISJOIN comes out. Zone membership
//! is decided per cell center, and every statistic of the full set is
//! computed in one pass over the assignment.

pub mod error;
pub mod rasterize;
pub mod stats;
pub mod table;

use aq_common::RasterGrid;
use tract_layer::TractLayer;

pub use error::{ZonalError, ZonalResult};
pub use stats::{ZonalStatistics, STAT_COLUMNS};
pub use table::{ZonalRow, ZonalTable};

/// Compute the full statistics set of `grid` per tract of `layer`.
///
/// Tracts containing no data cells are left out of the table, as are
/// cells carrying no data (NaN).
pub fn zonal_statistics(grid: &RasterGrid, layer: &TractLayer, table_name: &str) -> ZonalTable {
    let zones = rasterize::zone_index(grid, layer);

    let mut per_zone: Vec<Vec<f32>> = vec![Vec::new(); layer.len()];
    for (cell, zone) in zones.iter().enumerate() {
        if let Some(z) = zone {
            let v = grid.data[cell];
            if !v.is_nan() {
                per_zone[*z].push(v);
            }
        }
    }

    let cell_area = grid.cell_area();
    let mut rows = Vec::new();
    for (index, values) in per_zone.iter().enumerate() {
        if let Some(stats) = ZonalStatistics::from_values(values, cell_area) {
            rows.push(ZonalRow {
                zone: layer.tracts()[index].key.clone(),
                stats,
            });
        }
    }

    ZonalTable {
        name: table_name.to_string(),
        zone_field: layer.key_field.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_common::{BoundingBox, RasterGrid, SpatialRef};
    use tract_layer::{TractLayer, DEFAULT_KEY_FIELD};

    fn two_tract_layer(dir: &std::path::Path) -> TractLayer {
        let path = dir.join("tracts.shp");
        test_utils::fixtures::write_square_tracts(
            &path,
            &[
                ("G001", BoundingBox::new(0.0, 0.0, 50.0, 100.0)),
                ("G002", BoundingBox::new(50.0, 0.0, 100.0, 100.0)),
            ],
        )
        .unwrap();
        TractLayer::from_shapefile(&path, DEFAULT_KEY_FIELD).unwrap()
    }

    #[test]
    fn test_zonal_statistics_split_grid() {
        let dir = tempfile::tempdir().unwrap();
        let layer = two_tract_layer(dir.path());

        // left column of cells is 1.0, right column 3.0
        let mut data = Vec::new();
        for _row in 0..10 {
            for col in 0..10 {
                data.push(if col < 5 { 1.0 } else { 3.0 });
            }
        }
        let grid = RasterGrid::new(
            data,
            10,
            10,
            BoundingBox::new(0.0, 0.0, 100.0, 100.0),
            SpatialRef::ConusAlbers,
            None,
        );

        let table = zonal_statistics(&grid, &layer, "zonalTableTest2010P");
        assert_eq!(table.len(), 2);
        assert_eq!(table.zone_field, "GISJOIN");

        let first = &table.rows[0];
        assert_eq!(first.zone, "G001");
        assert_eq!(first.stats.count, 50);
        assert_eq!(first.stats.mean, 1.0);
        assert_eq!(first.stats.area, 50.0 * 100.0);

        let second = &table.rows[1];
        assert_eq!(second.zone, "G002");
        assert_eq!(second.stats.mean, 3.0);
        assert_eq!(second.stats.sum, 150.0);
    }

    #[test]
    fn test_zonal_statistics_skips_empty_and_nodata() {
        let dir = tempfile::tempdir().unwrap();
        let layer = two_tract_layer(dir.path());

        // grid only covers the first tract; second gets no cells
        let mut grid = RasterGrid::filled(
            2.0,
            5,
            10,
            BoundingBox::new(0.0, 0.0, 50.0, 100.0),
            SpatialRef::ConusAlbers,
        );
        grid.set(0, 0, f32::NAN);

        let table = zonal_statistics(&grid, &layer, "zonalTableTest2010P");
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].zone, "G001");
        assert_eq!(table.rows[0].stats.count, 49);
    }
}
