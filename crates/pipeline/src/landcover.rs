//! Land-cover clipping stage.
//!
//! Walks a directory of annual land-cover GeoTIFFs and clips each one
//! to every configured study area: the raster is windowed to the tract
//! layer's extent, cells outside the tract polygons are blanked to the
//! configured nodata value, and the result is saved to the workspace as
//! `<PRODUCT><YEAR><CITY>`.

use tracing::{error, info};

use aq_common::{RasterGrid, RasterName, SpatialRef};
use grid_ops::{apply_mask, clip_to_bbox};
use raster_store::Workspace;
use tract_layer::{TractLayer, DEFAULT_KEY_FIELD};
use zonal_stats::rasterize::{coverage_mask, zone_index};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::metadata::{detect_file_kind, parse_landcover_filename, FileKind};
use crate::{list_input_files, StageSummary};

/// Run the land-cover clipping stage.
pub fn run(config: &PipelineConfig) -> Result<StageSummary> {
    let input_dir = config
        .landcover
        .input_dir
        .as_ref()
        .ok_or(PipelineError::MissingInputDir("landcover"))?;

    let workspace = Workspace::open(&config.workspace, config.overwrite)?;

    let mut areas = Vec::with_capacity(config.study_areas.len());
    for area in &config.study_areas {
        let layer = TractLayer::from_shapefile(&area.tract_shapefile, DEFAULT_KEY_FIELD)?;
        info!(city = %area.city, tracts = layer.len(), "loaded study area tracts");
        areas.push((area.city, layer));
    }

    let mut summary = StageSummary::default();
    for path in list_input_files(input_dir)? {
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        if detect_file_kind(&path) != FileKind::GeoTiff {
            summary.skipped += 1;
            continue;
        }

        let info = match parse_landcover_filename(&file_name) {
            Ok(info) => info,
            Err(e) => {
                error!(file = %file_name, error = %e, "skipping unrecognized land-cover file");
                summary.skipped += 1;
                continue;
            }
        };

        info!(file = %file_name, "starting clipping");
        let raster = geotiff_parser::read_geotiff(&path, SpatialRef::ConusAlbers)?;

        for (city, layer) in &areas {
            let name = RasterName::new(info.product.code(), info.year, *city);
            let clipped = clip_study_area(&raster, layer, config.landcover.nodata)?;
            workspace.save_raster(&name.to_string(), &clipped, None)?;
            summary.outputs.push(name.to_string());
            info!(city = %city, raster = %name, "clipped study area");
        }

        summary.processed += 1;
    }

    Ok(summary)
}

/// Window a raster to a tract layer and blank everything outside the
/// tract polygons.
fn clip_study_area(raster: &RasterGrid, layer: &TractLayer, nodata: f32) -> Result<RasterGrid> {
    let windowed = clip_to_bbox(raster, &layer.bbox)?;
    let zones = zone_index(&windowed, layer);
    let mut masked = apply_mask(&windowed, &coverage_mask(&zones))?;
    masked.nodata = Some(nodata);
    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_common::BoundingBox;
    use test_utils::fixtures::write_square_tracts;
    use test_utils::generators::albers_raster;

    #[test]
    fn test_clip_study_area_masks_outside_tracts() {
        let dir = tempfile::tempdir().unwrap();
        let shp = dir.path().join("tracts.shp");
        write_square_tracts(&shp, &[("G001", BoundingBox::new(20.0, 20.0, 80.0, 80.0))]).unwrap();
        let layer = TractLayer::from_shapefile(&shp, DEFAULT_KEY_FIELD).unwrap();

        let raster = albers_raster(
            vec![7.0; 400],
            20,
            20,
            BoundingBox::new(0.0, 0.0, 200.0, 200.0),
        );

        let clipped = clip_study_area(&raster, &layer, 250.0).unwrap();

        // windowed to the tract extent: 20..80 on both axes, 10m cells
        assert_eq!(clipped.width, 6);
        assert_eq!(clipped.height, 6);
        assert_eq!(clipped.nodata, Some(250.0));
        // every retained cell center falls inside the single tract
        assert_eq!(clipped.valid_count(), 36);
    }
}
