//! Zonal statistics and join stage.
//!
//! Walks every raster in the workspace whose name follows the
//! `<CODE><YYYY><CITY>` convention. Land-cover rasters are first split
//! into five binary urban reclassifications; each raster then gets the
//! full zonal statistics set against its city's tract layer, a
//! persisted statistics table, and a joined tract shapefile.

use std::collections::HashMap;

use tracing::{debug, info};

use aq_common::{City, RasterGrid, RasterName};
use grid_ops::{reclassify, RemapRange};
use raster_store::Workspace;
use tract_layer::{TractLayer, DEFAULT_KEY_FIELD};
use zonal_stats::zonal_statistics;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::StageSummary;

/// Marker identifying land-cover rasters in the workspace.
const LANDCOVER_MARKER: &str = "LndCov";

/// The five binary urban reclassifications derived from a land-cover
/// raster: all urban classes together, then classes 21 through 24
/// individually. Ranges are inclusive; anything outside them is nodata.
fn urban_remaps() -> [(&'static str, [RemapRange; 3]); 5] {
    [
        (
            "AllUrb",
            [
                RemapRange::new(11.0, 12.0, 0.0),
                RemapRange::new(21.0, 24.0, 1.0),
                RemapRange::new(31.0, 95.0, 0.0),
            ],
        ),
        (
            "Class21Urb",
            [
                RemapRange::new(11.0, 12.0, 0.0),
                RemapRange::new(21.0, 21.0, 1.0),
                RemapRange::new(22.0, 95.0, 0.0),
            ],
        ),
        (
            "Class22Urb",
            [
                RemapRange::new(11.0, 21.0, 0.0),
                RemapRange::new(22.0, 22.0, 1.0),
                RemapRange::new(23.0, 95.0, 0.0),
            ],
        ),
        (
            "Class23Urb",
            [
                RemapRange::new(11.0, 22.0, 0.0),
                RemapRange::new(23.0, 23.0, 1.0),
                RemapRange::new(24.0, 95.0, 0.0),
            ],
        ),
        (
            "Class24Urb",
            [
                RemapRange::new(11.0, 23.0, 0.0),
                RemapRange::new(24.0, 24.0, 1.0),
                RemapRange::new(25.0, 95.0, 0.0),
            ],
        ),
    ]
}

/// Run the zonal statistics and join stage.
pub fn run(config: &PipelineConfig) -> Result<StageSummary> {
    let workspace = Workspace::open(&config.workspace, config.overwrite)?;

    let mut layers: HashMap<City, TractLayer> = HashMap::new();
    for area in &config.study_areas {
        let layer = TractLayer::from_shapefile(&area.tract_shapefile, DEFAULT_KEY_FIELD)?;
        info!(city = %area.city, tracts = layer.len(), "loaded study area tracts");
        layers.insert(area.city, layer);
    }

    let names = workspace.list_rasters()?;
    info!(rasters = names.len(), "scanning workspace rasters");

    let mut summary = StageSummary::default();
    for name in names {
        let parsed: RasterName = match name.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                debug!(raster = %name, "skipping raster outside the naming convention");
                summary.skipped += 1;
                continue;
            }
        };

        let layer = layers
            .get(&parsed.city)
            .ok_or(PipelineError::MissingStudyArea(parsed.city))?;

        let (grid, _metadata) = workspace.load_raster(&name)?;

        if parsed.code.contains(LANDCOVER_MARKER) {
            urban_percents(&workspace, &grid, &parsed, layer, &mut summary)?;
        } else {
            let out_name = format!("{name}ZonalStats");
            zonal_stats_join(&workspace, &grid, layer, &name, &out_name)?;
            summary.outputs.push(out_name);
        }

        summary.processed += 1;
    }

    Ok(summary)
}

/// Split a land-cover raster into the five urban reclassifications and
/// run the statistics step on each.
fn urban_percents(
    workspace: &Workspace,
    grid: &RasterGrid,
    parsed: &RasterName,
    layer: &TractLayer,
    summary: &mut StageSummary,
) -> Result<()> {
    for (prefix, table) in urban_remaps() {
        let out = reclassify(grid, &table);
        let out_name = RasterName::new(prefix, parsed.year, parsed.city).to_string();

        workspace.save_raster(&out_name, &out, None)?;
        info!(raster = %out_name, "saved urban reclassification");

        zonal_stats_join(workspace, &out, layer, &out_name, &out_name)?;
        summary.outputs.push(out_name);
    }

    Ok(())
}

/// Compute zonal statistics of a raster, persist the table, and write
/// the statistics joined onto tract geometry.
fn zonal_stats_join(
    workspace: &Workspace,
    grid: &RasterGrid,
    layer: &TractLayer,
    raster_name: &str,
    out_name: &str,
) -> Result<()> {
    let table = zonal_statistics(grid, layer, &format!("zonalTable{raster_name}"));
    table.write_csv(workspace.table_path(&table.name))?;
    info!(raster = %raster_name, zones = table.len(), "zonal statistics computed");

    layer.write_joined(workspace.feature_path(out_name), &table.columns())?;
    info!(output = %out_name, "statistics joined to tracts");

    Ok(())
}
