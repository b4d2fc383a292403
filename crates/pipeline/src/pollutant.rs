//! Pollutant ingestion stage.
//!
//! Walks a directory of annual pollutant NetCDF files. Each file's
//! component and year come from its name; the variable is extracted
//! windowed to every study area's geographic template, projected to
//! Conus Albers, and saved to the workspace as `GWR<VAR><YEAR><CITY>`,
//! replacing any prior raster of that name. Extraction intermediates
//! live only in memory.

use tracing::{error, info};

use aq_common::RasterName;
use grid_ops::{project_to_albers, InterpolationMethod};
use projection::AlbersEqualArea;
use raster_store::Workspace;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::metadata::{detect_file_kind, parse_pollutant_filename, FileKind};
use crate::{list_input_files, StageSummary};

/// Run the pollutant ingestion stage.
///
/// With `clean` set, all `GWR*` rasters are removed from the workspace
/// before ingesting, clearing the leftovers of an interrupted run.
pub fn run(config: &PipelineConfig, clean: bool) -> Result<StageSummary> {
    let input_dir = config
        .pollutant
        .input_dir
        .as_ref()
        .ok_or(PipelineError::MissingInputDir("pollutant"))?;

    let workspace = Workspace::open(&config.workspace, config.overwrite)?;

    if clean {
        for name in workspace.list_rasters()? {
            if name.starts_with("GWR") {
                workspace.delete_raster(&name)?;
                info!(raster = %name, "removed prior pollutant raster");
            }
        }
    }

    let albers = AlbersEqualArea::conus();
    let mut summary = StageSummary::default();

    for path in list_input_files(input_dir)? {
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        if detect_file_kind(&path) != FileKind::NetCdf {
            summary.skipped += 1;
            continue;
        }

        let info = match parse_pollutant_filename(&file_name) {
            Ok(info) => info,
            Err(e) => {
                error!(file = %file_name, error = %e, "skipping unrecognized pollutant file");
                summary.skipped += 1;
                continue;
            }
        };

        info!(
            file = %file_name,
            variable = info.variable.variable_name(),
            year = info.year,
            "ingesting pollutant file"
        );

        for area in &config.study_areas {
            let extracted = netcdf_extract::extract_variable(
                &path,
                info.variable.variable_name(),
                &area.template(),
            )?;
            let projected = project_to_albers(&extracted.grid, &albers, InterpolationMethod::Bilinear)?;

            let name = RasterName::new(info.variable.variable_name(), info.year, area.city);
            // prior outputs are replaced unconditionally so the stage
            // can be re-run after a partial failure
            workspace.delete_raster(&name.to_string())?;
            workspace.save_raster(&name.to_string(), &projected, extracted.units.as_deref())?;
            summary.outputs.push(name.to_string());
            info!(raster = %name, "created");
        }

        summary.processed += 1;
    }

    Ok(summary)
}
