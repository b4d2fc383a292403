//! Pipeline configuration.
//!
//! One YAML file configures all three stages; they share the workspace
//! directory and the study-area definitions. Built-in defaults carry
//! the constants the workflow has always used: the two city templates
//! and nodata 250 for land-cover clips.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use aq_common::{BoundingBox, City};

use crate::error::Result;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Workspace directory shared by all stages.
    pub workspace: PathBuf,

    /// Allow replacing rasters that already exist in the workspace.
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Land-cover clipping stage settings.
    #[serde(default)]
    pub landcover: LandCoverConfig,

    /// Pollutant ingestion stage settings.
    #[serde(default)]
    pub pollutant: PollutantConfig,

    /// The study areas, one per city.
    pub study_areas: Vec<StudyAreaConfig>,
}

/// Settings for the land-cover clipping stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandCoverConfig {
    /// Directory of input GeoTIFFs.
    pub input_dir: Option<PathBuf>,

    /// Nodata value stamped on clipped land-cover rasters.
    #[serde(default = "default_landcover_nodata")]
    pub nodata: f32,
}

/// Settings for the pollutant ingestion stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollutantConfig {
    /// Directory of input NetCDF files.
    pub input_dir: Option<PathBuf>,
}

/// One study area: the city, its tract shapefile, and optionally a
/// geographic template overriding the built-in one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyAreaConfig {
    pub city: City,

    /// Tract polygon shapefile, projected to Conus Albers.
    pub tract_shapefile: PathBuf,

    /// Geographic bounding template for pollutant windowing; the city's
    /// built-in template applies when absent.
    #[serde(default)]
    pub template: Option<BoundingBox>,
}

impl StudyAreaConfig {
    /// The geographic template to window pollutant grids with.
    pub fn template(&self) -> BoundingBox {
        self.template.unwrap_or_else(|| self.city.template())
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    /// The configured study area for a city, if any.
    pub fn study_area(&self, city: City) -> Option<&StudyAreaConfig> {
        self.study_areas.iter().find(|a| a.city == city)
    }
}

fn default_true() -> bool {
    true
}

fn default_landcover_nodata() -> f32 {
    250.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml() {
        let yaml = r#"
workspace: /data/workspace
study_areas:
  - city: Phoenix
    tract_shapefile: /data/tracts/phoenix_tract_2010_albers.shp
  - city: Houston
    tract_shapefile: /data/tracts/houston_tract_2010_albers.shp
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.overwrite);
        assert_eq!(config.landcover.nodata, 250.0);
        assert_eq!(config.study_areas.len(), 2);

        let phoenix = config.study_area(City::Phoenix).unwrap();
        // falls back to the built-in template
        assert_eq!(phoenix.template(), City::Phoenix.template());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
workspace: /data/workspace
overwrite: false
landcover:
  input_dir: /data/nlcd
  nodata: 255
pollutant:
  input_dir: /data/pm25
study_areas:
  - city: Houston
    tract_shapefile: /data/tracts/houston.shp
    template:
      min_x: -96.6
      min_y: 28.8
      max_x: -94.3
      max_y: 30.9
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.overwrite);
        assert_eq!(config.landcover.nodata, 255.0);
        assert_eq!(
            config.landcover.input_dir.as_deref(),
            Some(Path::new("/data/nlcd"))
        );

        let houston = config.study_area(City::Houston).unwrap();
        assert_eq!(houston.template().min_x, -96.6);
        assert!(config.study_area(City::Phoenix).is_none());
    }
}
