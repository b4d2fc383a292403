//! The pipeline workspace: a directory of named rasters, statistics
//! tables, and output feature classes.
//!
//! Rasters are stored as a JSON metadata sidecar plus a raw
//! little-endian f32 payload:
//!
//! ```text
//! <root>/rasters/<NAME>.json
//! <root>/rasters/<NAME>.f32
//! <root>/tables/<NAME>.csv
//! <root>/features/<NAME>.shp (+ .shx, .dbf)
//! ```
//!
//! All three stages point at the same workspace; names follow the
//! `<CODE><YYYY><CITY>` convention. Replacement of an existing raster
//! is gated by the overwrite flag, the way re-runs of the original
//! workflow relied on the toolkit's overwrite setting.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use aq_common::{RasterGrid, RasterMetadata, SpatialRef};

use crate::error::{StoreError, StoreResult};

const RASTER_DIR: &str = "rasters";
const TABLE_DIR: &str = "tables";
const FEATURE_DIR: &str = "features";

/// A workspace rooted at a directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    overwrite: bool,
}

impl Workspace {
    /// Open a workspace, creating its directory layout if needed.
    pub fn open<P: AsRef<Path>>(root: P, overwrite: bool) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        for dir in [RASTER_DIR, TABLE_DIR, FEATURE_DIR] {
            fs::create_dir_all(root.join(dir))?;
        }
        Ok(Self { root, overwrite })
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether existing rasters may be replaced.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Persist a raster under a workspace name.
    pub fn save_raster(
        &self,
        name: &str,
        grid: &RasterGrid,
        units: Option<&str>,
    ) -> StoreResult<()> {
        validate_name(name)?;
        if self.raster_exists(name) && !self.overwrite {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }

        let metadata = grid.metadata(name, units);
        let json = serde_json::to_string_pretty(&metadata)?;
        fs::write(self.raster_meta_path(name), json)?;

        let mut writer = BufWriter::new(File::create(self.raster_payload_path(name))?);
        for value in &grid.data {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;

        debug!(raster = %name, cells = grid.len(), "saved workspace raster");
        Ok(())
    }

    /// Load a raster and its metadata by name.
    pub fn load_raster(&self, name: &str) -> StoreResult<(RasterGrid, RasterMetadata)> {
        validate_name(name)?;
        let meta_path = self.raster_meta_path(name);
        if !meta_path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let metadata: RasterMetadata = serde_json::from_str(&fs::read_to_string(meta_path)?)?;
        let (width, height) = metadata.shape;

        let mut reader = BufReader::new(File::open(self.raster_payload_path(name))?);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        if bytes.len() != width * height * 4 {
            return Err(StoreError::CorruptPayload {
                name: name.to_string(),
                expected: width * height,
                actual: bytes.len() / 4,
            });
        }

        let data: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        let spatial_ref = metadata.spatial_ref().unwrap_or(SpatialRef::ConusAlbers);
        let grid = RasterGrid::new(data, width, height, metadata.bbox, spatial_ref, metadata.nodata);

        debug!(raster = %name, cells = grid.len(), "loaded workspace raster");
        Ok((grid, metadata))
    }

    /// Check if a raster exists in the workspace.
    pub fn raster_exists(&self, name: &str) -> bool {
        self.raster_meta_path(name).exists()
    }

    /// Remove a raster if present. Removing an absent raster is not an
    /// error, so re-runs can clear prior outputs unconditionally.
    pub fn delete_raster(&self, name: &str) -> StoreResult<()> {
        validate_name(name)?;
        for path in [self.raster_meta_path(name), self.raster_payload_path(name)] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Names of all rasters in the workspace, sorted.
    pub fn list_rasters(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root.join(RASTER_DIR))? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Path of a statistics table in the workspace.
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(TABLE_DIR).join(format!("{name}.csv"))
    }

    /// Path of an output feature class in the workspace.
    pub fn feature_path(&self, name: &str) -> PathBuf {
        self.root.join(FEATURE_DIR).join(format!("{name}.shp"))
    }

    fn raster_meta_path(&self, name: &str) -> PathBuf {
        self.root.join(RASTER_DIR).join(format!("{name}.json"))
    }

    fn raster_payload_path(&self, name: &str) -> PathBuf {
        self.root.join(RASTER_DIR).join(format!("{name}.f32"))
    }
}

fn validate_name(name: &str) -> StoreResult<()> {
    if name.is_empty() || name.contains(['/', '\\', '.']) {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_common::BoundingBox;

    fn sample_grid() -> RasterGrid {
        let mut data: Vec<f32> = (0..12).map(|i| i as f32).collect();
        data[5] = f32::NAN;
        RasterGrid::new(
            data,
            4,
            3,
            BoundingBox::new(0.0, 0.0, 120.0, 90.0),
            SpatialRef::ConusAlbers,
            Some(250.0),
        )
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path(), false).unwrap();
        let grid = sample_grid();

        workspace.save_raster("LndCov2010P", &grid, None).unwrap();
        let (loaded, metadata) = workspace.load_raster("LndCov2010P").unwrap();

        assert_eq!(loaded.width, 4);
        assert_eq!(loaded.height, 3);
        assert_eq!(loaded.bbox, grid.bbox);
        assert_eq!(loaded.spatial_ref, SpatialRef::ConusAlbers);
        assert_eq!(loaded.nodata, Some(250.0));
        assert_eq!(metadata.name, "LndCov2010P");

        assert_eq!(loaded.data[0], 0.0);
        assert!(loaded.data[5].is_nan());
        assert_eq!(loaded.data[11], 11.0);
    }

    #[test]
    fn test_overwrite_gating() {
        let dir = tempfile::tempdir().unwrap();
        let grid = sample_grid();

        let guarded = Workspace::open(dir.path(), false).unwrap();
        guarded.save_raster("GWRPM252000H", &grid, Some("ug/m3")).unwrap();
        let result = guarded.save_raster("GWRPM252000H", &grid, Some("ug/m3"));
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));

        let permissive = Workspace::open(dir.path(), true).unwrap();
        permissive
            .save_raster("GWRPM252000H", &grid, Some("ug/m3"))
            .unwrap();
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path(), false).unwrap();
        let grid = sample_grid();

        workspace.save_raster("GWRSS2010P", &grid, None).unwrap();
        assert!(workspace.raster_exists("GWRSS2010P"));

        workspace.delete_raster("GWRSS2010P").unwrap();
        assert!(!workspace.raster_exists("GWRSS2010P"));

        // absent raster: still fine
        workspace.delete_raster("GWRSS2010P").unwrap();
    }

    #[test]
    fn test_list_rasters_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path(), false).unwrap();
        let grid = sample_grid();

        for name in ["LndCov2010P", "GWRPM252000H", "AllUrb2010P"] {
            workspace.save_raster(name, &grid, None).unwrap();
        }

        let names = workspace.list_rasters().unwrap();
        assert_eq!(names, vec!["AllUrb2010P", "GWRPM252000H", "LndCov2010P"]);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path(), false).unwrap();
        let grid = sample_grid();

        assert!(matches!(
            workspace.save_raster("../escape", &grid, None),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            workspace.save_raster("", &grid, None),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_load_missing_raster() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path(), false).unwrap();
        assert!(matches!(
            workspace.load_raster("Nothing2010P"),
            Err(StoreError::NotFound(_))
        ));
    }
}
