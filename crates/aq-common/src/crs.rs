//! Spatial reference identifiers.

use serde::{Deserialize, Serialize};

/// The two spatial references the pipeline works in.
///
/// Pollutant grids arrive in geographic NAD83 coordinates; every raster
/// stored in the workspace, and the tract layers, are in NAD83 / Conus
/// Albers equal-area (EPSG:5070).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpatialRef {
    /// Geographic NAD83, coordinates in degrees.
    Geographic,
    /// NAD83 / Conus Albers equal-area, coordinates in meters.
    ConusAlbers,
}

impl SpatialRef {
    /// EPSG code for this spatial reference.
    pub fn epsg(&self) -> u32 {
        match self {
            SpatialRef::Geographic => 4269,
            SpatialRef::ConusAlbers => 5070,
        }
    }

    /// Look up a spatial reference by EPSG code.
    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4269 => Some(SpatialRef::Geographic),
            5070 => Some(SpatialRef::ConusAlbers),
            _ => None,
        }
    }

    /// Coordinate units.
    pub fn units(&self) -> &'static str {
        match self {
            SpatialRef::Geographic => "degrees",
            SpatialRef::ConusAlbers => "meters",
        }
    }
}

impl std::fmt::Display for SpatialRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_roundtrip() {
        assert_eq!(SpatialRef::from_epsg(5070), Some(SpatialRef::ConusAlbers));
        assert_eq!(SpatialRef::from_epsg(4269), Some(SpatialRef::Geographic));
        assert_eq!(SpatialRef::from_epsg(3857), None);
        assert_eq!(SpatialRef::ConusAlbers.epsg(), 5070);
    }

    #[test]
    fn test_display() {
        assert_eq!(SpatialRef::ConusAlbers.to_string(), "EPSG:5070");
    }
}
