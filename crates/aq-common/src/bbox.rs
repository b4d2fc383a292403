//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A rectangular extent in either geographic or projected coordinates.
///
/// For geographic data the units are degrees; for projected data
/// (Conus Albers) they are meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse an extent string: four whitespace-separated numbers
    /// (`min_x min_y max_x max_y`), with any trailing text ignored.
    ///
    /// This accepts the extent templates exported by desktop GIS tools,
    /// which append a coordinate-system description after the corners.
    pub fn from_extent_str(s: &str) -> Result<Self, BboxParseError> {
        let mut parts = s.split_whitespace();
        let mut corner = |name: &'static str| -> Result<f64, BboxParseError> {
            let token = parts
                .next()
                .ok_or_else(|| BboxParseError::MissingCorner(name))?;
            token
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(token.to_string()))
        };

        Ok(Self {
            min_x: corner("min_x")?,
            min_y: corner("min_y")?,
            max_x: corner("max_x")?,
            max_y: corner("max_y")?,
        })
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Compute the intersection of two bounding boxes.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Expand the bounding box outward by a buffer amount.
    pub fn expand(&self, buffer: f64) -> Self {
        Self {
            min_x: self.min_x - buffer,
            min_y: self.min_y - buffer,
            max_x: self.max_x + buffer,
            max_y: self.max_y + buffer,
        }
    }

    /// Center point of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Extent string is missing the {0} corner")]
    MissingCorner(&'static str),

    #[error("Invalid number in extent string: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extent_str() {
        let bbox = BoundingBox::from_extent_str("-113.7 32.1 -109.7 34.6").unwrap();
        assert_eq!(bbox.min_x, -113.7);
        assert_eq!(bbox.min_y, 32.1);
        assert_eq!(bbox.max_x, -109.7);
        assert_eq!(bbox.max_y, 34.6);
    }

    #[test]
    fn test_parse_extent_str_with_trailing_wkt() {
        let bbox = BoundingBox::from_extent_str(
            "-96.62 28.81 -94.32 30.90 GEOGCS[\"GCS_North_American_1983\"]",
        )
        .unwrap();
        assert_eq!(bbox.min_x, -96.62);
        assert_eq!(bbox.max_y, 30.90);
    }

    #[test]
    fn test_parse_extent_str_malformed() {
        assert!(BoundingBox::from_extent_str("-96.62 28.81").is_err());
        assert!(BoundingBox::from_extent_str("a b c d").is_err());
    }

    #[test]
    fn test_intersection() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        let c = BoundingBox::new(20.0, 20.0, 30.0, 30.0);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));

        let intersection = a.intersection(&b).unwrap();
        assert_eq!(intersection.min_x, 5.0);
        assert_eq!(intersection.min_y, 5.0);
        assert_eq!(intersection.max_x, 10.0);
        assert_eq!(intersection.max_y, 10.0);
    }

    #[test]
    fn test_contains_point() {
        let bbox = BoundingBox::new(-100.0, 30.0, -90.0, 40.0);
        assert!(bbox.contains_point(-95.0, 35.0));
        assert!(!bbox.contains_point(-105.0, 35.0));
        assert!(!bbox.contains_point(-95.0, 45.0));
    }
}
