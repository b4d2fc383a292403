//! Albers equal-area conic projection.
//!
//! The projected spatial reference every workspace raster and the tract
//! layers share (NAD83 / Conus Albers, EPSG:5070). A cone secant to the
//! Earth at two standard parallels is unrolled onto a plane; areas are
//! preserved, which is what the per-tract aggregation relies on.
//!
//! The projection parameters are:
//! - Latitude of origin (lat0)
//! - Central meridian (lon0)
//! - Two standard parallels (lat1, lat2)

use std::f64::consts::PI;

/// Albers equal-area conic projection parameters.
///
/// Spherical formulation on the GRS80 authalic radius. Forward maps
/// geographic degrees to plane meters; inverse maps back.
#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub lat1: f64,
    /// Second standard parallel in radians
    pub lat2: f64,
    /// Earth radius (meters)
    pub earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// C constant
    c: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl AlbersEqualArea {
    /// Create a projection from parameters in degrees.
    pub fn new(lat0_deg: f64, lon0_deg: f64, lat1_deg: f64, lat2_deg: f64) -> Self {
        let to_rad = PI / 180.0;

        let lat0 = lat0_deg * to_rad;
        let lon0 = lon0_deg * to_rad;
        let lat1 = lat1_deg * to_rad;
        let lat2 = lat2_deg * to_rad;

        // GRS80 authalic radius
        let earth_radius = 6371007.2;

        let n = (lat1.sin() + lat2.sin()) / 2.0;
        let c = lat1.cos().powi(2) + 2.0 * n * lat1.sin();
        let rho0 = earth_radius * (c - 2.0 * n * lat0.sin()).sqrt() / n;

        Self {
            lon0,
            lat0,
            lat1,
            lat2,
            earth_radius,
            n,
            c,
            rho0,
        }
    }

    /// The EPSG:5070 parameter set.
    ///
    /// Latitude of origin 23°N, central meridian 96°W, standard
    /// parallels 29.5°N and 45.5°N, no false easting/northing.
    pub fn conus() -> Self {
        Self::new(23.0, -96.0, 29.5, 45.5)
    }

    /// Project geographic coordinates (degrees) to plane coordinates (meters).
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;

        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.earth_radius * (self.c - 2.0 * self.n * lat.sin()).sqrt() / self.n;
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();

        (x, y)
    }

    /// Recover geographic coordinates (degrees) from plane coordinates (meters).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;

        let dy = self.rho0 - y;
        let rho = (x * x + dy * dy).sqrt();
        let theta = x.atan2(dy);

        let sin_lat = (self.c - (rho * self.n / self.earth_radius).powi(2)) / (2.0 * self.n);
        let lat = sin_lat.clamp(-1.0, 1.0).asin();
        let lon = self.lon0 + theta / self.n;

        (lon * to_deg, lat * to_deg)
    }

    /// Projected extent of a geographic bounding box.
    ///
    /// The projected image of a geographic rectangle has curved edges,
    /// so corners alone underestimate it; edge midpoints and samples
    /// along each edge are projected as well.
    pub fn projected_bounds(&self, bbox: &aq_common::BoundingBox) -> aq_common::BoundingBox {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        let steps = 16;
        for t in 0..=steps {
            let frac = t as f64 / steps as f64;
            let lon = bbox.min_x + frac * bbox.width();
            let lat = bbox.min_y + frac * bbox.height();

            for (px, py) in [
                self.forward(lon, bbox.min_y),
                self.forward(lon, bbox.max_y),
                self.forward(bbox.min_x, lat),
                self.forward(bbox.max_x, lat),
            ] {
                min_x = min_x.min(px);
                min_y = min_y.min(py);
                max_x = max_x.max(px);
                max_y = max_y.max(py);
            }
        }

        aq_common::BoundingBox::new(min_x, min_y, max_x, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_zero() {
        let proj = AlbersEqualArea::conus();
        let (x, y) = proj.forward(-96.0, 23.0);
        assert!(x.abs() < 1e-6, "x should be ~0, got {}", x);
        assert!(y.abs() < 1e-6, "y should be ~0, got {}", y);
    }

    #[test]
    fn test_roundtrip() {
        let proj = AlbersEqualArea::conus();

        for (lon, lat) in [
            (-112.07, 33.45), // Phoenix
            (-95.37, 29.76),  // Houston
            (-96.0, 40.0),
            (-120.0, 48.0),
            (-75.0, 25.0),
        ] {
            let (x, y) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(x, y);
            assert!(
                (lon - lon2).abs() < 1e-9,
                "longitude roundtrip failed: {} vs {}",
                lon,
                lon2
            );
            assert!(
                (lat - lat2).abs() < 1e-9,
                "latitude roundtrip failed: {} vs {}",
                lat,
                lat2
            );
        }
    }

    #[test]
    fn test_axis_directions() {
        let proj = AlbersEqualArea::conus();

        // West of the central meridian projects to negative x
        let (x_west, _) = proj.forward(-112.0, 33.0);
        assert!(x_west < 0.0);

        // East of it, positive x
        let (x_east, _) = proj.forward(-95.0, 30.0);
        assert!(x_east > 0.0);

        // North of the origin latitude, positive y
        let (_, y_north) = proj.forward(-96.0, 33.0);
        assert!(y_north > 0.0);
    }

    #[test]
    fn test_study_area_magnitudes() {
        let proj = AlbersEqualArea::conus();

        // Phoenix is roughly 1500 km west and 1300 km north of the origin
        let (x, y) = proj.forward(-112.07, 33.45);
        assert!(x < -1_200_000.0 && x > -1_800_000.0, "x = {}", x);
        assert!(y > 1_000_000.0 && y < 1_600_000.0, "y = {}", y);

        // Houston sits close to the central meridian
        let (x, _) = proj.forward(-95.37, 29.76);
        assert!(x.abs() < 150_000.0, "x = {}", x);
    }

    #[test]
    fn test_projected_bounds_contain_corners() {
        let proj = AlbersEqualArea::conus();
        let bbox = aq_common::BoundingBox::new(-113.7, 32.1, -109.7, 34.7);
        let projected = proj.projected_bounds(&bbox);

        for (lon, lat) in [
            (bbox.min_x, bbox.min_y),
            (bbox.min_x, bbox.max_y),
            (bbox.max_x, bbox.min_y),
            (bbox.max_x, bbox.max_y),
        ] {
            let (x, y) = proj.forward(lon, lat);
            assert!(projected.contains_point(x, y));
        }

        assert!(projected.width() > 0.0);
        assert!(projected.height() > 0.0);
    }
}
