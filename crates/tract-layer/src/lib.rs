//! Census tract polygon layers.
//!
//! Loads a study-area tract shapefile, keys every feature by its
//! `GISJOIN` attribute, answers point-in-zone queries for the zonal
//! rasterization, and writes tract geometry back out with appended
//! statistics columns.
//!
//! The tract layers are expected in the same projected spatial
//! reference as the rasters they are used against (Conus Albers); the
//! layer itself carries no reprojection logic.

pub mod error;

use std::collections::HashMap;
use std::path::Path;

use geo::Contains;
use geo_types::{LineString, MultiPolygon, Point, Polygon};
use shapefile::dbase;

use aq_common::BoundingBox;

pub use error::{TractError, TractResult};

/// Attribute field carrying the census join key.
pub const DEFAULT_KEY_FIELD: &str = "GISJOIN";

/// Width of the key column in output attribute tables.
const KEY_FIELD_WIDTH: u8 = 60;

/// One census tract: join key plus geometry.
#[derive(Debug, Clone)]
pub struct Tract {
    /// Join key (GISJOIN).
    pub key: String,
    /// Geometry as read, written back out unchanged on join.
    shape: shapefile::Polygon,
    /// Geometry converted for containment tests.
    geometry: MultiPolygon<f64>,
    /// Extent of the geometry, used as a containment prefilter.
    pub bbox: BoundingBox,
}

impl Tract {
    /// Check if a point falls inside this tract.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.bbox.contains_point(x, y) && self.geometry.contains(&Point::new(x, y))
    }
}

/// A tract polygon layer keyed by GISJOIN.
#[derive(Debug, Clone)]
pub struct TractLayer {
    /// Layer name (the shapefile stem).
    pub name: String,
    /// Attribute field the keys came from.
    pub key_field: String,
    tracts: Vec<Tract>,
    /// Union extent of all tracts.
    pub bbox: BoundingBox,
}

impl TractLayer {
    /// Load a tract layer from a shapefile, keying features by `key_field`.
    pub fn from_shapefile<P: AsRef<Path>>(path: P, key_field: &str) -> TractResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("tracts")
            .to_string();

        let features =
            shapefile::read_as::<_, shapefile::Polygon, dbase::Record>(path)?;

        let mut tracts = Vec::with_capacity(features.len());
        for (index, (polygon, record)) in features.into_iter().enumerate() {
            let key = match record.get(key_field) {
                Some(dbase::FieldValue::Character(Some(s))) => s.trim().to_string(),
                _ => {
                    return Err(TractError::MissingKeyField {
                        field: key_field.to_string(),
                        file: path.display().to_string(),
                        index,
                    })
                }
            };

            let bbox = polygon_extent(&polygon);
            let geometry = to_multipolygon(&polygon);

            tracts.push(Tract {
                key,
                shape: polygon,
                geometry,
                bbox,
            });
        }

        if tracts.is_empty() {
            return Err(TractError::EmptyLayer(name));
        }

        let mut bbox = tracts[0].bbox;
        for tract in &tracts[1..] {
            bbox.min_x = bbox.min_x.min(tract.bbox.min_x);
            bbox.min_y = bbox.min_y.min(tract.bbox.min_y);
            bbox.max_x = bbox.max_x.max(tract.bbox.max_x);
            bbox.max_y = bbox.max_y.max(tract.bbox.max_y);
        }

        Ok(Self {
            name,
            key_field: key_field.to_string(),
            tracts,
            bbox,
        })
    }

    /// Number of tracts in the layer.
    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    /// Check if the layer is empty.
    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }

    /// The tracts, in file order.
    pub fn tracts(&self) -> &[Tract] {
        &self.tracts
    }

    /// Index of the first tract containing a point.
    pub fn zone_at(&self, x: f64, y: f64) -> Option<usize> {
        self.tracts.iter().position(|t| t.contains(x, y))
    }

    /// Write the layer with appended numeric columns as a new shapefile.
    ///
    /// The output attribute table is the join key plus one numeric field
    /// per column; tracts absent from a column get a null value.
    pub fn write_joined<P: AsRef<Path>>(
        &self,
        path: P,
        columns: &[AttributeColumn],
    ) -> TractResult<()> {
        let mut builder = dbase::TableWriterBuilder::new()
            .add_character_field(field_name(&self.key_field)?, KEY_FIELD_WIDTH);
        for column in columns {
            builder = builder.add_numeric_field(field_name(&column.name)?, 20, 6);
        }

        let mut writer = shapefile::Writer::from_path(path.as_ref(), builder)?;
        for tract in &self.tracts {
            let mut record = dbase::Record::default();
            record.insert(
                self.key_field.clone(),
                dbase::FieldValue::Character(Some(tract.key.clone())),
            );
            for column in columns {
                record.insert(
                    column.name.clone(),
                    dbase::FieldValue::Numeric(column.values.get(&tract.key).copied()),
                );
            }
            writer.write_shape_and_record(&tract.shape, &record)?;
        }

        Ok(())
    }
}

/// A numeric attribute column to append to the tract table, keyed by
/// the tract join key.
#[derive(Debug, Clone)]
pub struct AttributeColumn {
    pub name: String,
    pub values: HashMap<String, f64>,
}

fn field_name(name: &str) -> TractResult<dbase::FieldName> {
    dbase::FieldName::try_from(name).map_err(|_| TractError::InvalidFieldName(name.to_string()))
}

/// Extent of a shapefile polygon across all of its rings.
fn polygon_extent(polygon: &shapefile::Polygon) -> BoundingBox {
    let mut bbox = BoundingBox::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for ring in polygon.rings() {
        for point in ring.points() {
            bbox.min_x = bbox.min_x.min(point.x);
            bbox.min_y = bbox.min_y.min(point.y);
            bbox.max_x = bbox.max_x.max(point.x);
            bbox.max_y = bbox.max_y.max(point.y);
        }
    }
    bbox
}

/// Convert a shapefile polygon to a geo multipolygon.
///
/// Outer rings become polygons; each inner ring is attached as a hole
/// of the outer ring that contains its first vertex.
fn to_multipolygon(polygon: &shapefile::Polygon) -> MultiPolygon<f64> {
    let mut outers: Vec<LineString<f64>> = Vec::new();
    let mut inners: Vec<LineString<f64>> = Vec::new();

    for ring in polygon.rings() {
        let coords: Vec<(f64, f64)> = ring.points().iter().map(|p| (p.x, p.y)).collect();
        let line = LineString::from(coords);
        match ring {
            shapefile::PolygonRing::Outer(_) => outers.push(line),
            shapefile::PolygonRing::Inner(_) => inners.push(line),
        }
    }

    let mut polygons: Vec<Polygon<f64>> = outers
        .into_iter()
        .map(|outer| Polygon::new(outer, Vec::new()))
        .collect();

    for inner in inners {
        let first = inner.points().next();
        if let Some(point) = first {
            if let Some(target) = polygons.iter_mut().find(|p| p.contains(&point)) {
                let mut interiors: Vec<LineString<f64>> = target.interiors().to_vec();
                interiors.push(inner);
                let exterior = target.exterior().clone();
                *target = Polygon::new(exterior, interiors);
            }
        }
    }

    MultiPolygon(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::write_square_tracts;

    #[test]
    fn test_load_and_zone_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracts.shp");

        write_square_tracts(
            &path,
            &[
                ("G001", BoundingBox::new(0.0, 0.0, 100.0, 100.0)),
                ("G002", BoundingBox::new(100.0, 0.0, 200.0, 100.0)),
            ],
        )
        .unwrap();

        let layer = TractLayer::from_shapefile(&path, DEFAULT_KEY_FIELD).unwrap();
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.tracts()[0].key, "G001");
        assert_eq!(layer.bbox, BoundingBox::new(0.0, 0.0, 200.0, 100.0));

        assert_eq!(layer.zone_at(50.0, 50.0), Some(0));
        assert_eq!(layer.zone_at(150.0, 50.0), Some(1));
        assert_eq!(layer.zone_at(500.0, 500.0), None);
    }

    #[test]
    fn test_write_joined_appends_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracts.shp");
        let out_path = dir.path().join("joined.shp");

        write_square_tracts(
            &path,
            &[
                ("G001", BoundingBox::new(0.0, 0.0, 100.0, 100.0)),
                ("G002", BoundingBox::new(100.0, 0.0, 200.0, 100.0)),
            ],
        )
        .unwrap();
        let layer = TractLayer::from_shapefile(&path, DEFAULT_KEY_FIELD).unwrap();

        let mut values = HashMap::new();
        values.insert("G001".to_string(), 12.5);
        let columns = vec![AttributeColumn {
            name: "MEAN".to_string(),
            values,
        }];

        layer.write_joined(&out_path, &columns).unwrap();

        let features =
            shapefile::read_as::<_, shapefile::Polygon, dbase::Record>(&out_path).unwrap();
        assert_eq!(features.len(), 2);

        let (_, record) = &features[0];
        match record.get("MEAN") {
            Some(dbase::FieldValue::Numeric(Some(v))) => assert!((v - 12.5).abs() < 1e-9),
            other => panic!("unexpected MEAN value: {:?}", other),
        }
        let (_, record) = &features[1];
        match record.get("MEAN") {
            Some(dbase::FieldValue::Numeric(None)) => {}
            other => panic!("expected null MEAN, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracts.shp");

        write_square_tracts(&path, &[("G001", BoundingBox::new(0.0, 0.0, 10.0, 10.0))]).unwrap();

        let result = TractLayer::from_shapefile(&path, "NOPE");
        assert!(matches!(result, Err(TractError::MissingKeyField { .. })));
    }
}
