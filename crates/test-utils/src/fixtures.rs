//! On-disk fixtures: small GeoTIFFs, pollutant NetCDF files, and
//! square tract shapefiles for exercising the pipeline end to end.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use shapefile::dbase;
use shapefile::{Point, PolygonRing};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

use aq_common::BoundingBox;

/// Write a single-band 8-bit GeoTIFF with pixel-scale/tiepoint
/// georeferencing anchored at the top-left corner of `bbox`.
pub fn write_landcover_tiff(
    path: &Path,
    values: &[u8],
    width: usize,
    height: usize,
    bbox: &BoundingBox,
) -> Result<(), Box<dyn Error>> {
    assert_eq!(values.len(), width * height, "values must fill the grid");

    let sx = bbox.width() / width as f64;
    let sy = bbox.height() / height as f64;

    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(file)?;
    let mut image = encoder.new_image::<colortype::Gray8>(width as u32, height as u32)?;
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &[sx, sy, 0.0][..])?;
    image.encoder().write_tag(
        Tag::ModelTiepointTag,
        &[0.0, 0.0, 0.0, bbox.min_x, bbox.max_y, 0.0][..],
    )?;
    image.write_data(values)?;

    Ok(())
}

/// Write a pollutant NetCDF file: `lat`/`lon` coordinate variables and
/// one f32 data variable over (lat, lon), row 0 at `lats[0]`.
pub fn write_pollutant_netcdf(
    path: &Path,
    variable: &str,
    lats: &[f64],
    lons: &[f64],
    data: &[f32],
) -> Result<(), Box<dyn Error>> {
    assert_eq!(data.len(), lats.len() * lons.len(), "data must fill the grid");

    let mut file = netcdf::create(path)?;
    file.add_dimension("lat", lats.len())?;
    file.add_dimension("lon", lons.len())?;

    let mut lat_var = file.add_variable::<f64>("lat", &["lat"])?;
    lat_var.put_values(lats, ..)?;

    let mut lon_var = file.add_variable::<f64>("lon", &["lon"])?;
    lon_var.put_values(lons, ..)?;

    let mut var = file.add_variable::<f32>(variable, &["lat", "lon"])?;
    var.put_values(data, ..)?;

    Ok(())
}

/// Write a tract shapefile of axis-aligned squares keyed by GISJOIN.
pub fn write_square_tracts(
    path: &Path,
    tracts: &[(&str, BoundingBox)],
) -> Result<(), Box<dyn Error>> {
    let builder = dbase::TableWriterBuilder::new().add_character_field(
        dbase::FieldName::try_from("GISJOIN").map_err(|_| "invalid field name")?,
        60,
    );

    let mut writer = shapefile::Writer::from_path(path, builder)?;
    for (key, bbox) in tracts {
        let ring = PolygonRing::Outer(vec![
            Point::new(bbox.min_x, bbox.min_y),
            Point::new(bbox.min_x, bbox.max_y),
            Point::new(bbox.max_x, bbox.max_y),
            Point::new(bbox.max_x, bbox.min_y),
            Point::new(bbox.min_x, bbox.min_y),
        ]);
        let polygon = shapefile::Polygon::new(ring);

        let mut record = dbase::Record::default();
        record.insert(
            "GISJOIN".to_string(),
            dbase::FieldValue::Character(Some(key.to_string())),
        );
        writer.write_shape_and_record(&polygon, &record)?;
    }

    Ok(())
}
