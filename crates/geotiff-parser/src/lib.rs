//! GeoTIFF reader for land-cover rasters.
//!
//! Reads single-band GeoTIFFs (annual NLCD land-cover and fractional
//! impervious products) together with the georeferencing tags that
//! place them on the ground. Decoding is done by the `tiff` crate; this
//! crate interprets the pixel-scale/tiepoint tags and the GDAL nodata
//! convention, and hands back an in-memory [`RasterGrid`].
//!
//! The NLCD products ship already projected to Conus Albers; the caller
//! states the spatial reference it expects, and the grid is stamped
//! with it.

pub mod error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use aq_common::{BoundingBox, RasterGrid, SpatialRef};

pub use error::{GeoTiffError, GeoTiffResult};

/// Read a single-band GeoTIFF into a raster grid.
///
/// Cells equal to the file's GDAL nodata value (when present) become
/// NaN; the nodata value itself is preserved on the returned grid.
pub fn read_geotiff<P: AsRef<Path>>(path: P, spatial_ref: SpatialRef) -> GeoTiffResult<RasterGrid> {
    let file = File::open(path.as_ref())?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let (width, height) = decoder.dimensions()?;
    let width = width as usize;
    let height = height as usize;

    let bbox = read_extent(&mut decoder, width, height)?;
    let nodata = read_gdal_nodata(&mut decoder);

    let mut data = decode_samples(&mut decoder)?;
    if data.len() != width * height {
        return Err(GeoTiffError::Truncated {
            expected: width * height,
            actual: data.len(),
        });
    }

    if let Some(nd) = nodata {
        for v in &mut data {
            if *v == nd {
                *v = f32::NAN;
            }
        }
    }

    Ok(RasterGrid::new(data, width, height, bbox, spatial_ref, nodata))
}

/// Compute the cell-edge extent from the pixel scale and tiepoint tags.
fn read_extent<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    width: usize,
    height: usize,
) -> GeoTiffResult<BoundingBox> {
    let scale = decoder
        .get_tag_f64_vec(Tag::ModelPixelScaleTag)
        .map_err(|_| GeoTiffError::MissingGeoreference("ModelPixelScale tag".to_string()))?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::ModelTiepointTag)
        .map_err(|_| GeoTiffError::MissingGeoreference("ModelTiepoint tag".to_string()))?;

    if scale.len() < 2 {
        return Err(GeoTiffError::MissingGeoreference(format!(
            "ModelPixelScale has {} values, need 2",
            scale.len()
        )));
    }
    if tiepoint.len() < 6 {
        return Err(GeoTiffError::MissingGeoreference(format!(
            "ModelTiepoint has {} values, need 6",
            tiepoint.len()
        )));
    }

    let (sx, sy) = (scale[0], scale[1]);
    // Tiepoint maps raster position (i, j) to ground position (x, y);
    // the NLCD products anchor the top-left corner.
    let origin_x = tiepoint[3] - tiepoint[0] * sx;
    let origin_y = tiepoint[4] + tiepoint[1] * sy;

    Ok(BoundingBox::new(
        origin_x,
        origin_y - height as f64 * sy,
        origin_x + width as f64 * sx,
        origin_y,
    ))
}

/// Read the GDAL nodata tag, if the file carries one.
fn read_gdal_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
    decoder
        .get_tag_ascii_string(Tag::GdalNodata)
        .ok()
        .and_then(|s| s.trim().trim_end_matches('\0').parse::<f32>().ok())
}

/// Decode the image into f32 samples regardless of the on-disk type.
fn decode_samples<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> GeoTiffResult<Vec<f32>> {
    let image = decoder.read_image()?;

    let data = match image {
        DecodingResult::U8(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(buf) => buf,
        DecodingResult::F64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        other => return Err(GeoTiffError::UnsupportedFormat(sample_kind(&other).to_string())),
    };

    Ok(data)
}

fn sample_kind(result: &DecodingResult) -> &'static str {
    match result {
        DecodingResult::U8(_) => "u8",
        DecodingResult::U16(_) => "u16",
        DecodingResult::U32(_) => "u32",
        DecodingResult::U64(_) => "u64",
        DecodingResult::I8(_) => "i8",
        DecodingResult::I16(_) => "i16",
        DecodingResult::I32(_) => "i32",
        DecodingResult::I64(_) => "i64",
        DecodingResult::F32(_) => "f32",
        DecodingResult::F64(_) => "f64",
        #[allow(unreachable_patterns)]
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::write_landcover_tiff;

    #[test]
    fn test_read_written_landcover() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landcover.tif");

        let bbox = BoundingBox::new(-1_500_000.0, 1_200_000.0, -1_499_880.0, 1_200_090.0);
        let values: Vec<u8> = vec![
            11, 21, 22, 23, //
            24, 31, 42, 52, //
            95, 11, 21, 24,
        ];
        write_landcover_tiff(&path, &values, 4, 3, &bbox).unwrap();

        let grid = read_geotiff(&path, SpatialRef::ConusAlbers).unwrap();
        assert_eq!(grid.width, 4);
        assert_eq!(grid.height, 3);
        assert_eq!(grid.spatial_ref, SpatialRef::ConusAlbers);
        assert_eq!(grid.get(0, 0), Some(11.0));
        assert_eq!(grid.get(3, 2), Some(24.0));

        assert!((grid.bbox.min_x - bbox.min_x).abs() < 1e-6);
        assert!((grid.bbox.max_y - bbox.max_y).abs() < 1e-6);
        let (rx, ry) = grid.resolution();
        assert!((rx - 30.0).abs() < 1e-6);
        assert!((ry - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file() {
        let result = read_geotiff("/nonexistent/nowhere.tif", SpatialRef::ConusAlbers);
        assert!(result.is_err());
    }
}
