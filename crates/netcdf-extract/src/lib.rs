//! Pollutant grid extraction from NetCDF files.
//!
//! The surface PM2.5 products are NetCDF files carrying one gridded
//! variable per pollutant (`GWRPM25`, `GWRDUST`, ...) on a regular
//! geographic lat/lon grid. This crate opens a file with the `netcdf`
//! crate, windows the named variable to a study-area template bounding
//! box, applies the CF scale/offset/fill conventions, and returns a
//! north-up [`RasterGrid`] in geographic coordinates.

pub mod error;

use std::path::Path;

use aq_common::{BoundingBox, RasterGrid, SpatialRef};

pub use error::{ExtractError, ExtractResult};

/// A variable extracted from a NetCDF file.
#[derive(Debug)]
pub struct ExtractedGrid {
    /// The windowed grid, geographic coordinates, north up.
    pub grid: RasterGrid,
    /// The variable the grid came from.
    pub variable: String,
    /// Physical units, when the file declares them.
    pub units: Option<String>,
}

/// Candidate names for the coordinate variables, checked in order.
const LAT_NAMES: [&str; 3] = ["lat", "latitude", "LAT"];
const LON_NAMES: [&str; 3] = ["lon", "longitude", "LON"];

/// Extract a named variable windowed to a geographic template.
pub fn extract_variable<P: AsRef<Path>>(
    path: P,
    variable: &str,
    template: &BoundingBox,
) -> ExtractResult<ExtractedGrid> {
    let file = netcdf::open(path.as_ref())?;

    let var = file.variable(variable).ok_or_else(|| {
        let available: Vec<String> = file.variables().map(|v| v.name().to_string()).collect();
        ExtractError::MissingVariable {
            name: variable.to_string(),
            available: available.join(", "),
        }
    })?;

    let lat_name = find_coord(&file, &LAT_NAMES)
        .ok_or_else(|| ExtractError::MissingCoordinates("no latitude variable".to_string()))?;
    let lon_name = find_coord(&file, &LON_NAMES)
        .ok_or_else(|| ExtractError::MissingCoordinates("no longitude variable".to_string()))?;

    let dims = var.dimensions();
    if dims.len() != 2 || dims[0].name() != lat_name || dims[1].name() != lon_name {
        let layout: Vec<String> = dims.iter().map(|d| d.name().to_string()).collect();
        return Err(ExtractError::InvalidLayout(format!(
            "variable '{}' has dimensions ({}), expected ({}, {})",
            variable,
            layout.join(", "),
            lat_name,
            lon_name
        )));
    }

    let lats: Vec<f64> = file
        .variable(&lat_name)
        .ok_or_else(|| ExtractError::MissingCoordinates(lat_name.clone()))?
        .get_values(..)?;
    let lons: Vec<f64> = file
        .variable(&lon_name)
        .ok_or_else(|| ExtractError::MissingCoordinates(lon_name.clone()))?
        .get_values(..)?;

    if lats.len() < 2 || lons.len() < 2 {
        return Err(ExtractError::InvalidLayout(
            "coordinate axes need at least two points".to_string(),
        ));
    }

    let (lat_lo, lat_hi) = index_window(&lats, template.min_y, template.max_y)
        .ok_or_else(|| ExtractError::NoOverlap(format!("{:?}", template)))?;
    let (lon_lo, lon_hi) = index_window(&lons, template.min_x, template.max_x)
        .ok_or_else(|| ExtractError::NoOverlap(format!("{:?}", template)))?;

    let height = lat_hi - lat_lo + 1;
    let width = lon_hi - lon_lo + 1;

    let mut data: Vec<f32> = var.get_values((lat_lo..lat_hi + 1, lon_lo..lon_hi + 1))?;

    // CF packing: value * scale_factor + add_offset, fill becomes NaN
    let scale = get_f32_attr(&var, "scale_factor").unwrap_or(1.0);
    let offset = get_f32_attr(&var, "add_offset").unwrap_or(0.0);
    let fill = get_f32_attr(&var, "_FillValue");

    for v in &mut data {
        if fill.map(|f| *v == f).unwrap_or(false) {
            *v = f32::NAN;
        } else {
            *v = *v * scale + offset;
        }
    }

    // Row 0 must be the northernmost row; flip grids stored south-up.
    if lats[lat_lo] < lats[lat_hi] {
        flip_rows(&mut data, width, height);
    }

    let bbox = window_bbox(&lats, &lons, lat_lo, lat_hi, lon_lo, lon_hi);
    let units = get_string_attr(&var, "units");

    Ok(ExtractedGrid {
        grid: RasterGrid::new(data, width, height, bbox, SpatialRef::Geographic, None),
        variable: variable.to_string(),
        units,
    })
}

/// First coordinate variable present in the file from a candidate list.
fn find_coord(file: &netcdf::File, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|name| file.variable(name).is_some())
        .map(|name| name.to_string())
}

/// Inclusive index range of coordinate centers falling inside [min, max].
///
/// Works for ascending and descending axes; returns None when no center
/// is selected.
fn index_window(centers: &[f64], min: f64, max: f64) -> Option<(usize, usize)> {
    let mut lo = None;
    let mut hi = None;
    for (i, &c) in centers.iter().enumerate() {
        if c >= min && c <= max {
            if lo.is_none() {
                lo = Some(i);
            }
            hi = Some(i);
        }
    }
    Some((lo?, hi?))
}

/// Cell-edge bounds of the selected window.
///
/// Coordinate arrays hold cell centers; the extent extends half a step
/// beyond the outermost selected centers.
fn window_bbox(
    lats: &[f64],
    lons: &[f64],
    lat_lo: usize,
    lat_hi: usize,
    lon_lo: usize,
    lon_hi: usize,
) -> BoundingBox {
    let dlat = (lats[1] - lats[0]).abs();
    let dlon = (lons[1] - lons[0]).abs();

    let lat_min = lats[lat_lo].min(lats[lat_hi]) - dlat / 2.0;
    let lat_max = lats[lat_lo].max(lats[lat_hi]) + dlat / 2.0;
    let lon_min = lons[lon_lo].min(lons[lon_hi]) - dlon / 2.0;
    let lon_max = lons[lon_lo].max(lons[lon_hi]) + dlon / 2.0;

    BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
}

/// Reverse row order in place.
fn flip_rows(data: &mut [f32], width: usize, height: usize) {
    for row in 0..height / 2 {
        let (top, bottom) = (row, height - 1 - row);
        for col in 0..width {
            data.swap(top * width + col, bottom * width + col);
        }
    }
}

/// Check if a variable has an attribute with the given name.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

// Helper to get an f32 attribute using TryInto
fn get_f32_attr(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f32::try_from(attr_value).ok()
}

// Helper to get a string attribute
fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
