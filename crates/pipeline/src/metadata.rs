//! Input-filename parsing for the pipeline stages.
//!
//! The input products encode everything the stages need in their file
//! names: the land-cover files carry a product token and a year, the
//! pollutant files a variable marker and a day-of-year range. Parsing
//! is structural; a name that does not carry the expected pieces is an
//! error, never a silently wrong output name.

use std::path::Path;

use crate::error::PipelineError;

/// Detected input file type based on extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// GeoTIFF raster (land cover, imperviousness)
    GeoTiff,
    /// NetCDF pollutant grid
    NetCdf,
    /// Anything else; skipped by every stage
    Unknown,
}

/// Detect the file kind from an extension.
pub fn detect_file_kind(path: &Path) -> FileKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("tif") | Some("tiff") => FileKind::GeoTiff,
        Some("nc") | Some("nc4") | Some("netcdf") => FileKind::NetCdf,
        _ => FileKind::Unknown,
    }
}

/// Annual land-cover product families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandCoverProduct {
    /// Land-cover classes
    LandCover,
    /// Fractional impervious surface
    FractionalImpervious,
}

impl LandCoverProduct {
    /// The code this product contributes to workspace raster names.
    pub fn code(&self) -> &'static str {
        match self {
            LandCoverProduct::LandCover => "LndCov",
            LandCoverProduct::FractionalImpervious => "FctImp",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "LndCov" => Some(LandCoverProduct::LandCover),
            "FctImp" => Some(LandCoverProduct::FractionalImpervious),
            _ => None,
        }
    }
}

/// Information parsed from a land-cover filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandCoverFileInfo {
    pub product: LandCoverProduct,
    pub year: u16,
}

/// Parse a land-cover filename.
///
/// The annual products are named like
/// `Annual_NLCD_LndCov_2010_CU_C1V1.tif`: underscore-separated tokens
/// with one product token and one four-digit year.
pub fn parse_landcover_filename(file_name: &str) -> Result<LandCoverFileInfo, PipelineError> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let mut product = None;
    let mut year = None;

    for token in stem.split('_') {
        if product.is_none() {
            product = LandCoverProduct::from_token(token);
        }
        if year.is_none() && token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = token.parse::<u16>() {
                if (1980..=2100).contains(&value) {
                    year = Some(value);
                }
            }
        }
    }

    match (product, year) {
        (Some(product), Some(year)) => Ok(LandCoverFileInfo { product, year }),
        (None, _) => Err(PipelineError::UnrecognizedFilename {
            file: file_name.to_string(),
            reason: "no land-cover product token (LndCov or FctImp)".to_string(),
        }),
        (_, None) => Err(PipelineError::UnrecognizedFilename {
            file: file_name.to_string(),
            reason: "no four-digit year token".to_string(),
        }),
    }
}

/// The eight pollutant components the ingestion stage handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollutantVariable {
    Dust,
    BlackCarbon,
    Ammonium,
    Nitrate,
    OrganicMatter,
    Sulfate,
    SeaSalt,
    Pm25,
}

impl PollutantVariable {
    /// Every component, components before the total so that a name
    /// carrying both a component marker and the PM25 product prefix
    /// resolves to the component.
    pub const ALL: [PollutantVariable; 8] = [
        PollutantVariable::Dust,
        PollutantVariable::BlackCarbon,
        PollutantVariable::Ammonium,
        PollutantVariable::Nitrate,
        PollutantVariable::OrganicMatter,
        PollutantVariable::Sulfate,
        PollutantVariable::SeaSalt,
        PollutantVariable::Pm25,
    ];

    /// Filename marker identifying this component.
    pub fn marker(&self) -> &'static str {
        match self {
            PollutantVariable::Dust => "DUST-DUST",
            PollutantVariable::BlackCarbon => "BC-BC",
            PollutantVariable::Ammonium => "NH4-NH4",
            PollutantVariable::Nitrate => "NO3-NO3",
            PollutantVariable::OrganicMatter => "OM-OM",
            PollutantVariable::Sulfate => "SO4-SO4",
            PollutantVariable::SeaSalt => "SS-SS",
            PollutantVariable::Pm25 => "PM25",
        }
    }

    /// NetCDF variable name, also the workspace raster code.
    pub fn variable_name(&self) -> &'static str {
        match self {
            PollutantVariable::Dust => "GWRDUST",
            PollutantVariable::BlackCarbon => "GWRBC",
            PollutantVariable::Ammonium => "GWRNH4",
            PollutantVariable::Nitrate => "GWRNO3",
            PollutantVariable::OrganicMatter => "GWROM",
            PollutantVariable::Sulfate => "GWRSO4",
            PollutantVariable::SeaSalt => "GWRSS",
            PollutantVariable::Pm25 => "GWRPM25",
        }
    }
}

/// Information parsed from a pollutant filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollutantFileInfo {
    pub variable: PollutantVariable,
    pub year: u16,
}

/// Parse a pollutant filename.
///
/// The annual surfaces carry a component marker (`DUST-DUST`, `BC-BC`,
/// ..., or the `PM25` product prefix for the total) and a day-of-year
/// range `YYYY001-YYYY364` (365/366 accepted for the end day).
pub fn parse_pollutant_filename(file_name: &str) -> Result<PollutantFileInfo, PipelineError> {
    let variable = PollutantVariable::ALL
        .iter()
        .copied()
        .find(|v| file_name.contains(v.marker()))
        .ok_or_else(|| PipelineError::UnrecognizedFilename {
            file: file_name.to_string(),
            reason: "no pollutant variable marker".to_string(),
        })?;

    let year = find_year_range(file_name).ok_or_else(|| PipelineError::UnrecognizedFilename {
        file: file_name.to_string(),
        reason: "no YYYY001-YYYY364 day range".to_string(),
    })?;

    Ok(PollutantFileInfo { variable, year })
}

/// Locate a `YYYY001-YYYYddd` annual day range and return its year.
///
/// Both years must match; the end day must be a full year (364-366).
fn find_year_range(name: &str) -> Option<u16> {
    let bytes = name.as_bytes();
    if bytes.len() < 15 {
        return None;
    }

    for start in 0..=bytes.len() - 15 {
        let window = &bytes[start..start + 15];
        if window[7] != b'-' {
            continue;
        }
        if !window[..7].iter().all(|b| b.is_ascii_digit())
            || !window[8..].iter().all(|b| b.is_ascii_digit())
        {
            continue;
        }
        if window[..4] != window[8..12] || &window[4..7] != b"001" {
            continue;
        }

        let end_day: u16 = std::str::from_utf8(&window[12..15]).ok()?.parse().ok()?;
        if !(364..=366).contains(&end_day) {
            continue;
        }

        return std::str::from_utf8(&window[..4]).ok()?.parse().ok();
    }

    None
}
