//! The workspace raster naming convention.
//!
//! Every raster stored in the workspace is addressed as `<CODE><YYYY><C>`,
//! where `CODE` names the product or pollutant, `YYYY` is the four-digit
//! year, and `C` is the study-area suffix: `LndCov2010P`, `GWRPM252000H`,
//! `AllUrb2020P`. Codes are kept short; the file geodatabases this
//! convention originated in capped raster names at 13 characters.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::City;

/// A parsed workspace raster name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterName {
    /// Product or pollutant code, e.g. `LndCov` or `GWRPM25`.
    pub code: String,
    /// Four-digit year.
    pub year: u16,
    /// Study area the raster was derived for.
    pub city: City,
}

impl RasterName {
    /// Assemble a raster name from its parts.
    pub fn new(code: impl Into<String>, year: u16, city: City) -> Self {
        Self {
            code: code.into(),
            year,
            city,
        }
    }
}

impl fmt::Display for RasterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}{}", self.code, self.year, self.city.suffix())
    }
}

impl FromStr for RasterName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let suffix = chars
            .next_back()
            .ok_or_else(|| NameError::Empty)?;
        let city =
            City::from_suffix(suffix).ok_or_else(|| NameError::UnknownCitySuffix(s.to_string()))?;

        let rest = chars.as_str();
        if rest.len() < 4 {
            return Err(NameError::MissingYear(s.to_string()));
        }
        let (code, year_str) = rest.split_at(rest.len() - 4);
        if !year_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NameError::MissingYear(s.to_string()));
        }
        let year: u16 = year_str
            .parse()
            .map_err(|_| NameError::MissingYear(s.to_string()))?;

        if code.is_empty() {
            return Err(NameError::EmptyCode(s.to_string()));
        }

        Ok(RasterName {
            code: code.to_string(),
            year,
            city,
        })
    }
}

/// Violations of the raster naming convention.
#[derive(Debug, Error)]
pub enum NameError {
    #[error("Raster name is empty")]
    Empty,

    #[error("Raster name '{0}' does not end in a study-area suffix (P or H)")]
    UnknownCitySuffix(String),

    #[error("Raster name '{0}' has no four-digit year before the city suffix")]
    MissingYear(String),

    #[error("Raster name '{0}' has no code before the year")]
    EmptyCode(String),
}
