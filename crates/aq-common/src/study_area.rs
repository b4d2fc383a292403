//! The metropolitan study areas.

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// A study-area city, encoded as the trailing suffix of workspace
/// raster names (`LndCov2010P`, `GWRPM252000H`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Phoenix,
    Houston,
}

impl City {
    /// Both study areas, in the order the stages process them.
    pub fn all() -> [City; 2] {
        [City::Phoenix, City::Houston]
    }

    /// The raster-name suffix for this city.
    pub fn suffix(&self) -> char {
        match self {
            City::Phoenix => 'P',
            City::Houston => 'H',
        }
    }

    /// Look up a city from a raster-name suffix.
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            'P' => Some(City::Phoenix),
            'H' => Some(City::Houston),
            _ => None,
        }
    }

    /// Geographic bounding template used to window pollutant grids to
    /// this study area (NAD83 degrees).
    pub fn template(&self) -> BoundingBox {
        match self {
            City::Phoenix => BoundingBox::new(
                -113.711879688006,
                32.1177127547459,
                -109.752359460592,
                34.6779907189008,
            ),
            City::Houston => BoundingBox::new(
                -96.6285637465374,
                28.8141226584743,
                -94.3267085217256,
                30.9092401063962,
            ),
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            City::Phoenix => write!(f, "Phoenix"),
            City::Houston => write!(f, "Houston"),
        }
    }
}
