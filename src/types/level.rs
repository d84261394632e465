//! Defines the two ERA5 retrieval levels and the static protocol tables
//! (dataset identifiers, variable lists, output layout) attached to them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of ERA5 data a retrieval targets.
///
/// Each variant fixes the archive dataset, the variable list, the output
/// subdirectory and the filename tag. Parsing from the configuration wire
/// form is done through [`FromStr`], so an unrecognized tag is rejected
/// before any retrieval is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetrievalLevel {
    /// Wind components on constant-pressure surfaces (500 and 850 hPa).
    Pressure,
    /// Near-surface fields: 10m wind, surface pressure, boundary layer height.
    Single,
}

impl RetrievalLevel {
    /// Identifier of the CDS dataset this level is retrieved from.
    pub fn dataset(&self) -> &'static str {
        match self {
            RetrievalLevel::Pressure => "reanalysis-era5-pressure-levels",
            RetrievalLevel::Single => "reanalysis-era5-single-levels",
        }
    }

    /// Per-site output subdirectory for this level.
    pub fn subdir(&self) -> &'static str {
        match self {
            RetrievalLevel::Pressure => "pressure_levels",
            RetrievalLevel::Single => "single_level",
        }
    }

    /// Tag embedded in output filenames.
    pub fn file_tag(&self) -> &'static str {
        match self {
            RetrievalLevel::Pressure => "3dwind",
            RetrievalLevel::Single => "2dmet",
        }
    }

    /// ERA5 variable names requested for this level.
    pub fn variables(&self) -> &'static [&'static str] {
        match self {
            RetrievalLevel::Pressure => &["u_component_of_wind", "v_component_of_wind"],
            RetrievalLevel::Single => &[
                "10m_u_component_of_wind",
                "10m_v_component_of_wind",
                "surface_pressure",
                "boundary_layer_height",
            ],
        }
    }

    /// Pressure levels (hPa, as the archive's string form) for this level.
    /// `None` for single-level retrievals, which carry no such field.
    pub fn pressure_levels(&self) -> Option<&'static [&'static str]> {
        match self {
            RetrievalLevel::Pressure => Some(&["500", "850"]),
            RetrievalLevel::Single => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            RetrievalLevel::Pressure => "pressure",
            RetrievalLevel::Single => "single",
        }
    }
}

/// Error returned when a level tag is not one of the two recognized values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid level '{0}', must be 'pressure' or 'single'")]
pub struct InvalidLevel(pub String);

impl FromStr for RetrievalLevel {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pressure" => Ok(RetrievalLevel::Pressure),
            "single" => Ok(RetrievalLevel::Single),
            other => Err(InvalidLevel(other.to_string())),
        }
    }
}

/// Formats a level using its configuration tag.
///
/// # Examples
///
/// ```
/// use era5_retrieval::RetrievalLevel;
///
/// assert_eq!(RetrievalLevel::Pressure.to_string(), "pressure");
/// assert_eq!(format!("{}", RetrievalLevel::Single), "single");
/// ```
impl fmt::Display for RetrievalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl Serialize for RetrievalLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for RetrievalLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}
