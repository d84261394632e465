//! Defines the metadata record for a single atmospheric monitoring site.

use crate::domain::BoundingBox;
use serde::{Deserialize, Serialize};

/// A single atmospheric monitoring site.
///
/// Sites are identified by their short code (e.g. `"MHD"` for Mace Head) and
/// carry the coordinates every retrieval for that site is centered on. They
/// are loaded once from the [`crate::SiteRegistry`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Short site code, the identity of the site (e.g. "MHD").
    pub code: String,
    /// Human-readable site name (e.g. "Mace Head, Ireland").
    pub name: String,
    /// Latitude in decimal degrees (positive north).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive east).
    pub longitude: f64,
}

impl Site {
    pub fn new(code: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
        }
    }

    /// The retrieval domain around this site, extending `half_width` degrees
    /// from its coordinates in each direction.
    pub fn domain(&self, half_width: f64) -> BoundingBox {
        BoundingBox::around(self.latitude, self.longitude, half_width)
    }
}
