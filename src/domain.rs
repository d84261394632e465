//! Rectangular latitude/longitude domains for archive queries.

use serde::{Serialize, Serializer};

/// Rectangular geographic extent of a single archive query, in degrees.
///
/// Serializes as the 4-element array `[north, west, south, east]` — the
/// coordinate ordering the archive expects. That ordering is a protocol
/// requirement and is produced in exactly one place ([`BoundingBox::to_array`]).
///
/// No wraparound handling is done at the antimeridian or the poles; the box
/// is a plain arithmetic offset from its center.
///
/// # Examples
///
/// ```
/// use era5_retrieval::BoundingBox;
///
/// let domain = BoundingBox::around(53.3267, -9.9046, 11.0);
/// assert!((domain.north - 64.3267).abs() < 1e-9);
/// assert!((domain.south - 42.3267).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Builds the box extending `half_width` degrees from `(latitude,
    /// longitude)` in each direction.
    pub fn around(latitude: f64, longitude: f64, half_width: f64) -> Self {
        Self {
            north: latitude + half_width,
            west: longitude - half_width,
            south: latitude - half_width,
            east: longitude + half_width,
        }
    }

    /// The archive's wire ordering: `[north, west, south, east]`.
    pub fn to_array(self) -> [f64; 4] {
        [self.north, self.west, self.south, self.east]
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_are_twice_the_half_width() {
        let b = BoundingBox::around(33.2924, 126.1616, 7.5);
        assert!((b.north - b.south - 15.0).abs() < 1e-9);
        assert!((b.east - b.west - 15.0).abs() < 1e-9);
    }

    #[test]
    fn box_is_centered() {
        let b = BoundingBox::around(-40.6833, 144.6894, 11.0);
        assert!(((b.north + b.south) / 2.0 - -40.6833).abs() < 1e-9);
        assert!(((b.east + b.west) / 2.0 - 144.6894).abs() < 1e-9);
    }

    #[test]
    fn mace_head_worked_example() {
        let b = BoundingBox::around(53.3267, -9.9046, 11.0);
        assert!((b.north - 64.3267).abs() < 1e-9);
        assert!((b.west - -20.9046).abs() < 1e-9);
        assert!((b.south - 42.3267).abs() < 1e-9);
        assert!((b.east - 1.0954).abs() < 1e-9);
    }

    #[test]
    fn serializes_in_protocol_order() {
        let b = BoundingBox {
            north: 1.0,
            west: 2.0,
            south: 3.0,
            east: 4.0,
        };
        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json, serde_json::json!([1.0, 2.0, 3.0, 4.0]));
    }
}
