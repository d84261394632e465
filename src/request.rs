//! Builds the full parameter set of a single archive query.

use crate::domain::BoundingBox;
use crate::types::level::RetrievalLevel;
use serde::Serialize;

/// The complete parameter set of one CDS retrieval request.
///
/// Serializes directly into the JSON body submitted to the archive. Every
/// field is fully determined by the constructor inputs; building the same
/// request twice yields an equal value.
///
/// The `day` and `time` enumerations are always the full 31 days and 24
/// hours regardless of the target month — the archive silently discards
/// invalid combinations (day 31 in February), and that tolerance is relied
/// upon rather than validated here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Era5Request {
    pub product_type: &'static str,
    pub format: &'static str,
    pub year: String,
    pub month: String,
    pub day: Vec<String>,
    pub time: Vec<String>,
    pub area: BoundingBox,
    pub variable: &'static [&'static str],
    /// Present only for pressure-level retrievals; omitted from the JSON
    /// entirely for single-level ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_level: Option<&'static [&'static str]>,
}

impl Era5Request {
    pub fn new(level: RetrievalLevel, year: i32, month: u32, area: BoundingBox) -> Self {
        Self {
            product_type: "reanalysis",
            format: "netcdf",
            year: year.to_string(),
            month: format!("{month:02}"),
            day: (1..=31).map(|d| format!("{d:02}")).collect(),
            time: (0..24).map(|t| format!("{t:02}:00")).collect(),
            area,
            variable: level.variables(),
            pressure_level: level.pressure_levels(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> BoundingBox {
        BoundingBox::around(53.3267, -9.9046, 11.0)
    }

    #[test]
    fn building_twice_is_identical() {
        let a = Era5Request::new(RetrievalLevel::Pressure, 2020, 6, area());
        let b = Era5Request::new(RetrievalLevel::Pressure, 2020, 6, area());
        assert_eq!(a, b);
    }

    #[test]
    fn pressure_request_fields() {
        let request = Era5Request::new(RetrievalLevel::Pressure, 2020, 6, area());
        assert_eq!(request.product_type, "reanalysis");
        assert_eq!(request.format, "netcdf");
        assert_eq!(request.year, "2020");
        assert_eq!(request.month, "06");
        assert_eq!(
            request.variable,
            ["u_component_of_wind", "v_component_of_wind"]
        );
        assert_eq!(request.pressure_level, Some(["500", "850"].as_slice()));
    }

    #[test]
    fn single_request_has_no_pressure_levels() {
        let request = Era5Request::new(RetrievalLevel::Single, 2020, 6, area());
        assert_eq!(
            request.variable,
            [
                "10m_u_component_of_wind",
                "10m_v_component_of_wind",
                "surface_pressure",
                "boundary_layer_height",
            ]
        );
        assert_eq!(request.pressure_level, None);

        // The field must be absent from the wire form, not null.
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("pressure_level").is_none());
    }

    #[test]
    fn enumerates_all_days_and_hours() {
        let request = Era5Request::new(RetrievalLevel::Pressure, 2020, 2, area());
        assert_eq!(request.day.len(), 31);
        assert_eq!(request.day.first().map(String::as_str), Some("01"));
        assert_eq!(request.day.last().map(String::as_str), Some("31"));
        assert_eq!(request.time.len(), 24);
        assert_eq!(request.time.first().map(String::as_str), Some("00:00"));
        assert_eq!(request.time.last().map(String::as_str), Some("23:00"));
    }

    #[test]
    fn month_is_zero_padded() {
        let request = Era5Request::new(RetrievalLevel::Single, 1978, 3, area());
        assert_eq!(request.month, "03");
    }

    #[test]
    fn area_serializes_inside_the_body() {
        let request = Era5Request::new(RetrievalLevel::Pressure, 2020, 6, area());
        let json = serde_json::to_value(&request).unwrap();
        let area = json["area"].as_array().unwrap();
        assert_eq!(area.len(), 4);
        assert!((area[0].as_f64().unwrap() - 64.3267).abs() < 1e-9);
        assert!((area[1].as_f64().unwrap() - -20.9046).abs() < 1e-9);
        assert!((area[2].as_f64().unwrap() - 42.3267).abs() < 1e-9);
        assert!((area[3].as_f64().unwrap() - 1.0954).abs() < 1e-9);
    }
}
