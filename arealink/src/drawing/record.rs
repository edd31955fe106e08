//! Finalized polygon records.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::{
    compute_area, compute_bounds, compute_center, GeoBounds, GeoCenter, GeoPoint, AREA_UNIT,
    MIN_POLYGON_POINTS,
};

use super::DrawingError;

/// An area value with its unit label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaMeasurement {
    pub value: f64,
    pub unit: String,
}

/// Everything known about a finalized polygon.
///
/// Serializes to the `data` object of a `polygon_finalized` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonRecord {
    pub id: u64,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    pub points: Vec<GeoPoint>,
    pub point_count: usize,
    pub area: AreaMeasurement,
    pub bounds: GeoBounds,
    pub center: GeoCenter,
}

impl PolygonRecord {
    /// Measure `points` and build a record.
    pub fn from_points(
        id: u64,
        timestamp: DateTime<Utc>,
        points: Vec<GeoPoint>,
    ) -> Result<Self, DrawingError> {
        if points.len() < MIN_POLYGON_POINTS {
            return Err(DrawingError::TooFewPoints {
                count: points.len(),
                min: MIN_POLYGON_POINTS,
            });
        }

        // Non-empty, checked above.
        let (Some(bounds), Some(center)) = (compute_bounds(&points), compute_center(&points))
        else {
            return Err(DrawingError::TooFewPoints {
                count: points.len(),
                min: MIN_POLYGON_POINTS,
            });
        };

        Ok(Self {
            id,
            timestamp,
            point_count: points.len(),
            area: AreaMeasurement {
                value: compute_area(&points),
                unit: AREA_UNIT.to_string(),
            },
            bounds,
            center,
            points,
        })
    }

    /// Popup text shown for the polygon on the map.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PolygonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Polygon {}", self.id)?;
        writeln!(f, "Points: {}", self.point_count)?;
        write!(f, "Area: {:.2} {}", self.area.value, self.area.unit)
    }
}

/// ISO-8601 UTC timestamps with millisecond precision (`2024-05-01T12:00:00.000Z`).
pub(crate) mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Format a timestamp the way export messages carry it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn triangle() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_record_measures_points() {
        let record = PolygonRecord::from_points(1, at_noon(), triangle()).unwrap();
        assert_eq!(record.point_count, 3);
        assert!((record.area.value - 6050.0).abs() < 1e-9);
        assert_eq!(record.area.unit, "km²");
        assert_eq!(record.bounds.north, 1.0);
        assert!((record.center.longitude - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_record_requires_three_points() {
        let err = PolygonRecord::from_points(1, at_noon(), triangle()[..2].to_vec()).unwrap_err();
        assert!(matches!(err, DrawingError::TooFewPoints { count: 2, min: 3 }));
    }

    #[test]
    fn test_record_json_field_names() {
        let record = PolygonRecord::from_points(7, at_noon(), triangle()).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["timestamp"], "2024-05-01T12:00:00.000Z");
        assert_eq!(value["pointCount"], 3);
        assert_eq!(value["points"][1], json!({"latitude": 1.0, "longitude": 1.0}));
        assert_eq!(value["area"]["unit"], "km²");
        assert_eq!(
            value["bounds"],
            json!({"north": 1.0, "south": 0.0, "east": 1.0, "west": 0.0})
        );
    }

    #[test]
    fn test_timestamp_parses_back() {
        let record = PolygonRecord::from_points(2, at_noon(), triangle()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: PolygonRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.timestamp, at_noon());
        assert_eq!(format_timestamp(&back.timestamp), "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn test_summary_text() {
        let record = PolygonRecord::from_points(3, at_noon(), triangle()).unwrap();
        assert_eq!(record.summary(), "Polygon 3\nPoints: 3\nArea: 6050.00 km²");
    }
}
