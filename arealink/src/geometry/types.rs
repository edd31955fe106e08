//! Geographic value types shared by the geometry helpers and the export messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// No range validation is applied; values are taken exactly as the map
/// widget reported them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Planar distance to another point, in degrees.
    ///
    /// Only meaningful for hit-testing at very small separations.
    pub fn degree_distance(&self, other: &GeoPoint) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Axis-aligned extrema of a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Maximum latitude
    pub north: f64,
    /// Minimum latitude
    pub south: f64,
    /// Maximum longitude
    pub east: f64,
    /// Minimum longitude
    pub west: f64,
}

impl GeoBounds {
    /// Create a bounding box from a single point.
    pub fn from_point(point: &GeoPoint) -> Self {
        Self {
            north: point.latitude,
            south: point.latitude,
            east: point.longitude,
            west: point.longitude,
        }
    }

    /// Expand this bounding box to include a point.
    pub fn expand(&mut self, point: &GeoPoint) {
        self.north = self.north.max(point.latitude);
        self.south = self.south.min(point.latitude);
        self.east = self.east.max(point.longitude);
        self.west = self.west.min(point.longitude);
    }

    /// Check whether a point lies inside (or on the edge of) the bounds.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

/// Unweighted mean position of a set of points.
///
/// This is a vertex average, not an area centroid; it drifts toward
/// densely sampled edges of non-convex shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCenter {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoCenter> for GeoPoint {
    fn from(center: GeoCenter) -> Self {
        GeoPoint::new(center.latitude, center.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_expand() {
        let mut bounds = GeoBounds::from_point(&GeoPoint::new(53.5, 9.7));
        bounds.expand(&GeoPoint::new(54.0, 10.5));

        assert_eq!(bounds.north, 54.0);
        assert_eq!(bounds.south, 53.5);
        assert_eq!(bounds.east, 10.5);
        assert_eq!(bounds.west, 9.7);
        assert!(bounds.contains(&GeoPoint::new(53.8, 10.0)));
        assert!(!bounds.contains(&GeoPoint::new(55.0, 10.0)));
    }

    #[test]
    fn test_point_serializes_with_full_field_names() {
        let json = serde_json::to_value(GeoPoint::new(39.95, 32.68)).unwrap();
        assert_eq!(json["latitude"], 39.95);
        assert_eq!(json["longitude"], 32.68);
    }

    #[test]
    fn test_degree_distance() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(3.0, 4.0);
        assert!((a.degree_distance(&b) - 5.0).abs() < 1e-12);
    }
}
