//! Polygon measurement helpers.
//!
//! Area, bounding box and vertex-average centre for an ordered ring of
//! latitude/longitude points. The ring is implicitly closed: the last point
//! connects back to the first.
//!
//! # Area approximation
//!
//! [`compute_area`] runs the shoelace formula directly on degree coordinates
//! and multiplies the result by [`AREA_SCALE_KM2`]. This is a flat-earth,
//! small-area estimate with no latitude correction. Use
//! [`compute_area_scaled`] to supply a different factor.
//!
//! # Example
//!
//! ```
//! use arealink::geometry::{compute_bounds, compute_center, GeoPoint};
//!
//! let ring = [
//!     GeoPoint::new(0.0, 0.0),
//!     GeoPoint::new(1.0, 1.0),
//!     GeoPoint::new(0.0, 1.0),
//! ];
//! let bounds = compute_bounds(&ring).unwrap();
//! assert_eq!(bounds.north, 1.0);
//! let center = compute_center(&ring).unwrap();
//! assert!((center.longitude - 2.0 / 3.0).abs() < 1e-12);
//! ```

mod types;

pub use types::{GeoBounds, GeoCenter, GeoPoint};

/// Squared-degree to square-kilometre factor used by [`compute_area`].
///
/// Empirical (roughly 110 km per degree, squared). Not a physical constant.
pub const AREA_SCALE_KM2: f64 = 12100.0;

/// Unit label attached to areas produced with [`AREA_SCALE_KM2`].
pub const AREA_UNIT: &str = "km²";

/// Minimum number of vertices for a ring to enclose an area.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Approximate polygon area in square kilometres.
///
/// Returns `0.0` for fewer than three points.
#[inline]
pub fn compute_area(points: &[GeoPoint]) -> f64 {
    compute_area_scaled(points, AREA_SCALE_KM2)
}

/// Shoelace area in squared degrees multiplied by `scale`.
///
/// The absolute value is taken, so the result does not depend on winding
/// direction.
pub fn compute_area_scaled(points: &[GeoPoint], scale: f64) -> f64 {
    if points.len() < MIN_POLYGON_POINTS {
        return 0.0;
    }

    let twice_area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.latitude * b.longitude - b.latitude * a.longitude)
        .sum();

    twice_area.abs() / 2.0 * scale
}

/// Bounding box of the points, or `None` for an empty slice.
pub fn compute_bounds(points: &[GeoPoint]) -> Option<GeoBounds> {
    let (first, rest) = points.split_first()?;
    let mut bounds = GeoBounds::from_point(first);
    for point in rest {
        bounds.expand(point);
    }
    Some(bounds)
}

/// Mean latitude and longitude, or `None` for an empty slice.
pub fn compute_center(points: &[GeoPoint]) -> Option<GeoCenter> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (sum_lat, sum_lon) = points.iter().fold((0.0, 0.0), |(lat, lon), p| {
        (lat + p.latitude, lon + p.longitude)
    });

    Some(GeoCenter {
        latitude: sum_lat / n,
        longitude: sum_lon / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_area_of_unit_square() {
        let square = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 0.0),
        ];
        assert!((compute_area(&square) - AREA_SCALE_KM2).abs() < 1e-9);
    }

    #[test]
    fn test_area_of_triangle() {
        assert!((compute_area(&triangle()) - 0.5 * AREA_SCALE_KM2).abs() < 1e-9);
    }

    #[test]
    fn test_area_degenerate_inputs_are_zero() {
        assert_eq!(compute_area(&[]), 0.0);
        assert_eq!(compute_area(&[GeoPoint::new(1.0, 2.0)]), 0.0);
        assert_eq!(
            compute_area(&[GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]),
            0.0
        );
    }

    #[test]
    fn test_area_collinear_points_is_zero() {
        let line = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(2.0, 2.0),
        ];
        assert_eq!(compute_area(&line), 0.0);
    }

    #[test]
    fn test_area_scaled_uses_given_factor() {
        assert!((compute_area_scaled(&triangle(), 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_of_triangle() {
        let bounds = compute_bounds(&triangle()).unwrap();
        assert_eq!(
            bounds,
            GeoBounds {
                north: 1.0,
                south: 0.0,
                east: 1.0,
                west: 0.0,
            }
        );
    }

    #[test]
    fn test_center_of_triangle() {
        let center = compute_center(&triangle()).unwrap();
        assert!((center.latitude - 1.0 / 3.0).abs() < 1e-12);
        assert!((center.longitude - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_has_no_bounds_or_center() {
        assert!(compute_bounds(&[]).is_none());
        assert!(compute_center(&[]).is_none());
    }

    #[test]
    fn test_single_point_bounds_and_center() {
        let p = [GeoPoint::new(39.9508, 32.6890)];
        let bounds = compute_bounds(&p).unwrap();
        assert_eq!(bounds.north, bounds.south);
        assert_eq!(bounds.east, bounds.west);
        let center = compute_center(&p).unwrap();
        assert_eq!(GeoPoint::from(center), p[0]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn ring() -> impl Strategy<Value = Vec<GeoPoint>> {
            prop::collection::vec((-80.0..80.0_f64, -179.0..179.0_f64), 3..12)
                .prop_map(|v| v.into_iter().map(GeoPoint::from).collect())
        }

        fn close(a: f64, b: f64) -> bool {
            (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
        }

        proptest! {
            #[test]
            fn test_area_invariant_under_rotation(points in ring(), shift in 0usize..12) {
                let mut rotated = points.clone();
                let k = shift % rotated.len();
                rotated.rotate_left(k);
                let (a, b) = (compute_area(&points), compute_area(&rotated));
                prop_assert!(close(a, b), "rotation changed area: {} vs {}", a, b);
            }

            #[test]
            fn test_area_invariant_under_reversal(points in ring()) {
                let mut reversed = points.clone();
                reversed.reverse();
                let (a, b) = (compute_area(&points), compute_area(&reversed));
                prop_assert!(close(a, b), "reversal changed area: {} vs {}", a, b);
            }

            #[test]
            fn test_area_is_non_negative(points in ring()) {
                prop_assert!(compute_area(&points) >= 0.0);
            }

            #[test]
            fn test_center_lies_within_bounds(points in ring()) {
                let bounds = compute_bounds(&points).unwrap();
                let center = compute_center(&points).unwrap();
                let eps = 1e-9;
                prop_assert!(center.latitude >= bounds.south - eps && center.latitude <= bounds.north + eps);
                prop_assert!(center.longitude >= bounds.west - eps && center.longitude <= bounds.east + eps);
            }
        }
    }
}
