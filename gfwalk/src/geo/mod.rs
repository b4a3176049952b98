//! Geodesy module
//!
//! Provides the geographic coordinate type used throughout the engine and the
//! great-circle distance between two coordinates.
//!
//! Coordinates are not range-checked. Out-of-range values are accepted and
//! simply produce whatever the spherical formula yields for them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate in decimal degrees.
///
/// Serialized as a `[latitude, longitude]` pair, matching the point catalog
/// record format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometers.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_km(*self, *other)
    }

    /// Return a copy shifted by the given latitude/longitude deltas.
    #[inline]
    pub fn offset(&self, dlat: f64, dlon: f64) -> Self {
        Self {
            lat: self.lat + dlat,
            lon: self.lon + dlon,
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.lat, coord.lon]
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine great-circle distance between two coordinates, in kilometers.
///
/// Total and deterministic: identical inputs yield exactly `0.0`.
///
/// # Example
///
/// ```
/// use gfwalk::geo::{distance_km, Coordinate};
///
/// let station = Coordinate::new(35.404, 136.757);
/// let north = Coordinate::new(35.410, 136.757);
/// let d = distance_km(station, north);
/// assert!((d - 0.667).abs() < 0.001);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    // Rounding can push h a hair above 1.0 for near-antipodal points.
    let h = ((dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {} ± {}, got {}",
            expected,
            tolerance,
            actual
        );
    }

    #[test]
    fn test_identical_points_are_zero() {
        let gifu = Coordinate::new(35.423, 136.762);
        assert_eq!(distance_km(gifu, gifu), 0.0);
    }

    #[test]
    fn test_gifu_station_short_hop() {
        let subject = Coordinate::new(35.410, 136.757);
        let station = Coordinate::new(35.404, 136.757);
        assert_close(distance_km(subject, station), 0.667_169_559_9, 1e-9);
    }

    #[test]
    fn test_gifu_station_closer() {
        let subject = Coordinate::new(35.406, 136.757);
        let station = Coordinate::new(35.404, 136.757);
        assert_close(distance_km(subject, station), 0.222_389_853_3, 1e-9);
    }

    #[test]
    fn test_tokyo_to_osaka() {
        let tokyo = Coordinate::new(35.6812, 139.7671);
        let osaka = Coordinate::new(34.7025, 135.4959);
        assert_close(distance_km(tokyo, osaka), 403.058_319_57, 1e-6);
    }

    #[test]
    fn test_london_to_paris() {
        let london = Coordinate::new(51.5074, -0.1278);
        let paris = Coordinate::new(48.8566, 2.3522);
        assert_close(distance_km(london, paris), 343.556_060_34, 1e-6);
    }

    #[test]
    fn test_new_york_to_london() {
        let nyc = Coordinate::new(40.7128, -74.0060);
        let london = Coordinate::new(51.5074, -0.1278);
        assert_close(distance_km(nyc, london), 5570.222_179_74, 1e-6);
    }

    #[test]
    fn test_antipodal_on_equator_is_half_circumference() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        assert_close(distance_km(a, b), std::f64::consts::PI * EARTH_RADIUS_KM, 1e-6);
    }

    #[test]
    fn test_out_of_range_input_is_accepted() {
        let a = Coordinate::new(95.0, 200.0);
        let b = Coordinate::new(-95.0, -200.0);
        let d = distance_km(a, b);
        assert!(d.is_finite());
        assert!(d >= 0.0);
    }

    #[test]
    fn test_offset() {
        let start = Coordinate::new(35.41, 136.76);
        let moved = start.offset(0.001, -0.002);
        assert_close(moved.lat, 35.411, 1e-12);
        assert_close(moved.lon, 136.758, 1e-12);
    }

    #[test]
    fn test_serde_pair_format() {
        let coord: Coordinate = serde_json::from_str("[35.423, 136.762]").unwrap();
        assert_eq!(coord, Coordinate::new(35.423, 136.762));
        assert_eq!(serde_json::to_string(&coord).unwrap(), "[35.423,136.762]");
    }

    #[test]
    fn test_display() {
        let coord = Coordinate::new(35.41, 136.76);
        assert_eq!(coord.to_string(), "(35.410000, 136.760000)");
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_is_symmetric(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat1, lon1);
                let b = Coordinate::new(lat2, lon2);
                let ab = distance_km(a, b);
                let ba = distance_km(b, a);
                prop_assert!(
                    (ab - ba).abs() < 1e-9,
                    "distance not symmetric: {} vs {}", ab, ba
                );
            }

            #[test]
            fn test_distance_to_self_is_zero(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat, lon);
                prop_assert_eq!(distance_km(a, a), 0.0);
            }

            #[test]
            fn test_distance_bounded_by_half_circumference(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let d = distance_km(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2));
                prop_assert!(d >= 0.0);
                prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
            }
        }
    }
}
