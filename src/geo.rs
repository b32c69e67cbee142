//! Geometry helpers: great-circle distance plus a fixed road-detour factor.
//!
//! No real road-network routing happens anywhere in this crate; road distance
//! is approximated as straight-line distance times [`ROAD_FACTOR`].

use serde::{Deserialize, Serialize};

use crate::traits::Stop;

/// Earth mean radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed detour ratio of real roads over straight-line distance.
pub const ROAD_FACTOR: f64 = 1.30;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Haversine distance between two points in kilometers.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let s = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    // Clamp against floating-point overshoot near antipodal points.
    2.0 * EARTH_RADIUS_KM * s.sqrt().min(1.0).asin()
}

/// Estimated road distance in kilometers.
pub fn road_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    haversine_km(a, b) * ROAD_FACTOR
}

/// Length of the open path depot → stops[0] → … → stops[n-1] in kilometers.
///
/// Tours never return to the depot. A stop without a coordinate contributes
/// zero-length legs to and from it; such stops should have been filtered
/// upstream, but this must not panic on them.
pub fn path_length_km<S: Stop>(depot: Coordinate, stops: &[S]) -> f64 {
    let mut km = 0.0;
    let mut last = Some(depot);
    for stop in stops {
        let coordinate = stop.coordinate();
        if let (Some(from), Some(to)) = (last, coordinate) {
            km += road_distance_km(from, to);
        }
        last = coordinate;
    }
    km
}
