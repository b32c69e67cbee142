//! Per-tour summary statistics.

use serde::Serialize;

use crate::geo::{self, Coordinate};
use crate::traits::Stop;

/// Derived figures for one tour.
///
/// Values are rounded here, at the display boundary, and nowhere earlier:
/// distance and cost to 2 decimals, weight to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TourStats {
    pub stops: usize,
    pub distance_km: f64,
    pub cost: f64,
    pub weight_kg: f64,
}

/// Distance, weight and monetary cost of the open path depot → stops.
pub fn compute_tour_stats<S: Stop>(
    depot: Coordinate,
    stops: &[S],
    cost_per_km: f64,
) -> TourStats {
    let km = geo::path_length_km(depot, stops);
    let weight: f64 = stops.iter().map(|s| s.weight_kg()).sum();
    TourStats {
        stops: stops.len(),
        distance_km: round_to(km, 2),
        cost: round_to(km * cost_per_km, 2),
        weight_kg: round_to(weight, 1),
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
