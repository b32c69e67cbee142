//! Visiting-order heuristics: angular sweep, nearest-neighbor refinement of
//! the sweep prefix, and 2-opt local search.
//!
//! None of this solves TSP exactly; the goal is a short, stable order at the
//! tens-of-stops scale a dispatch run actually has.

use std::cmp::Ordering;

use crate::geo::{self, Coordinate};
use crate::traits::Stop;

/// How many stops of the sweep order get nearest-neighbor refinement.
///
/// Bounds the O(n²) refinement near the depot; tunable, not semantic.
pub const NEAREST_NEIGHBOR_PREFIX: usize = 8;

/// Outer-pass cap for 2-opt.
pub const TWO_OPT_MAX_ITERS: usize = 250;

/// Minimum improvement (km) for 2-opt to accept a reversal. Guards against
/// infinite loops from floating-point noise.
const IMPROVEMENT_EPSILON_KM: f64 = 1e-6;

fn coordinate_or(depot: Coordinate, stop: &impl Stop) -> Coordinate {
    stop.coordinate().unwrap_or(depot)
}

/// Polar angle of a point around the depot, in (-PI, PI].
fn angle_from_depot(depot: Coordinate, p: Coordinate) -> f64 {
    (p.lat - depot.lat).atan2(p.lon - depot.lon)
}

/// Sort stops by polar angle around the depot, ascending.
///
/// Stops on the same angular ray are visited together, which avoids zig-zag
/// crossing of the service area. Angle ties break by ascending distance from
/// the depot.
pub fn sweep_order<S: Stop + Clone>(depot: Coordinate, stops: &[S]) -> Vec<S> {
    let mut ordered = stops.to_vec();
    ordered.sort_by(|a, b| {
        let ca = coordinate_or(depot, a);
        let cb = coordinate_or(depot, b);
        let angle_a = angle_from_depot(depot, ca);
        let angle_b = angle_from_depot(depot, cb);
        if (angle_a - angle_b).abs() > 1e-9 {
            angle_a.partial_cmp(&angle_b).unwrap_or(Ordering::Equal)
        } else {
            geo::haversine_km(depot, ca)
                .partial_cmp(&geo::haversine_km(depot, cb))
                .unwrap_or(Ordering::Equal)
        }
    });
    ordered
}

/// Greedy nearest-neighbor chain starting from `start`.
pub fn nearest_neighbor_from<S: Stop + Clone>(start: Coordinate, stops: &[S]) -> Vec<S> {
    let mut todo = stops.to_vec();
    let mut out = Vec::with_capacity(todo.len());
    let mut current = start;

    while !todo.is_empty() {
        let mut best_index = 0;
        let mut best_km = f64::INFINITY;
        for (i, stop) in todo.iter().enumerate() {
            let km = geo::road_distance_km(current, coordinate_or(start, stop));
            if km < best_km {
                best_km = km;
                best_index = i;
            }
        }
        let next = todo.remove(best_index);
        current = coordinate_or(start, &next);
        out.push(next);
    }

    out
}

/// Combined ordering entry point: sweep-order everything, then
/// nearest-neighbor-refine the first [`NEAREST_NEIGHBOR_PREFIX`] stops.
///
/// The tail keeps its sweep order. This is the input to partitioning; 2-opt
/// runs per partition afterwards, not on the whole set.
pub fn order_stops<S: Stop + Clone>(depot: Coordinate, stops: &[S]) -> Vec<S> {
    let base = sweep_order(depot, stops);
    let head = NEAREST_NEIGHBOR_PREFIX.min(base.len());
    let mut ordered = nearest_neighbor_from(depot, &base[..head]);
    ordered.extend_from_slice(&base[head..]);
    ordered
}

/// 2-opt: repeatedly reverse sub-segments while that strictly shortens the
/// depot-anchored path, until a full pass improves nothing or the iteration
/// cap is hit.
///
/// Path length is recomputed from scratch per candidate rather than via
/// incremental deltas. Fine for tens of stops, not for thousands.
pub fn two_opt<S: Stop + Clone>(depot: Coordinate, order: &[S], max_iters: usize) -> Vec<S> {
    let mut best = order.to_vec();
    if best.len() < 2 {
        return best;
    }

    let mut best_km = geo::path_length_km(depot, &best);
    let mut improved = true;
    let mut iter = 0;

    while improved && iter < max_iters {
        improved = false;
        iter += 1;
        for i in 0..best.len() - 1 {
            for k in i + 1..best.len() {
                let mut candidate = best.clone();
                candidate[i..=k].reverse();
                let km = geo::path_length_km(depot, &candidate);
                if km + IMPROVEMENT_EPSILON_KM < best_km {
                    best = candidate;
                    best_km = km;
                    improved = true;
                }
            }
        }
    }

    best
}
