//! Greedy capacity partitioner.
//!
//! Splits an already-ordered stop list into vehicle loads. A single
//! left-to-right pass, no rebalancing: keeping the sequencing step's
//! geographically adjacent stops together matters more than tight packing.

use crate::traits::Stop;

/// Split `ordered` into chunks whose total weight stays within
/// `max_weight_kg` and whose stop count stays within `max_stops`.
///
/// A single stop heavier than `max_weight_kg` becomes its own chunk instead
/// of blocking the pass; the planner flags the resulting tour as over
/// capacity. Input order is preserved across the concatenation of chunks.
pub fn partition_by_weight<S: Stop + Clone>(
    ordered: &[S],
    max_weight_kg: f64,
    max_stops: usize,
) -> Vec<Vec<S>> {
    let mut chunks: Vec<Vec<S>> = Vec::new();
    let mut current: Vec<S> = Vec::new();
    let mut current_weight = 0.0;

    for stop in ordered {
        let weight = stop.weight_kg();
        let next_stops = current.len() + 1;
        let would_overflow =
            current_weight + weight > max_weight_kg || next_stops > max_stops;

        if would_overflow {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current_weight = 0.0;
        }

        // Single order over the limit: isolate it in its own chunk.
        if weight > max_weight_kg {
            chunks.push(vec![stop.clone()]);
            continue;
        }

        current.push(stop.clone());
        current_weight += weight;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
