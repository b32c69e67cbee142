//! Tour building: ordering, capacity partitioning, per-tour 2-opt and stats.
//!
//! Planning is a pure function of (depot, stops, options). The remote
//! delegation path adds one network call; its result flows through the same
//! statistics step, so tours look identical whichever path produced them.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::geo::Coordinate;
use crate::optimizer::{
    OptimizeOrder, OptimizeRequest, OptimizerError, TourOptimizer,
};
use crate::partition::partition_by_weight;
use crate::sequence::{order_stops, two_opt, TWO_OPT_MAX_ITERS};
use crate::stats::{compute_tour_stats, TourStats};
use crate::traits::Stop;

/// Per-run planning constraints.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Maximum total weight per tour in kilograms.
    pub max_weight_kg: f64,
    /// Maximum number of stops per tour.
    pub max_stops: usize,
    /// Monetary cost per driven kilometer.
    pub cost_per_km: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            max_weight_kg: 1300.0,
            max_stops: 12,
            cost_per_km: 1.0,
        }
    }
}

/// One vehicle run: stops in visiting order plus derived figures.
#[derive(Debug, Clone)]
pub struct Tour<S> {
    pub stops: Vec<S>,
    pub stats: TourStats,
    /// A lone stop heavier than the weight limit was isolated here; needs
    /// human review, planning itself does not fail on it.
    pub over_capacity: bool,
}

/// Fatal input problems. Downstream stages need at least one tour, so these
/// are surfaced instead of returning an empty plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Depot coordinate is not finite.
    InvalidDepot,
    /// No stop has a usable (finite) coordinate.
    NoUsableStops,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InvalidDepot => write!(f, "depot has no valid coordinate"),
            PlanError::NoUsableStops => {
                write!(f, "no stop has a resolvable coordinate")
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// Why a remote planning attempt produced no usable plan.
#[derive(Debug)]
pub enum RemotePlanError {
    /// Input was invalid; falling back locally cannot help.
    Input(PlanError),
    /// The optimizer call itself failed.
    Optimizer(OptimizerError),
    /// The optimizer answered with no tours at all.
    NoTours,
    /// A returned tour resolved to zero known stops.
    UnresolvableTour,
}

impl fmt::Display for RemotePlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemotePlanError::Input(err) => err.fmt(f),
            RemotePlanError::Optimizer(err) => err.fmt(f),
            RemotePlanError::NoTours => write!(f, "optimizer returned no tours"),
            RemotePlanError::UnresolvableTour => {
                write!(f, "optimizer tour matched no known order ids")
            }
        }
    }
}

impl std::error::Error for RemotePlanError {}

impl From<OptimizerError> for RemotePlanError {
    fn from(err: OptimizerError) -> Self {
        RemotePlanError::Optimizer(err)
    }
}

fn usable_stops<S: Stop + Clone>(stops: &[S]) -> Vec<S> {
    stops
        .iter()
        .filter(|stop| stop.coordinate().is_some_and(|c| c.is_finite()))
        .cloned()
        .collect()
}

fn validate<S: Stop + Clone>(depot: Coordinate, stops: &[S]) -> Result<Vec<S>, PlanError> {
    if !depot.is_finite() {
        return Err(PlanError::InvalidDepot);
    }
    let usable = usable_stops(stops);
    if usable.is_empty() {
        return Err(PlanError::NoUsableStops);
    }
    Ok(usable)
}

fn finish_tour<S: Stop + Clone>(
    depot: Coordinate,
    stops: Vec<S>,
    options: &PlanOptions,
) -> Tour<S> {
    let stats = compute_tour_stats(depot, &stops, options.cost_per_km);
    let over_capacity =
        stops.len() == 1 && stops[0].weight_kg() > options.max_weight_kg;
    Tour {
        stops,
        stats,
        over_capacity,
    }
}

/// Build tours with the local heuristic: sweep + nearest-neighbor ordering,
/// greedy partitioning, then 2-opt within each tour independently.
///
/// Tours come back in sweep order (first tour = first angular group). Stops
/// without a usable coordinate are dropped; if none remain this fails.
pub fn build_tours<S: Stop + Clone>(
    depot: Coordinate,
    stops: &[S],
    options: &PlanOptions,
) -> Result<Vec<Tour<S>>, PlanError> {
    let usable = validate(depot, stops)?;

    let ordered = order_stops(depot, &usable);
    let chunks = partition_by_weight(&ordered, options.max_weight_kg, options.max_stops);
    debug!(
        stops = usable.len(),
        tours = chunks.len(),
        "local plan partitioned"
    );

    let tours = chunks
        .into_iter()
        .map(|chunk| {
            let improved = two_opt(depot, &chunk, TWO_OPT_MAX_ITERS);
            finish_tour(depot, improved, options)
        })
        .collect();

    Ok(tours)
}

/// Delegate the whole assignment to a remote optimizer.
///
/// Unknown order ids in the response are dropped silently; a tour that
/// resolves to zero known stops, or an empty tour list, fails the attempt so
/// the caller can fall back. Statistics are computed exactly as in
/// [`build_tours`].
pub fn build_tours_remote<S, O>(
    depot: Coordinate,
    stops: &[S],
    options: &PlanOptions,
    optimizer: &O,
) -> Result<Vec<Tour<S>>, RemotePlanError>
where
    S: Stop + Clone,
    O: TourOptimizer,
{
    let usable = validate(depot, stops).map_err(RemotePlanError::Input)?;

    let request = OptimizeRequest {
        depot,
        orders: usable
            .iter()
            .map(|stop| {
                let c = stop.coordinate().unwrap_or(depot);
                OptimizeOrder {
                    id: stop.id().to_string(),
                    weight: stop.weight_kg(),
                    lat: c.lat,
                    lon: c.lon,
                }
            })
            .collect(),
        max_stops: options.max_stops,
        max_weight: options.max_weight_kg,
        vehicles: None,
        return_to_depot: false,
    };

    let response = optimizer.optimize(&request)?;
    if response.tours.is_empty() {
        return Err(RemotePlanError::NoTours);
    }

    let by_id: HashMap<String, &S> = usable
        .iter()
        .map(|stop| (stop.id().to_string(), stop))
        .collect();

    let mut tours = Vec::with_capacity(response.tours.len());
    for remote_tour in &response.tours {
        let resolved: Vec<S> = remote_tour
            .order_ids
            .iter()
            .filter_map(|id| by_id.get(id).map(|stop| (*stop).clone()))
            .collect();
        if resolved.is_empty() {
            return Err(RemotePlanError::UnresolvableTour);
        }
        tours.push(finish_tour(depot, resolved, options));
    }

    debug!(tours = tours.len(), "remote plan accepted");
    Ok(tours)
}

/// Try the remote optimizer, fall back to the local heuristic.
///
/// The fallback decision lives here, in plain control flow: input errors
/// propagate (local planning would fail on them too), every other remote
/// failure is logged and recovered locally.
pub fn build_tours_with_fallback<S, O>(
    depot: Coordinate,
    stops: &[S],
    options: &PlanOptions,
    optimizer: &O,
) -> Result<Vec<Tour<S>>, PlanError>
where
    S: Stop + Clone,
    O: TourOptimizer,
{
    match build_tours_remote(depot, stops, options, optimizer) {
        Ok(tours) => Ok(tours),
        Err(RemotePlanError::Input(err)) => Err(err),
        Err(err) => {
            warn!(error = %err, "remote optimizer failed, using local heuristic");
            build_tours(depot, stops, options)
        }
    }
}
