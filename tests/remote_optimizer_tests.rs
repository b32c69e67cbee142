//! Remote delegation tests
//!
//! The optimizer is mocked through the `TourOptimizer` trait: grouping
//! responses, malformed answers and transport failures, plus the request
//! wire shape and the local-fallback decision.

mod fixtures;

use std::sync::Mutex;

use tour_planner::optimizer::{
    OptimizeRequest, OptimizeResponse, OptimizedTour, OptimizerError, TourOptimizer,
};
use tour_planner::planner::{
    build_tours, build_tours_remote, build_tours_with_fallback, PlanError, PlanOptions,
    RemotePlanError,
};

use fixtures::{depot, far_cluster, near_cluster, TestStop};

/// Answers every request with a fixed set of order-id groupings.
struct FixedOptimizer {
    tours: Vec<Vec<String>>,
}

fn fixed(groups: &[&[&str]]) -> FixedOptimizer {
    FixedOptimizer {
        tours: groups
            .iter()
            .map(|ids| ids.iter().map(|id| id.to_string()).collect())
            .collect(),
    }
}

impl TourOptimizer for FixedOptimizer {
    fn optimize(
        &self,
        _request: &OptimizeRequest,
    ) -> Result<OptimizeResponse, OptimizerError> {
        Ok(OptimizeResponse {
            tours: self
                .tours
                .iter()
                .map(|ids| OptimizedTour {
                    order_ids: ids.clone(),
                })
                .collect(),
        })
    }
}

/// Always fails at the transport/shape level.
struct BrokenOptimizer;

impl TourOptimizer for BrokenOptimizer {
    fn optimize(
        &self,
        _request: &OptimizeRequest,
    ) -> Result<OptimizeResponse, OptimizerError> {
        Err(OptimizerError::MalformedResponse(
            "missing field `tours`".to_string(),
        ))
    }
}

/// Records the serialized request, then echoes one tour with all ids.
struct CapturingOptimizer {
    seen: Mutex<Option<serde_json::Value>>,
}

impl TourOptimizer for CapturingOptimizer {
    fn optimize(
        &self,
        request: &OptimizeRequest,
    ) -> Result<OptimizeResponse, OptimizerError> {
        let value = serde_json::to_value(request)
            .map_err(|err| OptimizerError::MalformedResponse(err.to_string()))?;
        let order_ids = value["orders"]
            .as_array()
            .map(|orders| {
                orders
                    .iter()
                    .filter_map(|o| o["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        if let Ok(mut seen) = self.seen.lock() {
            *seen = Some(value);
        }
        Ok(OptimizeResponse {
            tours: vec![OptimizedTour { order_ids }],
        })
    }
}

fn sample_stops() -> Vec<TestStop> {
    vec![
        TestStop::new("s1")
            .at(near_cluster(0))
            .weighing(200.0)
            .customer("Meyer GmbH"),
        TestStop::new("s2").at(near_cluster(1)).weighing(300.0),
        TestStop::new("s3").at(far_cluster(0)).weighing(250.0),
    ]
}

#[test]
fn remote_groups_map_back_to_full_stops() {
    let optimizer = fixed(&[&["s2", "s1"], &["s3"]]);

    let tours = build_tours_remote(depot(), &sample_stops(), &PlanOptions::default(), &optimizer)
        .expect("remote plan succeeds");

    assert_eq!(tours.len(), 2);
    let first: Vec<&str> = tours[0].stops.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(first, vec!["s2", "s1"]);
    assert_eq!(tours[0].stats.stops, 2);
    assert_eq!(tours[0].stats.weight_kg, 500.0);
    assert_eq!(tours[1].stats.weight_kg, 250.0);
    // Payload fields came back untouched.
    assert_eq!(tours[0].stops[1].customer, "Meyer GmbH");
}

#[test]
fn unknown_order_ids_are_dropped_silently() {
    let optimizer = fixed(&[&["s1", "ghost", "s3"]]);

    let tours = build_tours_remote(depot(), &sample_stops(), &PlanOptions::default(), &optimizer)
        .expect("remote plan succeeds");

    assert_eq!(tours.len(), 1);
    let ids: Vec<&str> = tours[0].stops.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s3"]);
    assert_eq!(tours[0].stats.stops, 2);
    assert_eq!(tours[0].stats.weight_kg, 450.0);
}

#[test]
fn tour_of_only_unknown_ids_fails_the_attempt() {
    let optimizer = fixed(&[&["ghost"]]);

    let err = build_tours_remote(depot(), &sample_stops(), &PlanOptions::default(), &optimizer)
        .unwrap_err();
    assert!(matches!(err, RemotePlanError::UnresolvableTour));
}

#[test]
fn empty_tour_list_fails_the_attempt() {
    let optimizer = fixed(&[]);

    let err = build_tours_remote(depot(), &sample_stops(), &PlanOptions::default(), &optimizer)
        .unwrap_err();
    assert!(matches!(err, RemotePlanError::NoTours));
}

#[test]
fn fallback_recovers_from_remote_failure() {
    let stops = sample_stops();
    let options = PlanOptions::default();

    let via_fallback = build_tours_with_fallback(depot(), &stops, &options, &BrokenOptimizer)
        .expect("fallback plan succeeds");
    let local = build_tours(depot(), &stops, &options).expect("local plan succeeds");

    assert_eq!(via_fallback.len(), local.len());
    for (a, b) in via_fallback.iter().zip(local.iter()) {
        assert_eq!(a.stops, b.stops);
        assert_eq!(a.stats, b.stats);
    }
}

#[test]
fn fallback_recovers_from_unresolvable_response() {
    let optimizer = fixed(&[&["ghost"]]);
    let stops = sample_stops();

    let tours = build_tours_with_fallback(depot(), &stops, &PlanOptions::default(), &optimizer)
        .expect("fallback plan succeeds");
    assert_eq!(
        tours.iter().map(|t| t.stats.stops).sum::<usize>(),
        stops.len()
    );
}

#[test]
fn input_errors_are_not_recovered() {
    let stops = vec![TestStop::new("unresolved").weighing(100.0)];
    let optimizer = fixed(&[&["unresolved"]]);

    let err = build_tours_with_fallback(depot(), &stops, &PlanOptions::default(), &optimizer)
        .unwrap_err();
    assert_eq!(err, PlanError::NoUsableStops);
}

#[test]
fn request_wire_shape_matches_the_contract() {
    let optimizer = CapturingOptimizer {
        seen: Mutex::new(None),
    };
    let options = PlanOptions {
        max_weight_kg: 1300.0,
        max_stops: 12,
        cost_per_km: 1.0,
    };

    build_tours_remote(depot(), &sample_stops(), &options, &optimizer)
        .expect("remote plan succeeds");

    let request = optimizer
        .seen
        .lock()
        .expect("lock")
        .take()
        .expect("request captured");

    assert_eq!(request["return_to_depot"], serde_json::json!(false));
    assert_eq!(request["max_stops"], serde_json::json!(12));
    assert_eq!(request["max_weight"], serde_json::json!(1300.0));
    assert_eq!(request["vehicles"], serde_json::Value::Null);
    assert_eq!(request["depot"]["lat"], serde_json::json!(51.830));
    assert_eq!(request["depot"]["lon"], serde_json::json!(8.570));

    let orders = request["orders"].as_array().expect("orders array");
    assert_eq!(orders.len(), 3);
    for order in orders {
        assert!(order["id"].is_string());
        assert!(order["weight"].is_number());
        assert!(order["lat"].is_number());
        assert!(order["lon"].is_number());
    }
}

#[test]
fn remote_and_local_tours_have_identical_shape() {
    // Echo the locally planned order through the mock; the resulting tours
    // must be indistinguishable from the local ones.
    let stops = sample_stops();
    let options = PlanOptions::default();
    let local = build_tours(depot(), &stops, &options).expect("local plan succeeds");

    let echoed: Vec<Vec<String>> = local
        .iter()
        .map(|tour| tour.stops.iter().map(|s| s.id.clone()).collect())
        .collect();
    let optimizer = FixedOptimizer { tours: echoed };

    let remote = build_tours_remote(depot(), &stops, &options, &optimizer)
        .expect("remote plan succeeds");

    assert_eq!(remote.len(), local.len());
    for (a, b) in remote.iter().zip(local.iter()) {
        assert_eq!(a.stops, b.stops);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.over_capacity, b.over_capacity);
    }
}
