//! Stop builder and service-area coordinates shared by the integration tests.

#![allow(dead_code)]

use tour_planner::geo::Coordinate;
use tour_planner::traits::Stop;

/// Depot in the East Westphalia service area.
pub fn depot() -> Coordinate {
    Coordinate::new(51.830, 8.570)
}

/// A delivery point roughly 2 km from the depot.
pub fn near_cluster(i: usize) -> Coordinate {
    Coordinate::new(51.830 + 0.018, 8.570 + 0.004 * i as f64)
}

/// A delivery point roughly 50 km from the depot.
pub fn far_cluster(i: usize) -> Coordinate {
    Coordinate::new(51.830 + 0.45, 8.570 + 0.010 * i as f64)
}

/// Builder for test stops with sensible defaults.
///
/// `customer` stands in for the arbitrary extra fields a real order carries;
/// the planner must hand it back untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct TestStop {
    pub id: String,
    pub weight_kg: f64,
    pub coordinate: Option<Coordinate>,
    pub customer: String,
}

impl TestStop {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            weight_kg: 0.0,
            coordinate: None,
            customer: String::new(),
        }
    }

    pub fn at(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn weighing(mut self, kg: f64) -> Self {
        self.weight_kg = kg;
        self
    }

    pub fn customer(mut self, name: &str) -> Self {
        self.customer = name.to_string();
        self
    }
}

impl Stop for TestStop {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }
}
