//! Core domain traits for the tour planner.
//!
//! These are intentionally minimal and domain-agnostic. Concrete apps should
//! implement them for their own order data models; whatever extra fields a
//! stop type carries travel through planning untouched.

use std::fmt::Display;
use std::hash::Hash;

use crate::geo::Coordinate;

/// Unique identifier for planner entities.
///
/// `Display` is required because the remote optimizer wire contract carries
/// ids as strings.
pub trait Id: Clone + Eq + Hash + Display {}

impl<T> Id for T where T: Clone + Eq + Hash + Display {}

/// A stop is a single delivery order to be grouped into a tour.
pub trait Stop {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Order weight in kilograms. Non-negative.
    fn weight_kg(&self) -> f64;

    /// Resolved delivery coordinate, if geocoding succeeded.
    ///
    /// Stops without a coordinate are excluded from planning; the planner
    /// filters them out rather than failing on them.
    fn coordinate(&self) -> Option<Coordinate>;
}

/// Cache collaborator for the geocoding step.
///
/// The routing core never touches this; it only exists so the geocoder can
/// reuse lookups across runs however the embedding application persists them.
pub trait GeocodeCache {
    fn get(&self, key: &str) -> Option<Coordinate>;
    fn put(&self, key: &str, coordinate: Coordinate);
}
