//! Test fixtures for tour-planner.
//!
//! Provides a builder-style stop type with an opaque payload field, plus a
//! depot and delivery clusters in the East Westphalia service area.

pub mod stops;

pub use stops::*;
