//! tour-planner core
//!
//! Local route planning for logistics dispatch: sweep/nearest-neighbor
//! ordering, greedy capacity partitioning, 2-opt improvement and tour
//! statistics, with optional delegation to a remote optimizer service.

pub mod traits;
pub mod geo;
pub mod sequence;
pub mod partition;
pub mod stats;
pub mod planner;
pub mod optimizer;
pub mod geocode;
