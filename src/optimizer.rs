//! Remote optimizer HTTP adapter and wire contract.
//!
//! The optimizer is an external service the planner may delegate a whole
//! assignment to. It is strictly optional: any transport error, timeout or
//! malformed response makes the planner fall back to the local heuristic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// One order as submitted to the optimizer.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeOrder {
    pub id: String,
    pub weight: f64,
    pub lat: f64,
    pub lon: f64,
}

/// Request payload for an optimization run.
///
/// `return_to_depot` is always false here: tours are open paths.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRequest {
    pub depot: Coordinate,
    pub orders: Vec<OptimizeOrder>,
    pub max_stops: usize,
    pub max_weight: f64,
    pub vehicles: Option<u32>,
    pub return_to_depot: bool,
}

/// One tour as returned by the optimizer: order ids only, in visiting order.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizedTour {
    pub order_ids: Vec<String>,
}

/// Successful optimizer response. Anything that does not deserialize into
/// this shape counts as a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeResponse {
    pub tours: Vec<OptimizedTour>,
}

#[derive(Debug)]
pub enum OptimizerError {
    /// Transport failure, non-success status, or timeout.
    Http(reqwest::Error),
    /// Response did not match the expected shape.
    MalformedResponse(String),
}

impl fmt::Display for OptimizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerError::Http(err) => write!(f, "optimizer request failed: {}", err),
            OptimizerError::MalformedResponse(detail) => {
                write!(f, "optimizer response malformed: {}", detail)
            }
        }
    }
}

impl std::error::Error for OptimizerError {}

impl From<reqwest::Error> for OptimizerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            OptimizerError::MalformedResponse(err.to_string())
        } else {
            OptimizerError::Http(err)
        }
    }
}

/// Produces tour assignments for a request. Implemented by the HTTP client
/// below; tests substitute their own.
pub trait TourOptimizer {
    fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResponse, OptimizerError>;
}

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteOptimizerClient {
    config: OptimizerConfig,
    client: reqwest::blocking::Client,
}

impl RemoteOptimizerClient {
    pub fn new(config: OptimizerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl TourOptimizer for RemoteOptimizerClient {
    fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResponse, OptimizerError> {
        let url = format!("{}/optimize", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .and_then(|resp| resp.error_for_status())?
            .json::<OptimizeResponse>()?;

        Ok(response)
    }
}
