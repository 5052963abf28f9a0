//! Route Optimization Engine
//!
//! Enumerates feasible paths through the facility graph, scores them on
//! normalized CO2 / cost / energy objectives and flags the Pareto frontier.
//! Everything here is pure: identical inputs give identical, identically
//! ordered outputs, and calls share no mutable state.
//!
//! ## Architecture
//!
//! - `FacilityGraph`: read-only adjacency index, validated at construction
//! - `RouteEnumerator`: exhaustive simple-path DFS and bounded best-first search
//! - `MultiObjectiveScorer`: weight normalization, min/max scoring, Pareto flags
//! - `CostModel`: carbon + electricity operating cost
//! - `RouteOptimizer`: request-level façade combining the above

mod cost;
mod graph;
mod optimizer;
mod scoring;
mod search;

pub use cost::CostModel;
pub use graph::FacilityGraph;
pub use optimizer::RouteOptimizer;
pub use scoring::{MultiObjectiveScorer, NormalizedWeights};
pub use search::{EnumerationOutcome, RouteEnumerator};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection '{connection}' references unknown facility '{facility}'")]
    InvalidReference { connection: String, facility: String },

    #[error("Duplicate facility id: {0}")]
    DuplicateFacility(String),

    #[error("Facility not found: {0}")]
    FacilityNotFound(String),

    #[error("Invalid objective weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid throughput: {0} (must be finite and >= 0)")]
    InvalidThroughput(f64),
}

/// Reject throughputs the aggregates cannot be computed with.
pub(crate) fn check_throughput(throughput: f64) -> Result<(), NetworkError> {
    if throughput.is_finite() && throughput >= 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidThroughput(throughput))
    }
}
