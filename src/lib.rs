//! Routewise: processing-network route optimization and facility monitoring
//!
//! Two independent engines over a static facility network:
//!
//! ## Architecture
//!
//! - **Route Optimization** (`network`): simple-path enumeration, bounded
//!   best-first search, normalized multi-objective scoring, Pareto frontier
//! - **Monitoring** (`monitoring`): rolling telemetry history, rule-based
//!   anomaly detection, Weibull-based maintenance forecasting
//! - **Datasets** (`dataset`): facility/connection loading plus the built-in
//!   reference network
//! - **Simulation** (`simulation`): seeded synthetic telemetry and anomaly injection

pub mod config;
pub mod dataset;
pub mod monitoring;
pub mod network;
pub mod simulation;
pub mod types;

// Re-export configuration
pub use config::{AppConfig, ConfigError};

// Re-export commonly used types
pub use types::{
    Anomaly, AnomalyKind, Connection, Facility, FacilityCategory, MaintenanceAlert,
    MaintenancePriority, ObjectiveWeights, OptimizationPreset, PerformanceMetrics, Route,
    RouteSavings, RouteScore, Severity,
};

// Re-export engines
pub use dataset::{Dataset, DatasetError};
pub use monitoring::{
    AnomalyDetector, MaintenancePredictor, MonitoringError, MonitoringService, TelemetryHistory,
    TickReport,
};
pub use network::{FacilityGraph, MultiObjectiveScorer, NetworkError, RouteEnumerator, RouteOptimizer};
pub use simulation::TelemetrySimulator;
