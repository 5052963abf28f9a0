//! Shared data structures for route optimization and facility monitoring
//!
//! - Network: Facility, FacilityCategory, Connection
//! - Optimization: Route, RouteScore, ObjectiveWeights, OptimizationPreset
//! - Monitoring: PerformanceMetrics, Anomaly, MaintenanceAlert

mod facility;
mod route;
mod telemetry;
mod anomaly;
mod maintenance;

pub use facility::*;
pub use route::*;
pub use telemetry::*;
pub use anomaly::*;
pub use maintenance::*;
