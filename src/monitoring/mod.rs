//! Monitoring Engine
//!
//! Keeps a bounded per-facility telemetry history with a baseline snapshot,
//! flags rule-based anomalies against that baseline, and forecasts
//! maintenance from a health score and a Weibull wear-out model.
//!
//! ## Architecture
//!
//! - `TelemetryHistory`: FIFO sample window + baseline store, safe to share
//! - `AnomalyDetector`: five independent threshold rules, stateless
//! - `MaintenancePredictor`: health score, failure probability, alert tables
//! - `MonitoringService`: per-tick façade wiring the three together
//!
//! A facility without a baseline is unmonitored: detection and prediction
//! skip it silently.

mod detector;
mod history;
mod maintenance;
mod service;

pub use detector::{percent_deviation, AnomalyDetector};
pub use history::{FacilityHistory, TelemetryHistory};
pub use maintenance::{health_score, MaintenanceProfile, MaintenancePredictor, ReliabilityModel};
pub use service::{MonitoringService, TickReport};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitoringError {
    #[error("Invalid Weibull reliability model: shape={shape}, scale={scale} (both must be finite and > 0)")]
    InvalidReliabilityModel { shape: f64, scale: f64 },
}
