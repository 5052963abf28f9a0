//! Telemetry sample type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation instant for one facility.
///
/// Also used as the per-facility baseline shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceMetrics {
    pub facility_id: String,
    pub timestamp: DateTime<Utc>,
    /// kg CO2 per unit
    pub co2_emissions: f64,
    /// kWh per unit
    pub energy_consumption: f64,
    /// Units per day
    pub throughput: f64,
    /// °C
    pub temperature: f64,
    /// bar
    pub pressure: f64,
    /// mm/s RMS
    pub vibration: f64,
    /// 0.0 - 1.0
    pub efficiency: f64,
}

impl PerformanceMetrics {
    /// Whether every numeric channel is finite
    pub fn is_finite(&self) -> bool {
        [
            self.co2_emissions,
            self.energy_consumption,
            self.throughput,
            self.temperature,
            self.pressure,
            self.vibration,
            self.efficiency,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
