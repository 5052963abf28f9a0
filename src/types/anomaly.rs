//! Anomaly types: Anomaly, AnomalyKind, Severity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which rule produced an anomaly
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    Co2Spike,
    EfficiencyDrop,
    EnergySurge,
    PressureAnomaly,
    VibrationAlert,
    /// Combined wear signature; produced by simulation injection, no detector rule
    EquipmentDegradation,
}

impl AnomalyKind {
    /// Short tag used inside anomaly ids
    pub fn short_code(&self) -> &'static str {
        match self {
            AnomalyKind::Co2Spike => "co2",
            AnomalyKind::EfficiencyDrop => "eff",
            AnomalyKind::EnergySurge => "energy",
            AnomalyKind::PressureAnomaly => "press",
            AnomalyKind::VibrationAlert => "vib",
            AnomalyKind::EquipmentDegradation => "degr",
        }
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyKind::Co2Spike => write!(f, "CO2 Spike"),
            AnomalyKind::EfficiencyDrop => write!(f, "Efficiency Drop"),
            AnomalyKind::EnergySurge => write!(f, "Energy Surge"),
            AnomalyKind::PressureAnomaly => write!(f, "Pressure Anomaly"),
            AnomalyKind::VibrationAlert => write!(f, "Vibration Alert"),
            AnomalyKind::EquipmentDegradation => write!(f, "Equipment Degradation"),
        }
    }
}

impl std::str::FromStr for AnomalyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "co2_spike" => Ok(AnomalyKind::Co2Spike),
            "efficiency_drop" => Ok(AnomalyKind::EfficiencyDrop),
            "energy_surge" => Ok(AnomalyKind::EnergySurge),
            "pressure_anomaly" => Ok(AnomalyKind::PressureAnomaly),
            "vibration_alert" => Ok(AnomalyKind::VibrationAlert),
            "equipment_degradation" => Ok(AnomalyKind::EquipmentDegradation),
            other => Err(format!("unknown anomaly kind '{other}'")),
        }
    }
}

/// Anomaly severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A baseline deviation flagged for one facility at one instant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Anomaly {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub facility_id: String,
    pub facility_name: String,
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub description: String,
    pub current_value: f64,
    pub expected_value: f64,
    /// Signed percent deviation from the expected value
    pub deviation: f64,
}
