//! Rule-based anomaly detection against a per-facility baseline

use tracing::debug;

use crate::config::AnomalyThresholds;
use crate::types::{Anomaly, AnomalyKind, Facility, PerformanceMetrics, Severity};

/// `(current − baseline) / baseline × 100`, or 0 when the baseline is 0.
pub fn percent_deviation(current: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    (current - baseline) / baseline * 100.0
}

/// Evaluates the five threshold rules. Holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyDetector {
    thresholds: AnomalyThresholds,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(AnomalyThresholds::default())
    }
}

impl AnomalyDetector {
    pub fn new(thresholds: AnomalyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AnomalyThresholds {
        &self.thresholds
    }

    /// All rules that fire for `current` (zero to five anomalies).
    ///
    /// Rules are independent; output order is CO2, efficiency, energy,
    /// vibration, pressure.
    pub fn detect(
        &self,
        current: &PerformanceMetrics,
        baseline: &PerformanceMetrics,
        facility: &Facility,
    ) -> Vec<Anomaly> {
        let t = &self.thresholds;
        let mut anomalies = Vec::new();
        let mut emit = |kind: AnomalyKind,
                        severity: Severity,
                        description: String,
                        current_value: f64,
                        expected_value: f64,
                        deviation: f64| {
            anomalies.push(Anomaly {
                id: format!(
                    "anom-{}-{}-{}",
                    current.timestamp.timestamp_millis(),
                    kind.short_code(),
                    current.facility_id
                ),
                timestamp: current.timestamp,
                facility_id: current.facility_id.clone(),
                facility_name: facility.name.clone(),
                kind,
                severity,
                description,
                current_value,
                expected_value,
                deviation,
            });
        };

        // CO2 spike (either direction)
        let co2 = percent_deviation(current.co2_emissions, baseline.co2_emissions);
        if co2.abs() > t.co2_spike_percent {
            let severity = if co2.abs() > t.co2_critical_percent {
                Severity::Critical
            } else if co2.abs() > t.co2_high_percent {
                Severity::High
            } else {
                Severity::Medium
            };
            let direction = if co2 > 0.0 { "increased" } else { "decreased" };
            emit(
                AnomalyKind::Co2Spike,
                severity,
                format!("CO2 emissions {direction} by {:.1}%", co2.abs()),
                current.co2_emissions,
                baseline.co2_emissions,
                co2,
            );
        }

        // Efficiency drop (downward only)
        let efficiency = percent_deviation(current.efficiency, baseline.efficiency);
        if efficiency < -t.efficiency_drop_percent {
            let severity = if efficiency < -t.efficiency_high_percent {
                Severity::High
            } else {
                Severity::Medium
            };
            emit(
                AnomalyKind::EfficiencyDrop,
                severity,
                format!("Processing efficiency dropped by {:.1}%", efficiency.abs()),
                current.efficiency,
                baseline.efficiency,
                efficiency,
            );
        }

        // Energy surge (upward only)
        let energy = percent_deviation(current.energy_consumption, baseline.energy_consumption);
        if energy > t.energy_surge_percent {
            let severity = if energy > t.energy_high_percent {
                Severity::High
            } else {
                Severity::Medium
            };
            emit(
                AnomalyKind::EnergySurge,
                severity,
                format!("Energy consumption increased by {energy:.1}%"),
                current.energy_consumption,
                baseline.energy_consumption,
                energy,
            );
        }

        // Vibration is absolute, reported against the nominal level
        if current.vibration > t.vibration_alert_mm_s {
            let severity = if current.vibration > t.vibration_critical_mm_s {
                Severity::Critical
            } else if current.vibration > t.vibration_high_mm_s {
                Severity::High
            } else {
                Severity::Medium
            };
            let nominal = t.nominal_vibration_mm_s;
            emit(
                AnomalyKind::VibrationAlert,
                severity,
                format!("Abnormal vibration detected: {:.2} mm/s", current.vibration),
                current.vibration,
                nominal,
                percent_deviation(current.vibration, nominal),
            );
        }

        // Pressure (either direction)
        let pressure = percent_deviation(current.pressure, baseline.pressure);
        if pressure.abs() > t.pressure_percent {
            let severity = if pressure.abs() > t.pressure_high_percent {
                Severity::High
            } else {
                Severity::Medium
            };
            let direction = if pressure > 0.0 { "increase" } else { "decrease" };
            emit(
                AnomalyKind::PressureAnomaly,
                severity,
                format!("Pressure {direction} of {:.1}%", pressure.abs()),
                current.pressure,
                baseline.pressure,
                pressure,
            );
        }

        if !anomalies.is_empty() {
            debug!(
                facility = %current.facility_id,
                count = anomalies.len(),
                "Anomalies detected"
            );
        }
        anomalies
    }
}
