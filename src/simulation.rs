//! Synthetic telemetry for facilities without live sensors
//!
//! Samples are drawn around a baseline with bounded uniform noise; a
//! configurable share of them get one of the fixed anomaly perturbations.
//! Seeding the RNG makes a run reproducible.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::config::defaults;
use crate::types::{AnomalyKind, Facility, PerformanceMetrics};

/// Kinds the simulator injects at random
const INJECTED_KINDS: [AnomalyKind; 3] = [
    AnomalyKind::Co2Spike,
    AnomalyKind::EfficiencyDrop,
    AnomalyKind::EnergySurge,
];

/// Reference operating point derived from a facility's static factors.
pub fn default_baseline(facility: &Facility, timestamp: DateTime<Utc>) -> PerformanceMetrics {
    PerformanceMetrics {
        facility_id: facility.id.clone(),
        timestamp,
        co2_emissions: facility.co2_factor,
        energy_consumption: facility.energy_factor,
        throughput: facility.capacity * defaults::BASELINE_UTILISATION,
        temperature: defaults::BASELINE_TEMPERATURE,
        pressure: defaults::BASELINE_PRESSURE,
        vibration: defaults::NOMINAL_VIBRATION,
        efficiency: defaults::BASELINE_EFFICIENCY,
    }
}

/// Apply the fixed perturbation for `kind`.
pub fn inject_anomaly(sample: &PerformanceMetrics, kind: AnomalyKind) -> PerformanceMetrics {
    let mut out = sample.clone();
    match kind {
        AnomalyKind::Co2Spike => out.co2_emissions *= 1.35,
        AnomalyKind::EfficiencyDrop => out.efficiency *= 0.75,
        AnomalyKind::EnergySurge => out.energy_consumption *= 1.28,
        AnomalyKind::VibrationAlert => out.vibration = 12.5,
        AnomalyKind::PressureAnomaly => out.pressure *= 0.8,
        AnomalyKind::EquipmentDegradation => {
            out.efficiency *= 0.85;
            out.vibration *= 1.3;
        }
    }
    out
}

pub struct TelemetrySimulator {
    rng: StdRng,
    /// Shared relative noise, ±7.5%
    relative: Uniform<f64>,
    /// Symmetric unit interval, scaled per channel
    unit: Uniform<f64>,
    anomaly_rate: f64,
    samples_generated: u64,
    anomalies_injected: u64,
}

impl TelemetrySimulator {
    /// `anomaly_rate` is the per-sample injection probability, clamped to 0-1.
    pub fn new(seed: Option<u64>, anomaly_rate: f64) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let anomaly_rate = if anomaly_rate.is_finite() {
            anomaly_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            rng,
            relative: Uniform::new_inclusive(-0.075, 0.075),
            unit: Uniform::new_inclusive(-1.0, 1.0),
            anomaly_rate,
            samples_generated: 0,
            anomalies_injected: 0,
        }
    }

    /// Noisy sample around `baseline`. One relative draw drives every
    /// proportional channel, damped per channel.
    pub fn sample(&mut self, baseline: &PerformanceMetrics, timestamp: DateTime<Utc>) -> PerformanceMetrics {
        let noise = self.relative.sample(&mut self.rng);
        let temperature_offset = self.unit.sample(&mut self.rng) * 5.0;
        let vibration_offset = self.unit.sample(&mut self.rng);
        self.samples_generated += 1;

        PerformanceMetrics {
            facility_id: baseline.facility_id.clone(),
            timestamp,
            co2_emissions: baseline.co2_emissions * (1.0 + noise),
            energy_consumption: baseline.energy_consumption * (1.0 + noise * 0.8),
            throughput: baseline.throughput * (1.0 + noise * 0.5),
            temperature: baseline.temperature + temperature_offset,
            pressure: baseline.pressure * (1.0 + noise * 0.6),
            vibration: baseline.vibration + vibration_offset,
            efficiency: (baseline.efficiency * (1.0 + noise * 0.3)).clamp(0.7, 1.0),
        }
    }

    /// Sample plus a random injected anomaly at the configured rate.
    pub fn next_sample(
        &mut self,
        baseline: &PerformanceMetrics,
        timestamp: DateTime<Utc>,
    ) -> (PerformanceMetrics, Option<AnomalyKind>) {
        let sample = self.sample(baseline, timestamp);
        if !self.rng.gen_bool(self.anomaly_rate) {
            return (sample, None);
        }
        let kind = INJECTED_KINDS[self.rng.gen_range(0..INJECTED_KINDS.len())];
        self.anomalies_injected += 1;
        (inject_anomaly(&sample, kind), Some(kind))
    }

    pub fn samples_generated(&self) -> u64 {
        self.samples_generated
    }

    pub fn anomalies_injected(&self) -> u64 {
        self.anomalies_injected
    }
}
