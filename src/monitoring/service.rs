//! MonitoringService: one tick of record → detect → predict per facility

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{AnomalyDetector, MaintenancePredictor, MonitoringError, TelemetryHistory};
use crate::config::AppConfig;
use crate::types::{Anomaly, Facility, MaintenanceAlert, PerformanceMetrics, Route};

/// Everything one facility produced for one sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickReport {
    pub facility_id: String,
    pub timestamp: DateTime<Utc>,
    pub anomalies: Vec<Anomaly>,
    pub maintenance: Option<MaintenanceAlert>,
}

impl TickReport {
    pub fn is_quiet(&self) -> bool {
        self.anomalies.is_empty() && self.maintenance.is_none()
    }
}

/// Shared monitoring state. Construct once and share by reference or `Arc`.
#[derive(Debug)]
pub struct MonitoringService {
    history: TelemetryHistory,
    detector: AnomalyDetector,
    predictor: MaintenancePredictor,
    /// Facility id → names of registered routes through it
    route_index: RwLock<HashMap<String, Vec<String>>>,
}

impl Default for MonitoringService {
    fn default() -> Self {
        Self {
            history: TelemetryHistory::default(),
            detector: AnomalyDetector::default(),
            predictor: MaintenancePredictor::default(),
            route_index: RwLock::new(HashMap::new()),
        }
    }
}

impl MonitoringService {
    pub fn new(config: &AppConfig) -> Result<Self, MonitoringError> {
        Ok(Self {
            history: TelemetryHistory::new(config.monitoring.history_capacity),
            detector: AnomalyDetector::new(config.anomaly),
            predictor: MaintenancePredictor::new(config.maintenance)?,
            route_index: RwLock::new(HashMap::new()),
        })
    }

    pub fn history(&self) -> &TelemetryHistory {
        &self.history
    }

    pub fn set_baseline(&self, facility_id: &str, metrics: PerformanceMetrics) {
        debug!(facility = facility_id, "Baseline set");
        self.history.set_baseline(facility_id, metrics);
    }

    pub fn get_baseline(&self, facility_id: &str) -> Option<PerformanceMetrics> {
        self.history.baseline(facility_id)
    }

    /// Append to the sample's facility history. Samples carrying NaN or
    /// infinite channels are dropped; returns whether the sample was kept.
    pub fn record_sample(&self, sample: PerformanceMetrics) -> bool {
        if !sample.is_finite() {
            warn!(facility = %sample.facility_id, "Dropping sample with non-finite values");
            return false;
        }
        self.history.record(sample);
        true
    }

    /// Rule-based anomalies for `sample`; empty when the facility has no baseline.
    pub fn detect_anomalies(&self, sample: &PerformanceMetrics, facility: &Facility) -> Vec<Anomaly> {
        match self.history.baseline(&sample.facility_id) {
            Some(baseline) => self.detector.detect(sample, &baseline, facility),
            None => Vec::new(),
        }
    }

    /// Maintenance forecast; `None` without a baseline, with too little
    /// history, or when nothing triggers.
    pub fn predict_maintenance(
        &self,
        facility: &Facility,
        sample: &PerformanceMetrics,
    ) -> Option<MaintenanceAlert> {
        self.history.baseline(&facility.id)?;
        let history_len = self.history.len(&facility.id);
        self.predictor
            .predict(facility, sample, history_len, self.impacted_routes(&facility.id))
    }

    /// Replace the route index used to fill `impacted_routes` on alerts.
    pub fn register_routes(&self, routes: &[Route]) {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for route in routes {
            for facility_id in &route.path {
                let names = index.entry(facility_id.clone()).or_default();
                if !names.contains(&route.name) {
                    names.push(route.name.clone());
                }
            }
        }
        info!(routes = routes.len(), facilities = index.len(), "Route index updated");
        *self.route_index.write().unwrap_or_else(|e| {
            warn!("RwLock poisoned on route index write, recovering");
            e.into_inner()
        }) = index;
    }

    /// Names of registered routes passing through `facility_id`.
    pub fn impacted_routes(&self, facility_id: &str) -> Vec<String> {
        self.route_index
            .read()
            .unwrap_or_else(|e| {
                warn!("RwLock poisoned on route index read, recovering");
                e.into_inner()
            })
            .get(facility_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Record `sample`, then run detection and prediction against it.
    ///
    /// A rejected (non-finite) sample yields an empty report.
    pub fn evaluate(&self, facility: &Facility, sample: PerformanceMetrics) -> TickReport {
        let mut report = TickReport {
            facility_id: sample.facility_id.clone(),
            timestamp: sample.timestamp,
            anomalies: Vec::new(),
            maintenance: None,
        };
        if !self.record_sample(sample.clone()) {
            return report;
        }
        report.anomalies = self.detect_anomalies(&sample, facility);
        report.maintenance = self.predict_maintenance(facility, &sample);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnomalyKind, EquipmentInfo, FacilityCategory};
    use chrono::TimeZone;

    fn pump(install_year: i32) -> Facility {
        Facility {
            id: "pump-1".to_string(),
            name: "Pumping Station PS-01".to_string(),
            category: FacilityCategory::Pump,
            co2_factor: 5.2,
            energy_factor: 1.8,
            capacity: 30_000.0,
            position: None,
            equipment: Some(EquipmentInfo {
                install_year: Some(install_year),
                ..EquipmentInfo::default()
            }),
        }
    }

    fn sample(minute: u32) -> PerformanceMetrics {
        PerformanceMetrics {
            facility_id: "pump-1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, minute, 0).unwrap(),
            co2_emissions: 5.2,
            energy_consumption: 1.8,
            throughput: 21_000.0,
            temperature: 75.0,
            pressure: 25.0,
            vibration: 4.5,
            efficiency: 0.88,
        }
    }

    fn route(name: &str, path: &[&str]) -> Route {
        Route {
            id: name.to_lowercase(),
            name: name.to_string(),
            path: path.iter().map(|s| (*s).to_string()).collect(),
            total_co2: 1.0,
            total_energy: 1.0,
            total_distance: 1.0,
            throughput: 1.0,
            operating_cost: 1.0,
        }
    }

    #[test]
    fn missing_baseline_skips_everything() {
        let service = MonitoringService::default();
        let facility = pump(1990);
        for m in 0..20 {
            let report = service.evaluate(&facility, sample(m));
            assert!(report.is_quiet());
        }
        assert_eq!(service.history().len("pump-1"), 20, "samples are still recorded");
    }

    #[test]
    fn spike_detected_once_baseline_set() {
        let service = MonitoringService::default();
        let facility = pump(2024);
        service.set_baseline("pump-1", sample(0));
        let spiked = PerformanceMetrics {
            co2_emissions: 5.2 * 1.35,
            ..sample(1)
        };
        let report = service.evaluate(&facility, spiked);
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].kind, AnomalyKind::Co2Spike);
        assert!(report.maintenance.is_none(), "one sample is not enough history");
    }

    #[test]
    fn maintenance_alert_lists_impacted_routes() {
        let service = MonitoringService::default();
        let facility = pump(2000);
        service.set_baseline("pump-1", sample(0));
        service.register_routes(&[
            route("Route 1", &["wh-1", "pump-1", "exp-1"]),
            route("Route 2", &["wh-2", "exp-1"]),
            route("Route 3", &["wh-2", "pump-1", "exp-1"]),
        ]);

        let mut last = None;
        for m in 0..10 {
            last = service.evaluate(&facility, sample(m)).maintenance;
        }
        let alert = last.expect("25-year-old pump with 10 samples should alert");
        assert_eq!(alert.impacted_routes, vec!["Route 1".to_string(), "Route 3".to_string()]);
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let service = MonitoringService::default();
        let kept = service.record_sample(PerformanceMetrics {
            pressure: f64::NAN,
            ..sample(0)
        });
        assert!(!kept);
        assert_eq!(service.history().len("pump-1"), 0);
    }

    #[test]
    fn non_finite_sample_gives_empty_report_after_full_history() {
        let service = MonitoringService::default();
        let facility = pump(2024);
        service.set_baseline("pump-1", sample(0));
        for m in 0..12 {
            service.evaluate(&facility, sample(m));
        }

        let report = service.evaluate(&facility, PerformanceMetrics {
            efficiency: f64::NAN,
            ..sample(13)
        });
        assert!(report.is_quiet(), "NaN sample must not raise alerts: {report:?}");
        assert_eq!(report.facility_id, "pump-1");
        assert_eq!(service.history().len("pump-1"), 12);
    }

    #[test]
    fn service_is_shareable_across_threads() {
        let service = std::sync::Arc::new(MonitoringService::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = std::sync::Arc::clone(&service);
                std::thread::spawn(move || {
                    for m in 0..25 {
                        service.record_sample(sample(m));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(service.history().len("pump-1"), 100);
    }
}
