//! Monitoring Pipeline Integration Tests
//!
//! Drives `MonitoringService` tick by tick over the reference network with
//! simulated telemetry, the way the `monitor` command does.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use routewise::config::AppConfig;
use routewise::monitoring::{health_score, ReliabilityModel};
use routewise::simulation::{default_baseline, inject_anomaly, TelemetrySimulator};
use routewise::{
    AnomalyKind, Dataset, Facility, MaintenancePriority, MonitoringError, MonitoringService,
    ObjectiveWeights, PerformanceMetrics, RouteOptimizer, Severity,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

fn reference_facilities() -> Vec<Facility> {
    Dataset::reference().unwrap().facilities
}

fn facility(id: &str) -> Facility {
    reference_facilities().into_iter().find(|f| f.id == id).unwrap()
}

fn service_with_baselines(facilities: &[Facility]) -> MonitoringService {
    let service = MonitoringService::new(&AppConfig::default()).unwrap();
    for f in facilities {
        service.set_baseline(&f.id, default_baseline(f, start()));
    }
    service
}

#[test]
fn quiet_simulation_produces_no_anomalies() {
    let facilities = reference_facilities();
    let service = service_with_baselines(&facilities);
    let mut sim = TelemetrySimulator::new(Some(11), 0.0);

    for tick in 1..=30 {
        let ts = start() + Duration::minutes(tick);
        for f in &facilities {
            let baseline = service.get_baseline(&f.id).unwrap();
            let report = service.evaluate(f, sim.sample(&baseline, ts));
            assert!(report.anomalies.is_empty(), "unexpected anomaly at {}: {:?}", f.id, report.anomalies);
        }
    }
    for f in &facilities {
        assert_eq!(service.history().len(&f.id), 30);
    }
}

#[test]
fn injected_anomalies_are_detected_with_expected_severity() {
    let gosp = facility("gosp-1");
    let service = service_with_baselines(std::slice::from_ref(&gosp));
    let baseline = service.get_baseline("gosp-1").unwrap();

    let cases = [
        (AnomalyKind::Co2Spike, Severity::Critical),
        (AnomalyKind::EfficiencyDrop, Severity::High),
        (AnomalyKind::EnergySurge, Severity::High),
        (AnomalyKind::VibrationAlert, Severity::High),
        (AnomalyKind::PressureAnomaly, Severity::Medium),
    ];
    for (kind, severity) in cases {
        let sample = inject_anomaly(&baseline, kind);
        let found = service.detect_anomalies(&sample, &gosp);
        assert_eq!(found.len(), 1, "{kind} should raise exactly one anomaly");
        assert_eq!(found[0].kind, kind);
        assert_eq!(found[0].severity, severity, "{kind}");
    }
}

#[test]
fn degradation_lowers_health_without_a_matching_rule() {
    let pump = facility("pump-1");
    let baseline = default_baseline(&pump, start());
    let degraded = inject_anomaly(&baseline, AnomalyKind::EquipmentDegradation);
    assert!(health_score(&degraded) < health_score(&baseline));

    let service = service_with_baselines(std::slice::from_ref(&pump));
    // 5.85 mm/s vibration and a 15% efficiency loss: only the efficiency rule fires
    let kinds: Vec<_> = service
        .detect_anomalies(&degraded, &pump)
        .into_iter()
        .map(|a| a.kind)
        .collect();
    assert_eq!(kinds, vec![AnomalyKind::EfficiencyDrop]);
}

#[test]
fn maintenance_needs_ten_samples() {
    // No install year → 2015; by 2025 the pump is 10 years old (P ≈ 0.30)
    let dist = facility("dist-1");
    let service = service_with_baselines(std::slice::from_ref(&dist));
    let baseline = service.get_baseline("dist-1").unwrap();
    let worn = PerformanceMetrics {
        efficiency: 0.4,
        vibration: 9.0,
        ..baseline
    };

    for i in 1..10 {
        let report = service.evaluate(&dist, PerformanceMetrics {
            timestamp: start() + Duration::minutes(i),
            ..worn.clone()
        });
        assert!(report.maintenance.is_none(), "sample {i}: too little history");
    }
    let report = service.evaluate(&dist, PerformanceMetrics {
        timestamp: start() + Duration::minutes(10),
        ..worn
    });
    let alert = report.maintenance.expect("10th sample should produce an alert");
    assert_eq!(alert.facility_id, "dist-1");
    assert!(alert.health_score < 0.6);
    assert!((alert.estimated_downtime - 48.0).abs() < f64::EPSILON);
    assert_eq!(
        alert.priority,
        MaintenancePriority::from_days_until_failure(alert.days_until_failure)
    );
    assert!((alert.estimated_cost - 95_000.0 * alert.priority.cost_multiplier()).abs() < 1e-6);
    assert!(alert.confidence > 0.0 && alert.confidence <= 1.0);
}

#[test]
fn alert_impacted_routes_come_from_registered_optimization() {
    let dataset = Dataset::reference().unwrap();
    let facilities = dataset.facilities.clone();
    let optimizer = RouteOptimizer::with_config(dataset.into_graph().unwrap(), &AppConfig::default());
    let ranked = optimizer
        .find_optimal_routes("wh-1", "exp-1", ObjectiveWeights::default(), 5_000.0)
        .unwrap();
    let routes: Vec<_> = ranked.into_iter().map(|s| s.route).collect();

    let service = service_with_baselines(&facilities);
    service.register_routes(&routes);

    let gosp2 = facilities.iter().find(|f| f.id == "gosp-2").unwrap();
    let mut impacted = service.impacted_routes("gosp-2");
    impacted.sort();
    assert_eq!(impacted, vec!["Route 2".to_string(), "Route 3".to_string()]);
    assert_eq!(service.impacted_routes("exp-1").len(), 4);
    assert!(service.impacted_routes("wh-2").is_empty());

    // Poor health forces an alert regardless of age
    let baseline = service.get_baseline("gosp-2").unwrap();
    let mut alert = None;
    for i in 0..10 {
        alert = service
            .evaluate(gosp2, PerformanceMetrics {
                timestamp: start() + Duration::minutes(i),
                efficiency: 0.3,
                ..baseline.clone()
            })
            .maintenance;
    }
    let mut names = alert.unwrap().impacted_routes;
    names.sort();
    assert_eq!(names, vec!["Route 2".to_string(), "Route 3".to_string()]);
}

#[test]
fn history_window_is_bounded_at_one_hundred() {
    let pump = facility("pump-1");
    let service = service_with_baselines(std::slice::from_ref(&pump));
    let mut sim = TelemetrySimulator::new(Some(3), 0.3);
    let baseline = service.get_baseline("pump-1").unwrap();
    for i in 0..250 {
        let (sample, _) = sim.next_sample(&baseline, start() + Duration::seconds(i));
        service.record_sample(sample);
    }
    let snapshot = service.history().snapshot("pump-1");
    assert_eq!(snapshot.len(), 100);
    assert_eq!(snapshot[0].timestamp, start() + Duration::seconds(150));
    assert_eq!(snapshot[99].timestamp, start() + Duration::seconds(249));
}

#[test]
fn concurrent_ticks_on_distinct_facilities() {
    let facilities = reference_facilities();
    let service = Arc::new(service_with_baselines(&facilities));

    let handles: Vec<_> = facilities
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, f)| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                let mut sim = TelemetrySimulator::new(Some(i as u64), 0.2);
                let baseline = service.get_baseline(&f.id).unwrap();
                for t in 0..40 {
                    let (sample, _) = sim.next_sample(&baseline, start() + Duration::minutes(t));
                    service.evaluate(&f, sample);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    for f in &facilities {
        assert_eq!(service.history().len(&f.id), 40);
    }
}

#[test]
fn invalid_reliability_config_is_rejected() {
    let mut config = AppConfig::default();
    config.maintenance.weibull_shape = -1.0;
    assert!(matches!(
        MonitoringService::new(&config),
        Err(MonitoringError::InvalidReliabilityModel { .. })
    ));
}

#[test]
fn twenty_year_old_equipment_exceeds_trigger() {
    let model = ReliabilityModel::default();
    let p = model.failure_probability(20.0);
    assert!(p > 0.3);
    assert!((p - (1.0 - (-(20.0_f64 / 15.0).powf(2.5)).exp())).abs() < 1e-9);
}
