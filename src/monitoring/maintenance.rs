//! Predictive maintenance: health score, Weibull wear-out model, alert tables
//!
//! Failure probability uses the two-parameter Weibull CDF
//! `P = 1 − exp(−(age/scale)^shape)` from statrs; shape > 1 models wear-out.

use chrono::{DateTime, Datelike, Duration, Utc};
use statrs::distribution::{ContinuousCDF, Weibull};
use tracing::{debug, info, warn};

use super::MonitoringError;
use crate::config::{defaults, MaintenanceConfig};
use crate::types::{
    Facility, FacilityCategory, MaintenanceAlert, MaintenancePriority, PerformanceMetrics,
};

/// Nominal operating temperature (°C) for the temperature term
const NOMINAL_TEMPERATURE: f64 = 75.0;

/// Composite health in roughly [0, 1]:
/// `0.5·efficiency + 0.3·max(0, 1 − vibration/20) + 0.2·max(0, 1 − |T − 75|/50)`
pub fn health_score(sample: &PerformanceMetrics) -> f64 {
    let vibration = (1.0 - sample.vibration / 20.0).max(0.0);
    let temperature = (1.0 - (sample.temperature - NOMINAL_TEMPERATURE).abs() / 50.0).max(0.0);
    0.5 * sample.efficiency + 0.3 * vibration + 0.2 * temperature
}

// ============================================================================
// Reliability model
// ============================================================================

/// Weibull failure model over equipment age in years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReliabilityModel {
    shape: f64,
    scale: f64,
}

impl ReliabilityModel {
    pub fn new(shape: f64, scale: f64) -> Result<Self, MonitoringError> {
        let model = Self { shape, scale };
        if !(shape.is_finite() && scale.is_finite()) {
            return Err(MonitoringError::InvalidReliabilityModel { shape, scale });
        }
        model
            .distribution()
            .map(|_| model)
            .ok_or(MonitoringError::InvalidReliabilityModel { shape, scale })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn distribution(&self) -> Option<Weibull> {
        Weibull::new(self.shape, self.scale).ok()
    }

    /// Probability of failure by `age_years`; 0 for non-positive ages.
    pub fn failure_probability(&self, age_years: f64) -> f64 {
        if age_years <= 0.0 || age_years.is_nan() {
            return 0.0;
        }
        self.distribution().map_or(0.0, |d| d.cdf(age_years))
    }
}

impl Default for ReliabilityModel {
    fn default() -> Self {
        Self {
            shape: defaults::WEIBULL_SHAPE,
            scale: defaults::WEIBULL_SCALE_YEARS,
        }
    }
}

// ============================================================================
// Category tables
// ============================================================================

/// Downtime, cost and recommended actions for one facility category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaintenanceProfile {
    pub category: FacilityCategory,
    pub downtime_hours: f64,
    pub base_cost: f64,
}

impl MaintenanceProfile {
    pub fn for_category(category: FacilityCategory) -> Self {
        let (downtime_hours, base_cost) = match category {
            FacilityCategory::Wellhead => (8.0, 15_000.0),
            FacilityCategory::Separator => (16.0, 45_000.0),
            FacilityCategory::Gosp => (24.0, 120_000.0),
            FacilityCategory::Distillator => (48.0, 95_000.0),
            FacilityCategory::Pump => (12.0, 35_000.0),
            FacilityCategory::Export => (4.0, 25_000.0),
            FacilityCategory::Other => (12.0, 50_000.0),
        };
        Self {
            category,
            downtime_hours,
            base_cost,
        }
    }

    pub fn cost(&self, priority: MaintenancePriority) -> f64 {
        self.base_cost * priority.cost_multiplier()
    }

    pub fn action(&self, priority: MaintenancePriority) -> &'static str {
        use FacilityCategory as C;
        use MaintenancePriority as P;
        match (self.category, priority) {
            (C::Gosp, P::Routine) => "Scheduled inspection and filter replacement",
            (C::Gosp, P::Scheduled) => "Compressor overhaul and seal replacement",
            (C::Gosp, P::Urgent) => "Emergency shutdown for critical component repair",
            (C::Gosp, P::Emergency) => "Immediate equipment replacement required",
            (C::Distillator, P::Routine) => "Column cleaning and tray inspection",
            (C::Distillator, P::Scheduled) => "Reboiler tube bundle replacement",
            (C::Distillator, P::Urgent) => "Emergency leak repair and pressure testing",
            (C::Distillator, P::Emergency) => "Critical safety system failure - immediate shutdown",
            (C::Pump, P::Routine) => "Bearing lubrication and alignment check",
            (C::Pump, P::Scheduled) => "Impeller replacement and motor service",
            (C::Pump, P::Urgent) => "Seal failure repair",
            (C::Pump, P::Emergency) => "Catastrophic pump failure - immediate replacement",
            _ => "Comprehensive equipment inspection",
        }
    }
}

// ============================================================================
// Predictor
// ============================================================================

#[derive(Debug, Clone)]
pub struct MaintenancePredictor {
    config: MaintenanceConfig,
    reliability: ReliabilityModel,
}

impl Default for MaintenancePredictor {
    fn default() -> Self {
        Self {
            config: MaintenanceConfig::default(),
            reliability: ReliabilityModel::default(),
        }
    }
}

impl MaintenancePredictor {
    pub fn new(config: MaintenanceConfig) -> Result<Self, MonitoringError> {
        let reliability = ReliabilityModel::new(config.weibull_shape, config.weibull_scale_years)?;
        Ok(Self { config, reliability })
    }

    pub fn reliability(&self) -> &ReliabilityModel {
        &self.reliability
    }

    /// Equipment age in years at the sample's calendar year.
    pub fn equipment_age(&self, facility: &Facility, sample: &PerformanceMetrics) -> f64 {
        let installed = facility
            .install_year()
            .unwrap_or(self.config.default_install_year);
        f64::from(sample.timestamp.year() - installed)
    }

    /// Forecast for `facility` given its latest sample and history length.
    ///
    /// `None` when fewer than `min_history` samples exist, or when neither
    /// the failure-probability nor the health trigger fires.
    pub fn predict(
        &self,
        facility: &Facility,
        sample: &PerformanceMetrics,
        history_len: usize,
        impacted_routes: Vec<String>,
    ) -> Option<MaintenanceAlert> {
        if history_len < self.config.min_history {
            debug!(
                facility = %facility.id,
                history_len,
                required = self.config.min_history,
                "Not enough history for maintenance prediction"
            );
            return None;
        }

        let age = self.equipment_age(facility, sample);
        let health = health_score(sample);
        let probability = self.reliability.failure_probability(age);
        if !(health.is_finite() && probability.is_finite()) {
            warn!(
                facility = %facility.id,
                health,
                failure_probability = probability,
                "Non-finite maintenance inputs, skipping prediction"
            );
            return None;
        }

        if probability <= self.config.failure_probability_trigger
            && health >= self.config.health_score_trigger
        {
            return None;
        }

        let days = days_until_failure(probability, health);
        let priority = MaintenancePriority::from_days_until_failure(days);
        let profile = MaintenanceProfile::for_category(facility.category);
        let history_fraction = (history_len as f64 / defaults::HISTORY_CAPACITY as f64).min(1.0);

        info!(
            facility = %facility.id,
            %priority,
            days,
            health,
            failure_probability = probability,
            "Maintenance alert raised"
        );

        Some(MaintenanceAlert {
            id: format!("maint-{}-{}", sample.timestamp.timestamp_millis(), facility.id),
            facility_id: facility.id.clone(),
            facility_name: facility.name.clone(),
            category: facility.category,
            priority,
            predicted_failure_date: failure_date(sample.timestamp, days),
            days_until_failure: days,
            confidence: 0.6 * history_fraction + 0.4 * health,
            health_score: health,
            failure_probability: probability,
            estimated_downtime: profile.downtime_hours,
            estimated_cost: profile.cost(priority),
            recommended_action: profile.action(priority).to_string(),
            impacted_routes,
        })
    }
}

/// Sample time plus `days`, saturating at the latest representable instant.
fn failure_date(from: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|d| from.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `max(1, round(365 × (1 − p) × health))`
fn days_until_failure(probability: f64, health: f64) -> u32 {
    let raw = defaults::FORECAST_HORIZON_DAYS * (1.0 - probability) * health;
    // f64::max ignores NaN, so degenerate inputs land on 1
    raw.round().max(1.0).min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EquipmentInfo;
    use chrono::TimeZone;

    fn facility(category: FacilityCategory, install_year: Option<i32>) -> Facility {
        Facility {
            id: "f-1".to_string(),
            name: "Facility One".to_string(),
            category,
            co2_factor: 1.0,
            energy_factor: 1.0,
            capacity: 1000.0,
            position: None,
            equipment: install_year.map(|y| EquipmentInfo {
                manufacturer: None,
                model: None,
                install_year: Some(y),
            }),
        }
    }

    fn healthy_sample(year: i32) -> PerformanceMetrics {
        PerformanceMetrics {
            facility_id: "f-1".to_string(),
            timestamp: Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap(),
            co2_emissions: 10.0,
            energy_consumption: 2.0,
            throughput: 700.0,
            temperature: 75.0,
            pressure: 25.0,
            vibration: 4.5,
            efficiency: 0.9,
        }
    }

    #[test]
    fn health_score_of_nominal_sample() {
        let h = health_score(&healthy_sample(2025));
        // 0.45 + 0.3 × 0.775 + 0.2
        assert!((h - 0.8825).abs() < 1e-12);
    }

    #[test]
    fn health_terms_are_floored_at_zero() {
        let sample = PerformanceMetrics {
            vibration: 40.0,
            temperature: 200.0,
            efficiency: 0.5,
            ..healthy_sample(2025)
        };
        assert!((health_score(&sample) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn weibull_matches_closed_form() {
        let model = ReliabilityModel::default();
        let p = model.failure_probability(20.0);
        let expected = 1.0 - (-(20.0_f64 / 15.0).powf(2.5)).exp();
        assert!((p - expected).abs() < 1e-9);
        assert!(p > 0.8);
        assert!(model.failure_probability(0.0).abs() < f64::EPSILON);
        assert!(model.failure_probability(-3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_weibull_parameters_rejected() {
        assert!(ReliabilityModel::new(0.0, 15.0).is_err());
        assert!(ReliabilityModel::new(2.5, f64::NAN).is_err());
    }

    #[test]
    fn insufficient_history_gives_no_alert() {
        let predictor = MaintenancePredictor::default();
        let old = facility(FacilityCategory::Pump, Some(1990));
        assert!(predictor.predict(&old, &healthy_sample(2025), 9, vec![]).is_none());
    }

    #[test]
    fn healthy_young_equipment_gives_no_alert() {
        let predictor = MaintenancePredictor::default();
        let young = facility(FacilityCategory::Pump, Some(2022));
        assert!(predictor.predict(&young, &healthy_sample(2025), 50, vec![]).is_none());
    }

    #[test]
    fn old_equipment_triggers_on_probability() {
        let predictor = MaintenancePredictor::default();
        let old = facility(FacilityCategory::Gosp, Some(2005));
        let sample = healthy_sample(2025);
        let alert = predictor
            .predict(&old, &sample, 100, vec!["Route 1".to_string()])
            .expect("20-year-old equipment should alert");

        let h = health_score(&sample);
        let p = predictor.reliability().failure_probability(20.0);
        let expected_days = (365.0 * (1.0 - p) * h).round() as u32;
        assert_eq!(alert.days_until_failure, expected_days.max(1));
        assert_eq!(
            alert.priority,
            MaintenancePriority::from_days_until_failure(alert.days_until_failure)
        );
        assert_eq!(
            alert.predicted_failure_date,
            sample.timestamp + Duration::days(i64::from(alert.days_until_failure))
        );
        assert!((alert.confidence - (0.6 + 0.4 * h)).abs() < 1e-12);
        assert!((alert.estimated_downtime - 24.0).abs() < f64::EPSILON);
        assert_eq!(alert.impacted_routes, vec!["Route 1".to_string()]);
        assert!(alert.id.starts_with("maint-") && alert.id.ends_with("-f-1"));
    }

    #[test]
    fn poor_health_triggers_without_age() {
        let predictor = MaintenancePredictor::default();
        let new = facility(FacilityCategory::Separator, Some(2025));
        let sample = PerformanceMetrics {
            efficiency: 0.3,
            vibration: 14.0,
            ..healthy_sample(2025)
        };
        let alert = predictor.predict(&new, &sample, 10, vec![]).unwrap();
        assert!(alert.failure_probability.abs() < f64::EPSILON);
        assert!(alert.health_score < 0.6);
        assert!((alert.confidence - (0.6 * 0.1 + 0.4 * alert.health_score)).abs() < 1e-12);
    }

    #[test]
    fn missing_install_year_uses_default() {
        let predictor = MaintenancePredictor::default();
        let f = facility(FacilityCategory::Export, None);
        assert!((predictor.equipment_age(&f, &healthy_sample(2030)) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn days_until_failure_floor_is_one() {
        assert_eq!(days_until_failure(0.999_999, 0.1), 1);
        assert_eq!(days_until_failure(0.0, 1.0), 365);
    }

    #[test]
    fn category_tables_and_fallback() {
        let gosp = MaintenanceProfile::for_category(FacilityCategory::Gosp);
        assert!((gosp.cost(MaintenancePriority::Emergency) - 300_000.0).abs() < 1e-6);
        assert_eq!(
            gosp.action(MaintenancePriority::Scheduled),
            "Compressor overhaul and seal replacement"
        );

        let other = MaintenanceProfile::for_category(FacilityCategory::Other);
        assert!((other.downtime_hours - 12.0).abs() < f64::EPSILON);
        assert!((other.base_cost - 50_000.0).abs() < f64::EPSILON);
        assert_eq!(
            other.action(MaintenancePriority::Urgent),
            "Comprehensive equipment inspection"
        );

        let wellhead = MaintenanceProfile::for_category(FacilityCategory::Wellhead);
        assert_eq!(
            wellhead.action(MaintenancePriority::Routine),
            "Comprehensive equipment inspection"
        );
    }

    #[test]
    fn non_finite_health_gives_no_alert() {
        let predictor = MaintenancePredictor::default();
        let old = facility(FacilityCategory::Pump, Some(1990));
        let sample = PerformanceMetrics {
            efficiency: f64::NAN,
            ..healthy_sample(2025)
        };
        assert!(predictor.predict(&old, &sample, 50, vec![]).is_none());
    }

    #[test]
    fn huge_efficiency_saturates_failure_date() {
        let predictor = MaintenancePredictor::default();
        let old = facility(FacilityCategory::Pump, Some(1990));
        let sample = PerformanceMetrics {
            efficiency: 1e12,
            ..healthy_sample(2025)
        };
        let alert = predictor
            .predict(&old, &sample, 50, vec![])
            .expect("35-year-old pump exceeds the probability trigger");
        assert_eq!(alert.predicted_failure_date, DateTime::<Utc>::MAX_UTC);
        assert_eq!(alert.priority, MaintenancePriority::Routine);
    }

    #[test]
    fn failure_date_adds_whole_days() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            failure_date(from, 31),
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
        );
    }
}
