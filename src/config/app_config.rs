//! Engine Configuration - model constants and rule thresholds as TOML values
//!
//! Each struct implements `Default` with the reference model constants, so
//! behaviour is unchanged when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "ROUTEWISE_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "routewise.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub deployment: DeploymentInfo,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub anomaly: AnomalyThresholds,

    #[serde(default)]
    pub maintenance: MaintenanceConfig,

    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order:
    /// 1. `$ROUTEWISE_CONFIG`
    /// 2. `./routewise.toml`
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), deployment = %config.deployment.name, "Loaded config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(deployment = %config.deployment.name, "Loaded config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load and validate a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Unknown keys only warn; serde ignores them afterwards
        for w in &super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Validate every section, collecting all problems before failing.
    ///
    /// Rules:
    /// - Escalating severity thresholds must be ordered
    /// - Prices, scales and capacities must be positive
    /// - Weibull parameters must be positive
    /// - No NaN/Inf anywhere
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let a = &self.anomaly;
        Self::check_escalation(a.co2_spike_percent, a.co2_high_percent, "anomaly.co2 (spike -> high)", &mut errors);
        Self::check_escalation(a.co2_high_percent, a.co2_critical_percent, "anomaly.co2 (high -> critical)", &mut errors);
        Self::check_escalation(a.efficiency_drop_percent, a.efficiency_high_percent, "anomaly.efficiency", &mut errors);
        Self::check_escalation(a.energy_surge_percent, a.energy_high_percent, "anomaly.energy", &mut errors);
        Self::check_escalation(a.vibration_alert_mm_s, a.vibration_high_mm_s, "anomaly.vibration (alert -> high)", &mut errors);
        Self::check_escalation(a.vibration_high_mm_s, a.vibration_critical_mm_s, "anomaly.vibration (high -> critical)", &mut errors);
        Self::check_escalation(a.pressure_percent, a.pressure_high_percent, "anomaly.pressure", &mut errors);
        if a.nominal_vibration_mm_s <= 0.0 {
            errors.push("anomaly.nominal_vibration_mm_s must be > 0 (used as divisor)".to_string());
        }

        let m = &self.maintenance;
        if m.weibull_shape <= 0.0 {
            errors.push(format!("maintenance.weibull_shape ({:.2}) must be > 0", m.weibull_shape));
        }
        if m.weibull_scale_years <= 0.0 {
            errors.push(format!("maintenance.weibull_scale_years ({:.2}) must be > 0", m.weibull_scale_years));
        }
        if m.min_history == 0 {
            errors.push("maintenance.min_history must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&m.failure_probability_trigger) {
            errors.push(format!(
                "maintenance.failure_probability_trigger ({:.2}) must be within 0-1",
                m.failure_probability_trigger
            ));
        }

        if self.monitoring.history_capacity == 0 {
            errors.push("monitoring.history_capacity must be > 0".to_string());
        }
        if m.min_history > self.monitoring.history_capacity {
            errors.push(format!(
                "maintenance.min_history ({}) can never be reached with monitoring.history_capacity ({})",
                m.min_history, self.monitoring.history_capacity
            ));
        }

        let n = &self.network;
        if n.max_enumerated_paths == 0 {
            errors.push("network.max_enumerated_paths must be > 0".to_string());
        }
        if n.bounded_result_cap == 0 {
            errors.push("network.bounded_result_cap must be > 0".to_string());
        }
        if n.default_throughput < 0.0 {
            errors.push(format!("network.default_throughput ({:.1}) cannot be negative", n.default_throughput));
        }

        let s = &self.search;
        for (name, value) in [
            ("search.position_spacing", s.position_spacing),
            ("search.co2_scale", s.co2_scale),
            ("search.energy_scale", s.energy_scale),
            ("search.cost_scale", s.cost_scale),
        ] {
            if value <= 0.0 {
                errors.push(format!("{name} ({value}) must be > 0 (used as divisor)"));
            }
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        // Sweep all f64 fields via serialization
        if let Ok(value) = toml::Value::try_from(self) {
            if has_non_finite_float(&value) {
                errors.push("Config contains NaN or Inf values; all values must be finite numbers".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(lower: f64, upper: f64, name: &str, errors: &mut Vec<String>) {
        if !lower.is_finite() || !upper.is_finite() {
            errors.push(format!("{name}: values must be finite (got {lower}, {upper})"));
            return;
        }
        if upper < lower {
            errors.push(format!("{name}: escalation threshold ({upper:.3}) must be >= trigger ({lower:.3})"));
        }
    }
}

fn has_non_finite_float(value: &toml::Value) -> bool {
    match value {
        toml::Value::Float(f) => !f.is_finite(),
        toml::Value::Table(t) => t.values().any(has_non_finite_float),
        toml::Value::Array(a) => a.iter().any(has_non_finite_float),
        _ => false,
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Deployment Info
// ============================================================================

/// Identification metadata; appears in logs only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentInfo {
    #[serde(default = "default_deployment_name")]
    pub name: String,

    #[serde(default)]
    pub region: String,
}

fn default_deployment_name() -> String {
    "DEFAULT".to_string()
}

impl Default for DeploymentInfo {
    fn default() -> Self {
        Self {
            name: default_deployment_name(),
            region: String::new(),
        }
    }
}

// ============================================================================
// Network / Search
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Units/day used when a request does not specify throughput
    pub default_throughput: f64,
    /// Exhaustive enumeration stops after this many complete paths
    pub max_enumerated_paths: usize,
    /// Completed paths collected by the bounded best-first search
    pub bounded_result_cap: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_throughput: defaults::DEFAULT_THROUGHPUT,
            max_enumerated_paths: defaults::MAX_ENUMERATED_PATHS,
            bounded_result_cap: defaults::BOUNDED_RESULT_CAP,
        }
    }
}

/// Operating cost model prices
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub carbon_price_per_tonne: f64,
    pub electricity_price: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            carbon_price_per_tonne: defaults::CARBON_PRICE_PER_TONNE,
            electricity_price: defaults::ELECTRICITY_PRICE,
        }
    }
}

/// Bounded best-first search heuristic constants
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub avg_hop_co2: f64,
    pub avg_hop_energy: f64,
    pub avg_hop_cost: f64,
    pub position_spacing: f64,
    pub co2_scale: f64,
    pub energy_scale: f64,
    pub cost_scale: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            avg_hop_co2: defaults::AVG_HOP_CO2,
            avg_hop_energy: defaults::AVG_HOP_ENERGY,
            avg_hop_cost: defaults::AVG_HOP_COST,
            position_spacing: defaults::POSITION_SPACING,
            co2_scale: defaults::EDGE_CO2_SCALE,
            energy_scale: defaults::EDGE_ENERGY_SCALE,
            cost_scale: defaults::EDGE_COST_SCALE,
        }
    }
}

// ============================================================================
// Anomaly Rules
// ============================================================================

/// Trigger and escalation thresholds for the five deviation rules.
///
/// Percent values apply to |deviation from baseline|; the efficiency rule
/// fires on a drop of more than `efficiency_drop_percent`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    pub co2_spike_percent: f64,
    pub co2_high_percent: f64,
    pub co2_critical_percent: f64,
    pub efficiency_drop_percent: f64,
    pub efficiency_high_percent: f64,
    pub energy_surge_percent: f64,
    pub energy_high_percent: f64,
    pub vibration_alert_mm_s: f64,
    pub vibration_high_mm_s: f64,
    pub vibration_critical_mm_s: f64,
    pub nominal_vibration_mm_s: f64,
    pub pressure_percent: f64,
    pub pressure_high_percent: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            co2_spike_percent: 15.0,
            co2_high_percent: 20.0,
            co2_critical_percent: 30.0,
            efficiency_drop_percent: 10.0,
            efficiency_high_percent: 20.0,
            energy_surge_percent: 12.0,
            energy_high_percent: 25.0,
            vibration_alert_mm_s: 7.5,
            vibration_high_mm_s: 10.0,
            vibration_critical_mm_s: 15.0,
            nominal_vibration_mm_s: defaults::NOMINAL_VIBRATION,
            pressure_percent: 10.0,
            pressure_high_percent: 20.0,
        }
    }
}

// ============================================================================
// Maintenance / Monitoring
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub min_history: usize,
    pub weibull_shape: f64,
    pub weibull_scale_years: f64,
    pub failure_probability_trigger: f64,
    pub health_score_trigger: f64,
    pub default_install_year: i32,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            min_history: defaults::MIN_HISTORY_FOR_PREDICTION,
            weibull_shape: defaults::WEIBULL_SHAPE,
            weibull_scale_years: defaults::WEIBULL_SCALE_YEARS,
            failure_probability_trigger: 0.3,
            health_score_trigger: 0.6,
            default_install_year: defaults::DEFAULT_INSTALL_YEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub history_capacity: usize,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            history_capacity: defaults::HISTORY_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_escalation_is_rejected() {
        let mut config = AppConfig::default();
        config.anomaly.co2_critical_percent = 18.0;
        let err = config.validate().unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("high -> critical")), "{errors:?}");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn non_positive_weibull_parameters_are_rejected() {
        let mut config = AppConfig::default();
        config.maintenance.weibull_scale_years = 0.0;
        config.maintenance.weibull_shape = -1.0;
        let Err(ConfigError::Validation(errors)) = config.validate() else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.iter().filter(|e| e.contains("weibull")).count(), 2);
    }

    #[test]
    fn nan_values_are_rejected() {
        let mut config = AppConfig::default();
        config.pricing.electricity_price = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unreachable_min_history_is_rejected() {
        let mut config = AppConfig::default();
        config.monitoring.history_capacity = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let mut config = AppConfig::default();
        config.pricing.carbon_price_per_tonne = 80.0;
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert!((parsed.pricing.carbon_price_per_tonne - 80.0).abs() < 1e-9);
        assert_eq!(parsed.monitoring.history_capacity, 100);
    }
}
