//! Config validation: unknown-key detection with Levenshtein suggestions
//! and plausibility range checks.
//!
//! Unknown keys are found by walking the raw `toml::Value` tree before serde
//! deserialization (which silently ignores them). They only ever warn.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path for `AppConfig`.
///
/// Maintained by hand alongside the structs in `app_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [deployment]
        "deployment",
        "deployment.name",
        "deployment.region",
        // [network]
        "network",
        "network.default_throughput",
        "network.max_enumerated_paths",
        "network.bounded_result_cap",
        // [pricing]
        "pricing",
        "pricing.carbon_price_per_tonne",
        "pricing.electricity_price",
        // [search]
        "search",
        "search.avg_hop_co2",
        "search.avg_hop_energy",
        "search.avg_hop_cost",
        "search.position_spacing",
        "search.co2_scale",
        "search.energy_scale",
        "search.cost_scale",
        // [anomaly]
        "anomaly",
        "anomaly.co2_spike_percent",
        "anomaly.co2_high_percent",
        "anomaly.co2_critical_percent",
        "anomaly.efficiency_drop_percent",
        "anomaly.efficiency_high_percent",
        "anomaly.energy_surge_percent",
        "anomaly.energy_high_percent",
        "anomaly.vibration_alert_mm_s",
        "anomaly.vibration_high_mm_s",
        "anomaly.vibration_critical_mm_s",
        "anomaly.nominal_vibration_mm_s",
        "anomaly.pressure_percent",
        "anomaly.pressure_high_percent",
        // [maintenance]
        "maintenance",
        "maintenance.min_history",
        "maintenance.weibull_shape",
        "maintenance.weibull_scale_years",
        "maintenance.failure_probability_trigger",
        "maintenance.health_score_trigger",
        "maintenance.default_install_year",
        // [monitoring]
        "monitoring",
        "monitoring.history_capacity",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest known key within edit distance 3, if any.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        // Ties resolve alphabetically so suggestions are stable across runs
        let better = match best {
            None => true,
            Some((best_key, best_dist)) => dist < best_dist || (dist == best_dist && k < best_key),
        };
        if better {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors surface from serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Plausibility Range Validation
// ============================================================================

/// Range checks on a parsed `AppConfig`.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent startup; warnings are suspicious but allowed.
pub fn validate_physical_ranges(
    config: &super::AppConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let p = &config.pricing;
    if p.carbon_price_per_tonne < 0.0 {
        errors.push(format!(
            "pricing.carbon_price_per_tonne = {:.2} cannot be negative",
            p.carbon_price_per_tonne
        ));
    }
    if p.electricity_price < 0.0 {
        errors.push(format!(
            "pricing.electricity_price = {:.3} cannot be negative",
            p.electricity_price
        ));
    }

    let h = config.maintenance.health_score_trigger;
    if !(0.0..=1.0).contains(&h) {
        errors.push(format!(
            "maintenance.health_score_trigger = {h:.2} is outside the health score range (0-1)"
        ));
    }

    // Carbon markets have traded between roughly 1 and 200 per tonne
    if p.carbon_price_per_tonne > 500.0 {
        warnings.push(ValidationWarning {
            field: "pricing.carbon_price_per_tonne".to_string(),
            message: format!(
                "carbon_price_per_tonne = {:.1} is far above typical market prices (0-500)",
                p.carbon_price_per_tonne
            ),
            suggestion: None,
        });
    }

    let year = config.maintenance.default_install_year;
    if !(1900..=2100).contains(&year) {
        warnings.push(ValidationWarning {
            field: "maintenance.default_install_year".to_string(),
            message: format!("default_install_year = {year} looks implausible (1900-2100)"),
            suggestion: None,
        });
    }

    if config.network.max_enumerated_paths > 1_000_000 {
        warnings.push(ValidationWarning {
            field: "network.max_enumerated_paths".to_string(),
            message: format!(
                "max_enumerated_paths = {} may block for a long time on dense networks",
                config.network.max_enumerated_paths
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
