//! System-wide default constants.
//!
//! The `Default` impls in `app_config` read from here so the model constants
//! live in one place. Grouped by subsystem.

// ============================================================================
// Route Optimization
// ============================================================================

/// Throughput assumed when a request does not supply one (units/day).
pub const DEFAULT_THROUGHPUT: f64 = 5_000.0;

/// Hard stop for exhaustive path enumeration.
///
/// Enumeration is exponential in branching factor; the reference networks
/// have tens of nodes and stay far below this.
pub const MAX_ENUMERATED_PATHS: usize = 10_000;

/// Completed paths collected by the bounded best-first search.
pub const BOUNDED_RESULT_CAP: usize = 5;

/// Weights used when querying the Pareto frontier alone.
pub const PARETO_QUERY_WEIGHTS: (f64, f64, f64) = (0.33, 0.33, 0.34);

/// Days per year used to annualise savings.
pub const DAYS_PER_YEAR: f64 = 365.0;

// ============================================================================
// Operating Cost Model
// ============================================================================

/// Carbon price (currency per tonne CO2).
pub const CARBON_PRICE_PER_TONNE: f64 = 25.0;

/// Electricity price (currency per kWh).
pub const ELECTRICITY_PRICE: f64 = 0.12;

// ============================================================================
// Bounded Search Heuristic
// ============================================================================

/// Average per-hop CO2 (kg/unit) assumed for unexplored hops.
pub const AVG_HOP_CO2: f64 = 15.0;

/// Average per-hop energy (kWh/unit) assumed for unexplored hops.
pub const AVG_HOP_ENERGY: f64 = 4.0;

/// Average per-hop cost (currency/unit) assumed for unexplored hops.
pub const AVG_HOP_COST: f64 = 3.0;

/// Layout distance between consecutive processing stages.
///
/// `hops_remaining ≈ |goal.x - current.x| / POSITION_SPACING`
pub const POSITION_SPACING: f64 = 200.0;

/// Edge CO2 normaliser for the step score.
pub const EDGE_CO2_SCALE: f64 = 100.0;

/// Edge energy normaliser for the step score.
pub const EDGE_ENERGY_SCALE: f64 = 20.0;

/// Edge cost normaliser for the step score.
pub const EDGE_COST_SCALE: f64 = 5.0;

// ============================================================================
// Monitoring
// ============================================================================

/// Samples retained per facility (FIFO eviction beyond this).
pub const HISTORY_CAPACITY: usize = 100;

/// Samples required before a maintenance forecast is attempted.
pub const MIN_HISTORY_FOR_PREDICTION: usize = 10;

/// Vibration level (mm/s) reported as the expected value for vibration alerts.
pub const NOMINAL_VIBRATION: f64 = 4.5;

// ============================================================================
// Reliability Model
// ============================================================================

/// Weibull shape (β > 1: wear-out failures).
pub const WEIBULL_SHAPE: f64 = 2.5;

/// Weibull scale (η, years).
pub const WEIBULL_SCALE_YEARS: f64 = 15.0;

/// Install year assumed when the equipment record has none.
pub const DEFAULT_INSTALL_YEAR: i32 = 2015;

/// Forecast horizon the remaining-life estimate is scaled from (days).
pub const FORECAST_HORIZON_DAYS: f64 = 365.0;

// ============================================================================
// Simulation
// ============================================================================

/// Fraction of nameplate capacity used as baseline throughput.
pub const BASELINE_UTILISATION: f64 = 0.7;

/// Baseline operating temperature (°C).
pub const BASELINE_TEMPERATURE: f64 = 75.0;

/// Baseline operating pressure (bar).
pub const BASELINE_PRESSURE: f64 = 25.0;

/// Baseline process efficiency.
pub const BASELINE_EFFICIENCY: f64 = 0.88;
