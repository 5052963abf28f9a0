//! Route optimization types: Route, RouteScore, ObjectiveWeights, presets, savings

use serde::{Deserialize, Serialize};

// ============================================================================
// Objective Weights
// ============================================================================

/// Relative importance of each objective. Any non-negative reals; they are
/// normalized by their sum before scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ObjectiveWeights {
    pub co2: f64,
    pub cost: f64,
    pub energy: f64,
}

impl ObjectiveWeights {
    pub const fn new(co2: f64, cost: f64, energy: f64) -> Self {
        Self { co2, cost, energy }
    }

    pub fn sum(&self) -> f64 {
        self.co2 + self.cost + self.energy
    }
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self::new(0.5, 0.3, 0.2)
    }
}

/// Named weight vectors for the common questions operators ask
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationPreset {
    Co2,
    Cost,
    Energy,
    Balanced,
}

impl OptimizationPreset {
    pub const ALL: [OptimizationPreset; 4] = [
        OptimizationPreset::Co2,
        OptimizationPreset::Cost,
        OptimizationPreset::Energy,
        OptimizationPreset::Balanced,
    ];

    pub fn weights(&self) -> ObjectiveWeights {
        match self {
            OptimizationPreset::Co2 => ObjectiveWeights::new(1.0, 0.0, 0.0),
            OptimizationPreset::Cost => ObjectiveWeights::new(0.0, 1.0, 0.0),
            OptimizationPreset::Energy => ObjectiveWeights::new(0.0, 0.0, 1.0),
            OptimizationPreset::Balanced => ObjectiveWeights::new(0.4, 0.35, 0.25),
        }
    }
}

impl std::fmt::Display for OptimizationPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizationPreset::Co2 => write!(f, "co2"),
            OptimizationPreset::Cost => write!(f, "cost"),
            OptimizationPreset::Energy => write!(f, "energy"),
            OptimizationPreset::Balanced => write!(f, "balanced"),
        }
    }
}

impl std::str::FromStr for OptimizationPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "co2" => Ok(OptimizationPreset::Co2),
            "cost" => Ok(OptimizationPreset::Cost),
            "energy" => Ok(OptimizationPreset::Energy),
            "balanced" => Ok(OptimizationPreset::Balanced),
            other => Err(format!("unknown preset '{other}' (expected co2, cost, energy or balanced)")),
        }
    }
}

// ============================================================================
// Route
// ============================================================================

/// A concrete path through the network with aggregate metrics for one
/// throughput. Built fresh per optimization call, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: String,
    pub name: String,
    /// Facility ids, start first. Always at least two entries.
    pub path: Vec<String>,
    /// kg CO2 per day
    pub total_co2: f64,
    /// kWh per day
    pub total_energy: f64,
    /// km
    pub total_distance: f64,
    /// Units per day assumed for the aggregates
    pub throughput: f64,
    /// Currency per day
    pub operating_cost: f64,
}

impl Route {
    /// Whether the route passes through `facility_id` (endpoints included)
    pub fn visits(&self, facility_id: &str) -> bool {
        self.path.iter().any(|id| id == facility_id)
    }

    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// A route with its normalized sub-scores inside one candidate set.
///
/// Sub-scores are in [0, 1], higher is better, and only comparable with
/// other scores from the same set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteScore {
    pub route: Route,
    pub co2_score: f64,
    pub cost_score: f64,
    pub energy_score: f64,
    pub total_score: f64,
    pub is_pareto_optimal: bool,
}

// ============================================================================
// Savings
// ============================================================================

/// Savings of one route relative to the worst-ranked route of the same set
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteSavings {
    /// tonnes per day
    pub co2_saved: f64,
    /// MWh per day
    pub energy_saved: f64,
    /// currency per day
    pub cost_saved: f64,
    pub percent_co2_reduction: f64,
    pub percent_energy_reduction: f64,
    pub annual_co2_saved: f64,
    pub annual_energy_saved: f64,
    pub annual_cost_saved: f64,
}

/// Best route for one preset, as returned by a preset comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetOutcome {
    pub preset: OptimizationPreset,
    pub best: Option<RouteScore>,
    pub candidates: usize,
}
