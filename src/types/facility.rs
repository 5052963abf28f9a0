//! Facility network types: Facility, FacilityCategory, Connection

use serde::{Deserialize, Serialize};

// ============================================================================
// Facility Category
// ============================================================================

/// Processing role of a facility in the production chain.
///
/// Closed set. Every lookup table keyed by category matches on it
/// exhaustively, so a new variant must be wired into each table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    Wellhead,
    Separator,
    /// Gas-oil separation plant
    Gosp,
    Distillator,
    Pump,
    Export,
    /// Anything the dataset names that is not one of the above.
    /// Maintenance tables fall back to their generic defaults for it.
    #[default]
    #[serde(other)]
    Other,
}

impl FacilityCategory {
    /// Stable lowercase identifier (matches the serialized form)
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityCategory::Wellhead => "wellhead",
            FacilityCategory::Separator => "separator",
            FacilityCategory::Gosp => "gosp",
            FacilityCategory::Distillator => "distillator",
            FacilityCategory::Pump => "pump",
            FacilityCategory::Export => "export",
            FacilityCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacilityCategory::Wellhead => write!(f, "Wellhead"),
            FacilityCategory::Separator => write!(f, "Separator"),
            FacilityCategory::Gosp => write!(f, "GOSP"),
            FacilityCategory::Distillator => write!(f, "Distillator"),
            FacilityCategory::Pump => write!(f, "Pump"),
            FacilityCategory::Export => write!(f, "Export"),
            FacilityCategory::Other => write!(f, "Other"),
        }
    }
}

// ============================================================================
// Facility
// ============================================================================

/// Schematic layout position. Only `x` feeds the bounded-search heuristic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Optional equipment nameplate data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EquipmentInfo {
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub install_year: Option<i32>,
}

/// A processing facility (node of the network). Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub category: FacilityCategory,
    /// kg CO2 emitted per unit processed
    pub co2_factor: f64,
    /// kWh consumed per unit processed
    pub energy_factor: f64,
    /// Units per day
    pub capacity: f64,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub equipment: Option<EquipmentInfo>,
}

impl Facility {
    /// Install year from the equipment record, if one was supplied.
    pub fn install_year(&self) -> Option<i32> {
        self.equipment.as_ref().and_then(|e| e.install_year)
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Directed pipeline edge between two facilities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    pub id: String,
    pub from: String,
    pub to: String,
    /// km
    pub distance: f64,
    /// kg CO2 per unit per km
    pub pipeline_co2: f64,
}

impl Connection {
    /// Pipeline CO2 for moving one unit across this edge
    pub fn pipeline_co2_per_unit(&self) -> f64 {
        self.pipeline_co2 * self.distance
    }
}
