//! Maintenance forecast types: MaintenanceAlert, MaintenancePriority

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FacilityCategory;

/// Urgency of a maintenance intervention, least to most urgent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MaintenancePriority {
    Routine,
    Scheduled,
    Urgent,
    Emergency,
}

impl MaintenancePriority {
    /// Classify by forecast days until failure
    pub fn from_days_until_failure(days: u32) -> Self {
        if days < 7 {
            MaintenancePriority::Emergency
        } else if days < 30 {
            MaintenancePriority::Urgent
        } else if days < 90 {
            MaintenancePriority::Scheduled
        } else {
            MaintenancePriority::Routine
        }
    }

    /// Multiplier applied to the category base cost
    pub fn cost_multiplier(&self) -> f64 {
        match self {
            MaintenancePriority::Routine => 1.0,
            MaintenancePriority::Scheduled => 1.2,
            MaintenancePriority::Urgent => 1.8,
            MaintenancePriority::Emergency => 2.5,
        }
    }
}

impl std::fmt::Display for MaintenancePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaintenancePriority::Routine => write!(f, "ROUTINE"),
            MaintenancePriority::Scheduled => write!(f, "SCHEDULED"),
            MaintenancePriority::Urgent => write!(f, "URGENT"),
            MaintenancePriority::Emergency => write!(f, "EMERGENCY"),
        }
    }
}

/// Forecast of an upcoming equipment failure for one facility
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceAlert {
    pub id: String,
    pub facility_id: String,
    pub facility_name: String,
    pub category: FacilityCategory,
    pub priority: MaintenancePriority,
    pub predicted_failure_date: DateTime<Utc>,
    pub days_until_failure: u32,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub health_score: f64,
    pub failure_probability: f64,
    /// Hours
    pub estimated_downtime: f64,
    pub estimated_cost: f64,
    pub recommended_action: String,
    /// Names of the routes that pass through this facility
    pub impacted_routes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_bands_follow_day_thresholds() {
        assert_eq!(MaintenancePriority::from_days_until_failure(1), MaintenancePriority::Emergency);
        assert_eq!(MaintenancePriority::from_days_until_failure(6), MaintenancePriority::Emergency);
        assert_eq!(MaintenancePriority::from_days_until_failure(7), MaintenancePriority::Urgent);
        assert_eq!(MaintenancePriority::from_days_until_failure(29), MaintenancePriority::Urgent);
        assert_eq!(MaintenancePriority::from_days_until_failure(30), MaintenancePriority::Scheduled);
        assert_eq!(MaintenancePriority::from_days_until_failure(89), MaintenancePriority::Scheduled);
        assert_eq!(MaintenancePriority::from_days_until_failure(90), MaintenancePriority::Routine);
    }

    #[test]
    fn emergency_costs_most() {
        assert!(MaintenancePriority::Emergency.cost_multiplier() > MaintenancePriority::Urgent.cost_multiplier());
        assert!((MaintenancePriority::Routine.cost_multiplier() - 1.0).abs() < f64::EPSILON);
    }
}
