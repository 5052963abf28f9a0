//! Operating cost model: carbon price plus electricity price

use crate::config::PricingConfig;

/// `cost = co2_kg / 1000 × carbon_price + energy_kwh × electricity_price`
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    carbon_price_per_tonne: f64,
    electricity_price: f64,
}

impl CostModel {
    pub fn new(pricing: &PricingConfig) -> Self {
        Self {
            carbon_price_per_tonne: pricing.carbon_price_per_tonne,
            electricity_price: pricing.electricity_price,
        }
    }

    /// Cost of processing one unit with the given per-unit CO2 (kg) and energy (kWh).
    pub fn unit_cost(&self, co2_per_unit: f64, energy_per_unit: f64) -> f64 {
        (co2_per_unit / 1000.0) * self.carbon_price_per_tonne + energy_per_unit * self.electricity_price
    }

    /// Daily cost for a route carrying `throughput` units.
    pub fn route_cost(&self, co2_per_unit: f64, energy_per_unit: f64, throughput: f64) -> f64 {
        self.unit_cost(co2_per_unit, energy_per_unit) * throughput
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(&PricingConfig::default())
    }
}
