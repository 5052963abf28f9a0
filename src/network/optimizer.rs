//! RouteOptimizer: request-level entry point for route optimization

use rayon::prelude::*;
use tracing::{debug, info};

use super::{
    CostModel, FacilityGraph, MultiObjectiveScorer, NetworkError, NormalizedWeights, RouteEnumerator,
};
use crate::config::{self, defaults, AppConfig, NetworkConfig, SearchConfig};
use crate::types::{
    ObjectiveWeights, OptimizationPreset, PresetOutcome, Route, RouteSavings, RouteScore,
};

/// Weights used for the Pareto-only query
const PARETO_QUERY_WEIGHTS: ObjectiveWeights = ObjectiveWeights::new(
    defaults::PARETO_QUERY_WEIGHTS.0,
    defaults::PARETO_QUERY_WEIGHTS.1,
    defaults::PARETO_QUERY_WEIGHTS.2,
);

/// Owns a validated graph plus the pricing and search settings it is queried with.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct RouteOptimizer {
    graph: FacilityGraph,
    cost: CostModel,
    network: NetworkConfig,
    search: SearchConfig,
}

impl RouteOptimizer {
    /// Optimizer using the process-wide configuration.
    ///
    /// Only meaningful after `config::init()`; called earlier it pins the
    /// built-in defaults for the whole process. Libraries and tests should
    /// use `with_config`.
    pub fn new(graph: FacilityGraph) -> Self {
        Self::with_config(graph, config::get())
    }

    pub fn with_config(graph: FacilityGraph, config: &AppConfig) -> Self {
        Self {
            graph,
            cost: CostModel::new(&config.pricing),
            network: config.network.clone(),
            search: config.search,
        }
    }

    pub fn graph(&self) -> &FacilityGraph {
        &self.graph
    }

    pub fn default_throughput(&self) -> f64 {
        self.network.default_throughput
    }

    pub fn bounded_result_cap(&self) -> usize {
        self.network.bounded_result_cap
    }

    fn enumerator(&self) -> RouteEnumerator<'_> {
        RouteEnumerator::new(&self.graph, self.cost, self.network.max_enumerated_paths)
    }

    /// Every simple path from `start_id` to `end_id`, scored and ranked.
    ///
    /// Empty when the end is unreachable. Weights are validated before any
    /// enumeration happens.
    pub fn find_optimal_routes(
        &self,
        start_id: &str,
        end_id: &str,
        weights: ObjectiveWeights,
        throughput: f64,
    ) -> Result<Vec<RouteScore>, NetworkError> {
        let scorer = MultiObjectiveScorer::new(weights)?;
        let outcome = self.enumerator().all_routes(start_id, end_id, throughput)?;
        let candidates = outcome.routes.len();
        let ranked = scorer.score(outcome.routes);

        debug!(
            start = start_id,
            end = end_id,
            candidates,
            pareto = ranked.iter().filter(|s| s.is_pareto_optimal).count(),
            truncated = outcome.truncated,
            "Routes ranked"
        );
        Ok(ranked)
    }

    /// Bounded best-first search; at most `max_results` routes, unranked.
    pub fn find_bounded_routes(
        &self,
        start_id: &str,
        end_id: &str,
        weights: ObjectiveWeights,
        throughput: f64,
        max_results: usize,
    ) -> Result<Vec<Route>, NetworkError> {
        let weights = NormalizedWeights::try_from(weights)?;
        self.enumerator().bounded_routes(
            start_id,
            end_id,
            &weights,
            throughput,
            max_results,
            &self.search,
        )
    }

    pub fn routes_by_preset(
        &self,
        start_id: &str,
        end_id: &str,
        preset: OptimizationPreset,
        throughput: f64,
    ) -> Result<Vec<RouteScore>, NetworkError> {
        self.find_optimal_routes(start_id, end_id, preset.weights(), throughput)
    }

    /// Only the Pareto-optimal routes, ranked with near-equal weights.
    pub fn pareto_optimal_routes(
        &self,
        start_id: &str,
        end_id: &str,
        throughput: f64,
    ) -> Result<Vec<RouteScore>, NetworkError> {
        let mut ranked = self.find_optimal_routes(start_id, end_id, PARETO_QUERY_WEIGHTS, throughput)?;
        ranked.retain(|s| s.is_pareto_optimal);
        Ok(ranked)
    }

    /// Best route under each preset, evaluated in parallel.
    ///
    /// Output order follows `OptimizationPreset::ALL`.
    pub fn compare_presets(
        &self,
        start_id: &str,
        end_id: &str,
        throughput: f64,
    ) -> Result<Vec<PresetOutcome>, NetworkError> {
        let outcomes = OptimizationPreset::ALL
            .par_iter()
            .map(|&preset| {
                let ranked = self.routes_by_preset(start_id, end_id, preset, throughput)?;
                Ok(PresetOutcome {
                    preset,
                    candidates: ranked.len(),
                    best: ranked.into_iter().next(),
                })
            })
            .collect::<Result<Vec<_>, NetworkError>>()?;

        info!(
            start = start_id,
            end = end_id,
            presets = outcomes.len(),
            "Preset comparison complete"
        );
        Ok(outcomes)
    }

    /// Savings of `route` relative to the last (lowest-ranked) entry of `ranked`.
    ///
    /// CO2 and energy are reported in thousands (tonnes / MWh) per day and
    /// annualised over 365 days. Percentages are rounded to one decimal and
    /// are 0 when the reference value is 0. `None` when `ranked` is empty.
    pub fn calculate_savings(route: &Route, ranked: &[RouteScore]) -> Option<RouteSavings> {
        let worst = &ranked.last()?.route;
        let co2_saved = (worst.total_co2 - route.total_co2) / 1000.0;
        let energy_saved = (worst.total_energy - route.total_energy) / 1000.0;
        let cost_saved = worst.operating_cost - route.operating_cost;
        let days = defaults::DAYS_PER_YEAR;

        Some(RouteSavings {
            co2_saved,
            energy_saved,
            cost_saved,
            percent_co2_reduction: percent_reduction(worst.total_co2, route.total_co2),
            percent_energy_reduction: percent_reduction(worst.total_energy, route.total_energy),
            annual_co2_saved: co2_saved * days,
            annual_energy_saved: energy_saved * days,
            annual_cost_saved: cost_saved * days,
        })
    }
}

fn percent_reduction(reference: f64, value: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    let pct = (reference - value) / reference * 100.0;
    (pct * 10.0).round() / 10.0
}
