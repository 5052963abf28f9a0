//! Multi-objective scoring and Pareto annotation.
//!
//! Sub-scores are relative to the min/max of the candidate set they were
//! computed from and lose their meaning outside it.

use super::NetworkError;
use crate::types::{ObjectiveWeights, Route, RouteScore};

/// Objective weights rescaled to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedWeights {
    pub co2: f64,
    pub cost: f64,
    pub energy: f64,
}

impl TryFrom<ObjectiveWeights> for NormalizedWeights {
    type Error = NetworkError;

    fn try_from(w: ObjectiveWeights) -> Result<Self, Self::Error> {
        for (name, value) in [("co2", w.co2), ("cost", w.cost), ("energy", w.energy)] {
            if !value.is_finite() || value < 0.0 {
                return Err(NetworkError::InvalidWeights(format!(
                    "{name} weight must be finite and non-negative, got {value}"
                )));
            }
        }
        let sum = w.sum();
        if sum <= 0.0 {
            return Err(NetworkError::InvalidWeights(
                "at least one weight must be positive".to_string(),
            ));
        }
        Ok(Self {
            co2: w.co2 / sum,
            cost: w.cost / sum,
            energy: w.energy / sum,
        })
    }
}

/// Observed [min, max] of one objective across a candidate set
#[derive(Debug, Clone, Copy)]
struct Span {
    min: f64,
    max: f64,
}

impl Span {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |s, v| Self {
                min: s.min.min(v),
                max: s.max.max(v),
            },
        )
    }

    /// Lower raw value ⇒ higher score. Degenerate span normalizes to 0.
    fn inverted_score(self, value: f64) -> f64 {
        let range = self.max - self.min;
        let normalized = if range > 0.0 {
            (value - self.min) / range
        } else {
            0.0
        };
        1.0 - normalized
    }
}

/// Scores one candidate set against a fixed weight vector.
#[derive(Debug, Clone, Copy)]
pub struct MultiObjectiveScorer {
    weights: NormalizedWeights,
}

impl MultiObjectiveScorer {
    pub fn new(weights: ObjectiveWeights) -> Result<Self, NetworkError> {
        Ok(Self {
            weights: NormalizedWeights::try_from(weights)?,
        })
    }

    pub fn weights(&self) -> NormalizedWeights {
        self.weights
    }

    /// Score, Pareto-flag and rank `routes` (descending total score).
    ///
    /// The sort is stable: equal totals keep discovery order.
    pub fn score(&self, routes: Vec<Route>) -> Vec<RouteScore> {
        if routes.is_empty() {
            return Vec::new();
        }

        let co2 = Span::of(routes.iter().map(|r| r.total_co2));
        let cost = Span::of(routes.iter().map(|r| r.operating_cost));
        let energy = Span::of(routes.iter().map(|r| r.total_energy));
        let w = self.weights;

        let mut scored: Vec<RouteScore> = routes
            .into_iter()
            .map(|route| {
                let co2_score = co2.inverted_score(route.total_co2);
                let cost_score = cost.inverted_score(route.operating_cost);
                let energy_score = energy.inverted_score(route.total_energy);
                RouteScore {
                    total_score: co2_score * w.co2 + cost_score * w.cost + energy_score * w.energy,
                    co2_score,
                    cost_score,
                    energy_score,
                    is_pareto_optimal: false,
                    route,
                }
            })
            .collect();

        mark_pareto(&mut scored);
        scored.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        scored
    }
}

/// True when `b` is at least as good as `a` everywhere and strictly better somewhere.
fn dominates(b: &RouteScore, a: &RouteScore) -> bool {
    let pairs = [
        (b.co2_score, a.co2_score),
        (b.cost_score, a.cost_score),
        (b.energy_score, a.energy_score),
    ];
    pairs.iter().all(|(x, y)| x >= y) && pairs.iter().any(|(x, y)| x > y)
}

/// Pairwise O(n²) Pareto pass. Routes tied on all three sub-scores do not
/// dominate each other and both stay optimal.
pub(crate) fn mark_pareto(scores: &mut [RouteScore]) {
    let flags: Vec<bool> = scores
        .iter()
        .enumerate()
        .map(|(i, a)| {
            !scores
                .iter()
                .enumerate()
                .any(|(j, b)| i != j && dominates(b, a))
        })
        .collect();
    for (score, optimal) in scores.iter_mut().zip(flags) {
        score.is_pareto_optimal = optimal;
    }
}
