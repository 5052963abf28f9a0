//! Route enumeration: exhaustive simple-path DFS and bounded best-first search
//!
//! Both searches aggregate per-unit figures along the path and scale them by
//! throughput when a route is emitted. The start facility's own factors are
//! not counted. Each traversed edge contributes its target facility's CO2 and
//! energy factors plus the edge's pipeline CO2 × distance.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, warn};

use super::{check_throughput, CostModel, FacilityGraph, NetworkError, NormalizedWeights};
use crate::config::SearchConfig;
use crate::types::{Connection, Route};

/// Result of exhaustive enumeration
#[derive(Debug, Clone, Default)]
pub struct EnumerationOutcome {
    /// Routes in discovery order
    pub routes: Vec<Route>,
    /// True when enumeration stopped at the path cap before exhausting the graph
    pub truncated: bool,
}

/// Path enumerator bound to one graph and one cost model.
#[derive(Debug, Clone, Copy)]
pub struct RouteEnumerator<'g> {
    graph: &'g FacilityGraph,
    cost: CostModel,
    max_paths: usize,
}

/// Per-unit totals accumulated along a partial path
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    co2: f64,
    energy: f64,
    distance: f64,
}

impl Totals {
    fn extend(self, graph: &FacilityGraph, conn: &Connection) -> Result<Self, NetworkError> {
        let target = graph.facility(&conn.to)?;
        Ok(Self {
            co2: self.co2 + target.co2_factor + conn.pipeline_co2_per_unit(),
            energy: self.energy + target.energy_factor,
            distance: self.distance + conn.distance,
        })
    }
}

/// Pending DFS frame. `path` is copied on branch so sibling branches never
/// share visited state.
struct Frame<'g> {
    node: &'g str,
    path: Vec<&'g str>,
    totals: Totals,
}

impl<'g> RouteEnumerator<'g> {
    pub fn new(graph: &'g FacilityGraph, cost: CostModel, max_paths: usize) -> Self {
        Self {
            graph,
            cost,
            max_paths: max_paths.max(1),
        }
    }

    fn check_endpoints(&self, start_id: &str, end_id: &str) -> Result<(), NetworkError> {
        self.graph.facility(start_id)?;
        self.graph.facility(end_id)?;
        Ok(())
    }

    fn build_route(&self, seq: usize, path: &[&str], totals: Totals, throughput: f64) -> Route {
        Route {
            id: format!("route-{seq}"),
            name: format!("Route {seq}"),
            path: path.iter().map(|s| (*s).to_string()).collect(),
            total_co2: totals.co2 * throughput,
            total_energy: totals.energy * throughput,
            total_distance: totals.distance,
            throughput,
            operating_cost: self.cost.route_cost(totals.co2, totals.energy, throughput),
        }
    }

    // ========================================================================
    // Exhaustive enumeration
    // ========================================================================

    /// Every simple path from `start_id` to `end_id`, in depth-first discovery
    /// order (outgoing edges visited in dataset order).
    ///
    /// Unreachable endpoints yield an empty outcome. `start == end` also yields
    /// nothing since a route needs at least two facilities.
    pub fn all_routes(
        &self,
        start_id: &str,
        end_id: &str,
        throughput: f64,
    ) -> Result<EnumerationOutcome, NetworkError> {
        check_throughput(throughput)?;
        self.check_endpoints(start_id, end_id)?;
        let mut outcome = EnumerationOutcome::default();
        if start_id == end_id {
            return Ok(outcome);
        }

        let start = self.graph.facility(start_id)?.id.as_str();
        let mut stack = vec![Frame {
            node: start,
            path: vec![start],
            totals: Totals::default(),
        }];

        while let Some(frame) = stack.pop() {
            if frame.node == end_id {
                if outcome.routes.len() >= self.max_paths {
                    outcome.truncated = true;
                    warn!(
                        start = start_id,
                        end = end_id,
                        cap = self.max_paths,
                        "Path enumeration cap reached, remaining paths skipped"
                    );
                    break;
                }
                let seq = outcome.routes.len() + 1;
                outcome
                    .routes
                    .push(self.build_route(seq, &frame.path, frame.totals, throughput));
                continue;
            }

            // Reverse push keeps pre-order identical to the recursive formulation
            for conn in self.graph.outgoing(frame.node).iter().rev() {
                let next = conn.to.as_str();
                if frame.path.contains(&next) {
                    continue;
                }
                let mut path = Vec::with_capacity(frame.path.len() + 1);
                path.extend_from_slice(&frame.path);
                path.push(next);
                stack.push(Frame {
                    node: next,
                    path,
                    totals: frame.totals.extend(self.graph, conn)?,
                });
            }
        }

        debug!(
            start = start_id,
            end = end_id,
            routes = outcome.routes.len(),
            truncated = outcome.truncated,
            "Exhaustive enumeration complete"
        );
        Ok(outcome)
    }

    // ========================================================================
    // Bounded best-first search
    // ========================================================================

    /// Best-first (A*-style) search that stops after `max_results` completed
    /// paths.
    ///
    /// Expanded facilities are closed for the rest of the search, so this is an
    /// approximation: it is neither guaranteed to return the lowest-cost paths
    /// nor the Pareto frontier. It trades that for bounded work on large graphs.
    /// The end facility is never closed and may be reached several times.
    pub fn bounded_routes(
        &self,
        start_id: &str,
        end_id: &str,
        weights: &NormalizedWeights,
        throughput: f64,
        max_results: usize,
        search: &SearchConfig,
    ) -> Result<Vec<Route>, NetworkError> {
        check_throughput(throughput)?;
        self.check_endpoints(start_id, end_id)?;
        let mut routes = Vec::new();
        if start_id == end_id || max_results == 0 {
            return Ok(routes);
        }

        let start = self.graph.facility(start_id)?.id.as_str();
        let h0 = self.heuristic(start, end_id, weights, search);

        let mut arena: Vec<SearchNode<'g>> = vec![SearchNode {
            id: start,
            path: vec![start],
            g: 0.0,
            totals: Totals::default(),
        }];
        let mut heap = BinaryHeap::new();
        let mut seq: u64 = 0;
        heap.push(OpenEntry { f: h0, seq, slot: 0 });
        // Live open-set entry per facility: (g, seq of the entry that owns it)
        let mut open: HashMap<&'g str, (f64, u64)> = HashMap::from([(start, (0.0, seq))]);
        let mut closed: HashSet<&'g str> = HashSet::new();
        let mut expanded = 0usize;

        while let Some(entry) = heap.pop() {
            let id = arena[entry.slot].id;
            // Skip entries superseded by a cheaper path to the same facility
            match open.get(id) {
                Some(&(_, live)) if live == entry.seq => {
                    open.remove(id);
                }
                _ => continue,
            }

            if id == end_id {
                let node = &arena[entry.slot];
                routes.push(self.build_route(routes.len() + 1, &node.path, node.totals, throughput));
                if routes.len() >= max_results {
                    break;
                }
                continue;
            }

            closed.insert(id);
            expanded += 1;
            let (g, totals, path) = {
                let node = &arena[entry.slot];
                (node.g, node.totals, node.path.clone())
            };

            for conn in self.graph.outgoing(id) {
                let next = conn.to.as_str();
                if closed.contains(next) {
                    continue;
                }
                let target = self.graph.facility(next)?;
                let co2_unit = target.co2_factor + conn.pipeline_co2_per_unit();
                let energy_unit = target.energy_factor;
                let cost_unit = self.cost.unit_cost(co2_unit, energy_unit);
                let step = (co2_unit / search.co2_scale) * weights.co2
                    + (cost_unit / search.cost_scale) * weights.cost
                    + (energy_unit / search.energy_scale) * weights.energy;
                let new_g = g + step;

                if let Some(&(existing_g, _)) = open.get(next) {
                    if new_g >= existing_g {
                        continue;
                    }
                }

                let mut next_path = path.clone();
                next_path.push(next);
                arena.push(SearchNode {
                    id: next,
                    path: next_path,
                    g: new_g,
                    totals: totals.extend(self.graph, conn)?,
                });
                seq += 1;
                open.insert(next, (new_g, seq));
                heap.push(OpenEntry {
                    f: new_g + self.heuristic(next, end_id, weights, search),
                    seq,
                    slot: arena.len() - 1,
                });
            }
        }

        debug!(
            start = start_id,
            end = end_id,
            routes = routes.len(),
            expanded,
            "Bounded search complete"
        );
        Ok(routes)
    }

    /// Remaining-cost estimate from the horizontal layout distance.
    ///
    /// Stage count ≈ |Δx| / spacing, each stage costing the configured
    /// per-hop averages. Facilities without a position estimate 0.
    fn heuristic(
        &self,
        current_id: &str,
        goal_id: &str,
        weights: &NormalizedWeights,
        search: &SearchConfig,
    ) -> f64 {
        let position = |id: &str| self.graph.facility(id).ok().and_then(|f| f.position);
        let (Some(current), Some(goal)) = (position(current_id), position(goal_id)) else {
            return 0.0;
        };
        let stages_remaining = (goal.x - current.x).abs() / search.position_spacing;
        stages_remaining
            * (search.avg_hop_co2 * weights.co2
                + search.avg_hop_cost * weights.cost
                + search.avg_hop_energy * weights.energy)
    }
}

struct SearchNode<'g> {
    id: &'g str,
    path: Vec<&'g str>,
    g: f64,
    totals: Totals,
}

/// Min-heap entry: lowest f first, earliest insertion on ties
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    seq: u64,
    slot: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
