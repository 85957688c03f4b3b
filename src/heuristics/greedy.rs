//! Greedy nearest-neighbor tour construction.
//!
//! Builds a tour by repeatedly visiting the nearest unvisited neighbor of
//! the current city. The heuristic performs no randomness and no
//! backtracking; a single wrong early choice cannot be corrected.

use crate::error::SolverError;
use crate::graph::Graph;
use crate::tour::Tour;
use std::collections::HashSet;

/// Nearest-neighbor construction heuristic.
///
/// Fails (rather than returning a partial route) when it gets stuck on a
/// city with no unvisited neighbor, or when the closing edge back to the
/// start is missing.
pub struct GreedyTourBuilder;

impl GreedyTourBuilder {
    pub fn new() -> Self {
        GreedyTourBuilder
    }

    /// Find the unvisited neighbor of `current` with minimum edge weight.
    /// Ties are broken by adjacency insertion order: the sort is stable, so
    /// the first minimum encountered wins and is not re-resolved.
    fn find_nearest(
        &self,
        graph: &Graph,
        current: &str,
        visited: &HashSet<String>,
    ) -> Option<(String, u32)> {
        let mut candidates: Vec<(String, u32)> = graph
            .neighbors(current)
            .iter()
            .filter(|(city, _)| !visited.contains(city))
            .cloned()
            .collect();

        if candidates.is_empty() {
            return None;
        }

        candidates.sort_by_key(|&(_, weight)| weight);
        Some(candidates.swap_remove(0))
    }

    /// Build a closed tour starting and ending at `start`.
    ///
    /// Deterministic given a fixed graph, a fixed starting city, and a
    /// fixed adjacency insertion order.
    pub fn build(&self, graph: &Graph, start: &str) -> Result<Tour, SolverError> {
        let begin = std::time::Instant::now();

        if !graph.cities().iter().any(|c| c == start) {
            return Err(SolverError::NoFeasibleTour {
                reason: format!("starting city {} is not in the graph", start),
            });
        }

        let mut route = vec![start.to_string()];
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(start.to_string());

        let mut current = start.to_string();
        let mut total_distance = 0u64;

        while visited.len() < graph.num_cities() {
            match self.find_nearest(graph, &current, &visited) {
                Some((next, weight)) => {
                    log::debug!("greedy: {} -> {} (distance {})", current, next, weight);
                    total_distance += weight as u64;
                    visited.insert(next.clone());
                    route.push(next.clone());
                    current = next;
                }
                None => {
                    return Err(SolverError::NoFeasibleTour {
                        reason: format!(
                            "stuck at {} with {} cities unvisited",
                            current,
                            graph.num_cities() - visited.len()
                        ),
                    });
                }
            }
        }

        // All cities visited; the cycle still has to close.
        let closing = graph
            .neighbors(&current)
            .iter()
            .find(|(city, _)| city == start);

        match closing {
            Some((_, weight)) => {
                log::debug!("greedy: closing {} -> {} (distance {})", current, start, weight);
                total_distance += *weight as u64;
                route.push(start.to_string());
            }
            None => {
                return Err(SolverError::NoFeasibleTour {
                    reason: format!("no closing edge from {} back to {}", current, start),
                });
            }
        }

        Ok(Tour {
            route,
            cost: total_distance,
            algorithm: "GreedyNearestNeighbor".to_string(),
            computation_time: begin.elapsed().as_secs_f64(),
            iterations: None,
        })
    }
}

impl Default for GreedyTourBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4-city complete graph with the weights from the reference scenario.
    fn four_city_graph() -> Graph {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("A", "C", 4);
        g.add_edge("A", "D", 3);
        g.add_edge("B", "C", 2);
        g.add_edge("B", "D", 5);
        g.add_edge("C", "D", 6);
        g
    }

    #[test]
    fn test_four_city_tour() {
        let g = four_city_graph();
        let tour = GreedyTourBuilder::new().build(&g, "A").unwrap();

        // A -> B (1) -> C (2) -> D (6), close D -> A (3).
        assert_eq!(tour.route, vec!["A", "B", "C", "D", "A"]);
        assert_eq!(tour.cost, 12);
        assert!(tour.is_closed_permutation());
    }

    #[test]
    fn test_deterministic() {
        let g = four_city_graph();
        let builder = GreedyTourBuilder::new();
        let first = builder.build(&g, "A").unwrap();
        let second = builder.build(&g, "A").unwrap();
        assert_eq!(first.route, second.route);
        assert_eq!(first.cost, second.cost);
    }

    #[test]
    fn test_disconnected_graph_fails() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("X", "Y", 2);

        let result = GreedyTourBuilder::new().build(&g, "A");
        match result {
            Err(SolverError::NoFeasibleTour { .. }) => {}
            other => panic!("expected NoFeasibleTour, got {:?}", other.map(|t| t.route)),
        }
    }

    #[test]
    fn test_missing_closing_edge_fails() {
        // Path graph: every city is reachable but the cycle cannot close.
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("B", "C", 2);

        let result = GreedyTourBuilder::new().build(&g, "A");
        assert!(matches!(result, Err(SolverError::NoFeasibleTour { .. })));
    }

    #[test]
    fn test_tie_break_by_insertion_order() {
        let mut g = Graph::new();
        // Two neighbors of A at equal distance; B was inserted first.
        g.add_edge("A", "B", 2);
        g.add_edge("A", "C", 2);
        g.add_edge("B", "C", 1);

        let tour = GreedyTourBuilder::new().build(&g, "A").unwrap();
        assert_eq!(tour.route, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_unknown_start_fails() {
        let g = four_city_graph();
        let result = GreedyTourBuilder::new().build(&g, "Z");
        assert!(matches!(result, Err(SolverError::NoFeasibleTour { .. })));
    }
}
