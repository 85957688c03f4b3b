//! Tour representation shared by both heuristics.
//!
//! A tour is a closed route: the first and last entries hold the same
//! starting city, and every other city appears exactly once in between.

use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A closed tour over the cities of a [`Graph`], with its total cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    /// The route as a sequence of city names (start ... start).
    pub route: Vec<String>,
    /// Total edge-weight cost of the route, including the closing edge.
    pub cost: u64,
    /// Algorithm that generated this tour.
    pub algorithm: String,
    /// Computation time in seconds.
    pub computation_time: f64,
    /// Number of generations/iterations (if applicable).
    pub iterations: Option<usize>,
}

/// Total edge-weight cost of a route: the sum of `distance` over every
/// consecutive pair. The closing edge is part of the route itself, so no
/// extra term is added. Sums into `u64` so sentinel weights cannot
/// overflow the total.
pub fn route_cost(graph: &Graph, route: &[String]) -> u64 {
    let mut total = 0u64;
    for pair in route.windows(2) {
        total += graph.distance(&pair[0], &pair[1]) as u64;
    }
    total
}

impl Tour {
    /// Create a tour from a closed route, computing its cost from the graph.
    pub fn from_route(graph: &Graph, route: Vec<String>, algorithm: &str) -> Self {
        let cost = route_cost(graph, &route);
        Tour {
            route,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Number of distinct cities on the route (the closing duplicate is
    /// not counted).
    pub fn num_cities(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    /// Check the closed-permutation invariant: the route starts and ends
    /// with the same city and visits every other city exactly once.
    pub fn is_closed_permutation(&self) -> bool {
        if self.route.len() < 2 {
            return false;
        }
        if self.route.first() != self.route.last() {
            return false;
        }
        let interior = &self.route[..self.route.len() - 1];
        let unique: HashSet<&String> = interior.iter().collect();
        unique.len() == interior.len()
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tour ({})", self.algorithm)?;
        writeln!(f, "  Cost: {}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Generations: {}", iter)?;
        }
        writeln!(f, "  Route: {}", self.route.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_route_cost_includes_closing_edge() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("B", "C", 2);
        g.add_edge("C", "A", 4);

        let tour = Tour::from_route(&g, route(&["A", "B", "C", "A"]), "test");
        assert_eq!(tour.cost, 1 + 2 + 4);
    }

    #[test]
    fn test_closed_permutation_invariant() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("B", "C", 2);
        g.add_edge("C", "A", 4);

        let valid = Tour::from_route(&g, route(&["A", "B", "C", "A"]), "test");
        assert!(valid.is_closed_permutation());

        let open = Tour::from_route(&g, route(&["A", "B", "C"]), "test");
        assert!(!open.is_closed_permutation());

        let repeated = Tour::from_route(&g, route(&["A", "B", "B", "A"]), "test");
        assert!(!repeated.is_closed_permutation());
    }

    #[test]
    fn test_num_cities() {
        let g = Graph::new();
        let tour = Tour::from_route(&g, route(&["A", "B", "C", "A"]), "test");
        assert_eq!(tour.num_cities(), 3);
    }
}
