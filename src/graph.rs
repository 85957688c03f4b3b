//! Weighted undirected city graph.
//!
//! This module provides the adjacency structure both heuristics operate on.
//! Cities are identified by name; edges are stored as append-only adjacency
//! lists so the graph behaves as a multigraph under repeated insertion.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Sentinel distance returned when two cities have no direct edge.
pub const UNREACHABLE: u32 = u32::MAX;

/// A weighted undirected graph over named cities.
///
/// Adjacency is symmetric: every `add_edge(a, b, w)` records both `a -> b`
/// and `b -> a`. Duplicate edges between the same pair are kept as separate
/// records; `distance` returns the first match, so only the first inserted
/// weight for a pair is externally visible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    /// City names in insertion order.
    order: Vec<String>,
    /// Adjacency lists: city -> [(neighbor, weight)].
    adjacency: HashMap<String, Vec<(String, u32)>>,
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            order: Vec::new(),
            adjacency: HashMap::new(),
        }
    }

    /// Insert an isolated city if absent. Idempotent.
    pub fn add_city(&mut self, name: &str) {
        if !self.adjacency.contains_key(name) {
            self.order.push(name.to_string());
            self.adjacency.insert(name.to_string(), Vec::new());
        }
    }

    /// Insert a bidirectional edge, creating missing endpoints.
    ///
    /// Repeated calls for the same pair accumulate duplicate records rather
    /// than overwriting; lookups resolve to the first inserted weight.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: u32) {
        self.add_city(a);
        self.add_city(b);
        self.adjacency
            .get_mut(a)
            .expect("endpoint inserted above")
            .push((b.to_string(), weight));
        self.adjacency
            .get_mut(b)
            .expect("endpoint inserted above")
            .push((a.to_string(), weight));
    }

    /// All city names, in insertion order.
    pub fn cities(&self) -> &[String] {
        &self.order
    }

    /// Number of cities in the graph.
    pub fn num_cities(&self) -> usize {
        self.order.len()
    }

    /// Distance between two cities, or [`UNREACHABLE`] when no direct edge
    /// exists or `a` has no adjacency record. Linear scan, first match wins.
    #[inline]
    pub fn distance(&self, a: &str, b: &str) -> u32 {
        if let Some(adjacent) = self.adjacency.get(a) {
            for (city, weight) in adjacent {
                if city == b {
                    return *weight;
                }
            }
        }
        UNREACHABLE
    }

    /// Raw adjacency list of `a`, unsorted. Callers sort when a
    /// deterministic order is required.
    pub fn neighbors(&self, a: &str) -> &[(String, u32)] {
        self.adjacency.get(a).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True iff a depth-first traversal from any single city reaches all
    /// cities. The empty graph is connected by convention.
    pub fn is_connected(&self) -> bool {
        if self.order.is_empty() {
            return true;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![self.order[0].as_str()];

        while let Some(city) = stack.pop() {
            if !visited.insert(city) {
                continue;
            }
            for (neighbor, _) in self.neighbors(city) {
                if !visited.contains(neighbor.as_str()) {
                    stack.push(neighbor);
                }
            }
        }

        visited.len() == self.order.len()
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for city in &self.order {
            write!(f, "City {}:", city)?;
            for (neighbor, weight) in self.neighbors(city) {
                write!(f, " -> {} (distance: {})", neighbor, weight)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
