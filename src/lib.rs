//! TSP Solver Library
//!
//! A Traveling Salesman Problem solver over weighted undirected graphs of
//! named cities, comparing two heuristics:
//!
//! - Greedy nearest-neighbor tour construction (deterministic baseline)
//! - A genetic algorithm with Order Crossover and hill-climbing mutation
//!
//! Neither strategy guarantees optimality.
//!
//! # Example
//!
//! ```
//! use tsp_solver::graph::Graph;
//! use tsp_solver::heuristics::greedy::GreedyTourBuilder;
//! use tsp_solver::heuristics::genetic::GeneticOptimizer;
//!
//! let mut graph = Graph::new();
//! graph.add_edge("A", "B", 1);
//! graph.add_edge("A", "C", 4);
//! graph.add_edge("A", "D", 3);
//! graph.add_edge("B", "C", 2);
//! graph.add_edge("B", "D", 5);
//! graph.add_edge("C", "D", 6);
//!
//! let greedy = GreedyTourBuilder::new().build(&graph, "A").unwrap();
//! assert_eq!(greedy.cost, 12);
//!
//! let mut optimizer = GeneticOptimizer::new(&graph, 4, 6, 42).unwrap();
//! optimizer.run_generations(40);
//! let best = optimizer.best_tour();
//! assert!(best.cost <= greedy.cost);
//! ```

pub mod benchmark;
pub mod error;
pub mod generator;
pub mod graph;
pub mod heuristics;
pub mod tour;

pub use error::SolverError;
pub use graph::Graph;
pub use tour::Tour;
