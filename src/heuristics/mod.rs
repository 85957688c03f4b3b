//! Heuristics module.
//!
//! This module exports the two tour-building strategies the solver
//! compares: greedy nearest-neighbor construction and the genetic
//! optimizer.

pub mod genetic;
pub mod greedy;

pub use genetic::*;
pub use greedy::*;
