//! Random instance generation.
//!
//! Builds complete weighted graphs over city names read from a plain text
//! file (one name per line), the way the experiment driver provisions its
//! inputs. The core solvers never touch the filesystem themselves.

use crate::error::SolverError;
use crate::graph::Graph;
use rand::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Default upper bound for generated edge weights (inclusive).
pub const DEFAULT_MAX_WEIGHT: u32 = 50;

/// Read city names from a file, one per line. Lines are trimmed, blank
/// lines skipped, and duplicate names dropped (first occurrence wins).
pub fn read_city_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>, SolverError> {
    let file =
        File::open(&path).map_err(|e| SolverError::Io(format!("cannot open city file: {}", e)))?;
    let reader = BufReader::new(file);

    let mut names = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            names.push(trimmed.to_string());
        }
    }
    Ok(names)
}

/// Build a complete graph over `num_cities` cities sampled from `names`,
/// with uniform integer weights in `1..=max_weight`. No self-loops are
/// produced. Deterministic for a given rng state.
pub fn random_complete_graph<R: Rng>(
    names: &[String],
    num_cities: usize,
    max_weight: u32,
    rng: &mut R,
) -> Result<Graph, SolverError> {
    if names.len() < num_cities {
        return Err(SolverError::InvalidConfig {
            reason: format!(
                "requested {} cities but only {} names are available",
                num_cities,
                names.len()
            ),
        });
    }
    if max_weight == 0 {
        return Err(SolverError::InvalidConfig {
            reason: "max_weight must be at least 1".to_string(),
        });
    }

    // Shuffle a copy so repeated calls draw different city subsets.
    let mut pool = names.to_vec();
    pool.shuffle(rng);
    pool.truncate(num_cities);

    let mut graph = Graph::new();
    for name in &pool {
        graph.add_city(name);
    }
    for i in 0..num_cities {
        for j in (i + 1)..num_cities {
            let weight = rng.gen_range(1..=max_weight);
            graph.add_edge(&pool[i], &pool[j], weight);
        }
    }

    Ok(graph)
}
