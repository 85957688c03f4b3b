//! Benchmarking and experimentation module.
//!
//! Provides tools for running the greedy/genetic comparison across graph
//! sizes, collecting statistics, and exporting results.

use crate::error::SolverError;
use crate::generator;
use crate::heuristics::genetic::GeneticOptimizer;
use crate::heuristics::greedy::GreedyTourBuilder;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of a single algorithm run on one generated instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Algorithm name
    pub algorithm: String,
    /// Number of cities in the generated graph
    pub num_cities: usize,
    /// Population size (genetic runs only)
    pub population_size: Option<usize>,
    /// Cumulative generations at this snapshot (genetic runs only)
    pub generations: Option<usize>,
    /// Seed used to generate the instance and drive the optimizer
    pub seed: u64,
    /// Best tour cost, absent when no feasible tour was found
    pub cost: Option<u64>,
    /// Whether a feasible tour was found
    pub feasible: bool,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated statistics for one algorithm at one size/snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_cities: usize,
    pub generations: Option<usize>,
    pub num_runs: usize,
    pub num_feasible: usize,
    pub avg_cost: f64,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub std_cost: f64,
    pub avg_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Graph sizes to generate
    pub sizes: Vec<usize>,
    /// Independent runs (seeds) per size
    pub runs_per_size: usize,
    /// Cumulative generation counts at which the optimizer is sampled
    pub generation_snapshots: Vec<usize>,
    /// Upper bound for generated edge weights
    pub max_weight: u32,
    /// Base seed; run r of size s uses `base_seed + r`
    pub base_seed: u64,
    /// Run independent trials in parallel
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            sizes: vec![10, 20, 40, 80, 100],
            runs_per_size: 5,
            generation_snapshots: vec![1, 20, 40],
            max_weight: generator::DEFAULT_MAX_WEIGHT,
            base_seed: 42,
            parallel: true,
        }
    }
}

/// Population size used in the comparison study for a given city count:
/// half the cities, at least one.
pub fn population_size_for(num_cities: usize) -> usize {
    (num_cities / 2).max(1)
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunRecord>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run the full comparison over every configured size and seed.
    ///
    /// Trials are independent (each generates its own graph from its own
    /// seed and only reads it afterwards), so they can run in parallel.
    pub fn run(&mut self, names: &[String]) -> Result<(), SolverError> {
        let total = (self.config.sizes.len() * self.config.runs_per_size) as u64;
        let progress = ProgressBar::new(total);
        progress.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} trials {msg}")
                .expect("static progress template"),
        );

        let sizes = self.config.sizes.clone();
        for size in sizes {
            log::info!("benchmarking {} cities", size);
            progress.set_message(format!("({} cities)", size));

            let seeds: Vec<u64> = (0..self.config.runs_per_size)
                .map(|r| self.config.base_seed + r as u64)
                .collect();

            let records: Vec<RunRecord> = if self.config.parallel {
                seeds
                    .par_iter()
                    .map(|&seed| {
                        let r = self.run_trial(names, size, seed);
                        progress.inc(1);
                        r
                    })
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .flatten()
                    .collect()
            } else {
                let mut all = Vec::new();
                for &seed in &seeds {
                    all.extend(self.run_trial(names, size, seed)?);
                    progress.inc(1);
                }
                all
            };

            self.results.extend(records);
        }

        progress.finish_and_clear();
        Ok(())
    }

    /// One trial: generate a graph, run the greedy builder once, then
    /// sample the genetic optimizer at each cumulative generation snapshot.
    fn run_trial(
        &self,
        names: &[String],
        size: usize,
        seed: u64,
    ) -> Result<Vec<RunRecord>, SolverError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let graph = generator::random_complete_graph(names, size, self.config.max_weight, &mut rng)?;
        let start = graph.cities()[0].clone();

        let mut records = Vec::new();

        let begin = std::time::Instant::now();
        match GreedyTourBuilder::new().build(&graph, &start) {
            Ok(tour) => records.push(RunRecord {
                algorithm: tour.algorithm.clone(),
                num_cities: size,
                population_size: None,
                generations: None,
                seed,
                cost: Some(tour.cost),
                feasible: true,
                time: begin.elapsed().as_secs_f64(),
            }),
            Err(e) => {
                log::warn!("greedy failed on {} cities (seed {}): {}", size, seed, e);
                records.push(RunRecord {
                    algorithm: "GreedyNearestNeighbor".to_string(),
                    num_cities: size,
                    population_size: None,
                    generations: None,
                    seed,
                    cost: None,
                    feasible: false,
                    time: begin.elapsed().as_secs_f64(),
                });
            }
        }

        let population_size = population_size_for(size);
        let mut optimizer = GeneticOptimizer::new(&graph, size, population_size, seed)?;

        let begin = std::time::Instant::now();
        let mut done = 0usize;
        for &snapshot in &self.config.generation_snapshots {
            if snapshot > done {
                optimizer.run_generations(snapshot - done);
                done = snapshot;
            }
            let best = optimizer.best_tour();
            records.push(RunRecord {
                algorithm: best.algorithm.clone(),
                num_cities: size,
                population_size: Some(population_size),
                generations: Some(done),
                seed,
                cost: Some(best.cost),
                feasible: true,
                time: begin.elapsed().as_secs_f64(),
            });
        }

        Ok(records)
    }

    /// Compute statistics grouped by algorithm, size, and snapshot.
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut groups: HashMap<(String, usize, Option<usize>), Vec<&RunRecord>> = HashMap::new();
        for record in &self.results {
            groups
                .entry((
                    record.algorithm.clone(),
                    record.num_cities,
                    record.generations,
                ))
                .or_default()
                .push(record);
        }

        let mut statistics = Vec::new();

        for ((algorithm, num_cities, generations), records) in groups {
            let feasible: Vec<&&RunRecord> = records.iter().filter(|r| r.feasible).collect();
            if feasible.is_empty() {
                continue;
            }

            let costs: Vec<f64> = feasible
                .iter()
                .filter_map(|r| r.cost.map(|c| c as f64))
                .collect();
            let times: Vec<f64> = feasible.iter().map(|r| r.time).collect();

            statistics.push(AlgorithmStatistics {
                algorithm,
                num_cities,
                generations,
                num_runs: records.len(),
                num_feasible: feasible.len(),
                avg_cost: costs.iter().mean(),
                best_cost: costs.iter().copied().fold(f64::INFINITY, f64::min),
                worst_cost: costs.iter().copied().fold(0.0, f64::max),
                std_cost: if costs.len() > 1 { costs.iter().std_dev() } else { 0.0 },
                avg_time: times.iter().mean(),
            });
        }

        statistics.sort_by(|a, b| {
            (a.num_cities, &a.algorithm, a.generations).cmp(&(
                b.num_cities,
                &b.algorithm,
                b.generations,
            ))
        });

        statistics
    }

    /// Export raw results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        let stats = self.compute_statistics();
        for stat in stats {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("       TSP Comparison Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let stats = self.compute_statistics();

        report.push_str("Algorithm Performance Summary:\n");
        report.push_str("-".repeat(90).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<22} {:>7} {:>6} {:>10} {:>12} {:>12} {:>10} {:>10}\n",
            "Algorithm", "Cities", "Gens", "Feasible", "Avg Cost", "Best Cost", "Std Cost", "Avg Time"
        ));
        report.push_str("-".repeat(90).as_str());
        report.push('\n');

        for stat in &stats {
            let gens = stat
                .generations
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!(
                "{:<22} {:>7} {:>6} {:>10} {:>12.2} {:>12.2} {:>10.2} {:>10.4}\n",
                stat.algorithm,
                stat.num_cities,
                gens,
                format!("{}/{}", stat.num_feasible, stat.num_runs),
                stat.avg_cost,
                stat.best_cost,
                stat.std_cost,
                stat.avg_time
            ));
        }

        report.push_str("-".repeat(90).as_str());
        report.push('\n');

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunRecord] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("City{}", i)).collect()
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.sizes, vec![10, 20, 40, 80, 100]);
        assert_eq!(config.runs_per_size, 5);
        assert_eq!(config.generation_snapshots, vec![1, 20, 40]);
    }

    #[test]
    fn test_population_size_for_study_sizes() {
        assert_eq!(population_size_for(10), 5);
        assert_eq!(population_size_for(20), 10);
        assert_eq!(population_size_for(40), 20);
        assert_eq!(population_size_for(80), 40);
        assert_eq!(population_size_for(100), 50);
        assert_eq!(population_size_for(2), 1);
    }

    #[test]
    fn test_small_benchmark_run() {
        let config = BenchmarkConfig {
            sizes: vec![6],
            runs_per_size: 2,
            generation_snapshots: vec![1, 3],
            parallel: false,
            ..Default::default()
        };

        let mut benchmark = Benchmark::new(config);
        benchmark.run(&names(8)).unwrap();

        // Per run: 1 greedy record + one record per snapshot.
        assert_eq!(benchmark.results().len(), 2 * (1 + 2));
        assert!(benchmark.results().iter().all(|r| r.feasible));

        let stats = benchmark.compute_statistics();
        // Greedy plus one group per snapshot.
        assert_eq!(stats.len(), 3);
        for stat in &stats {
            assert_eq!(stat.num_runs, 2);
            assert!(stat.avg_cost >= stat.best_cost);
        }

        let report = benchmark.generate_report();
        assert!(report.contains("GreedyNearestNeighbor"));
        assert!(report.contains("GeneticOptimizer"));
    }

    #[test]
    fn test_csv_export() {
        let config = BenchmarkConfig {
            sizes: vec![5],
            runs_per_size: 1,
            generation_snapshots: vec![1],
            parallel: false,
            ..Default::default()
        };

        let mut benchmark = Benchmark::new(config);
        benchmark.run(&names(6)).unwrap();

        let path = std::env::temp_dir().join("tsp_solver_bench_test.csv");
        benchmark.export_to_csv(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.lines().count() > 1);
        assert!(contents.contains("GreedyNearestNeighbor"));

        std::fs::remove_file(&path).ok();
    }
}
