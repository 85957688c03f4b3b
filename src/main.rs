//! TSP Solver - Command Line Interface
//!
//! Generates random city graphs and compares a greedy nearest-neighbor
//! baseline against a genetic optimizer.

use clap::{Parser, Subcommand, ValueEnum};
use tsp_solver::benchmark::{population_size_for, Benchmark, BenchmarkConfig};
use tsp_solver::generator::{self, DEFAULT_MAX_WEIGHT};
use tsp_solver::heuristics::genetic::GeneticOptimizer;
use tsp_solver::heuristics::greedy::GreedyTourBuilder;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "A TSP solver comparing greedy and genetic heuristics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a randomly generated instance
    Solve {
        /// File containing city names, one per line
        #[arg(short, long)]
        cities: PathBuf,

        /// Number of cities in the generated graph
        #[arg(short, long, default_value = "10")]
        num_cities: usize,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "both")]
        algorithm: Algorithm,

        /// Population size (defaults to half the city count)
        #[arg(short, long)]
        population_size: Option<usize>,

        /// Number of generations to evolve
        #[arg(short, long, default_value = "40")]
        generations: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of best tours to report from the final population
        #[arg(long, default_value = "5")]
        top: usize,

        /// Output the best tour to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output (print the generated graph)
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare both strategies across graph sizes
    Compare {
        /// File containing city names, one per line
        #[arg(short, long)]
        cities: PathBuf,

        /// Graph sizes to test
        #[arg(long, value_delimiter = ',', default_value = "10,20,40,80,100")]
        sizes: Vec<usize>,

        /// Number of runs per size
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Base random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Run trials sequentially instead of in parallel
        #[arg(long)]
        serial: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Greedy nearest-neighbor construction
    Greedy,
    /// Genetic optimizer
    Genetic,
    /// Both, reported side by side
    Both,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            cities,
            num_cities,
            algorithm,
            population_size,
            generations,
            seed,
            top,
            output,
            verbose,
        } => {
            solve(
                &cities,
                num_cities,
                algorithm,
                population_size,
                generations,
                seed,
                top,
                output,
                verbose,
            );
        }

        Commands::Compare {
            cities,
            sizes,
            runs,
            output,
            seed,
            serial,
        } => {
            compare(&cities, sizes, runs, &output, seed, serial);
        }
    }
}

fn solve(
    cities: &PathBuf,
    num_cities: usize,
    algorithm: Algorithm,
    population_size: Option<usize>,
    generations: usize,
    seed: u64,
    top: usize,
    output: Option<PathBuf>,
    verbose: bool,
) {
    let names = match generator::read_city_names(cities) {
        Ok(names) => names,
        Err(e) => {
            eprintln!("Error reading city names: {}", e);
            std::process::exit(1);
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let graph = match generator::random_complete_graph(&names, num_cities, DEFAULT_MAX_WEIGHT, &mut rng)
    {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error generating graph: {}", e);
            std::process::exit(1);
        }
    };

    println!("Generated graph with {} cities (seed {})", num_cities, seed);
    if verbose {
        print!("{}", graph);
        println!(
            "The graph is {}connected.",
            if graph.is_connected() { "" } else { "not " }
        );
    }

    let start = graph.cities()[0].clone();
    let mut best_genetic = None;

    if algorithm == Algorithm::Greedy || algorithm == Algorithm::Both {
        println!("\nRunning greedy nearest-neighbor from {}...", start);
        match GreedyTourBuilder::new().build(&graph, &start) {
            Ok(tour) => print!("\n{}", tour),
            Err(e) => println!("Greedy construction failed: {}", e),
        }
    }

    if algorithm == Algorithm::Genetic || algorithm == Algorithm::Both {
        let population_size = population_size.unwrap_or_else(|| population_size_for(num_cities));
        println!(
            "\nRunning genetic optimizer (population {}, {} generations)...",
            population_size, generations
        );

        let mut optimizer = match GeneticOptimizer::new(&graph, num_cities, population_size, seed) {
            Ok(optimizer) => optimizer,
            Err(e) => {
                eprintln!("Error configuring optimizer: {}", e);
                std::process::exit(1);
            }
        };

        let begin = std::time::Instant::now();
        optimizer.run_generations(generations);

        let mut best = optimizer.best_tour();
        best.computation_time = begin.elapsed().as_secs_f64();
        print!("\n{}", best);

        println!("\nTop {} tours:", top.min(population_size));
        for (i, tour) in optimizer.top_k(top).iter().enumerate() {
            println!("  #{}: cost {}  [{}]", i + 1, tour.cost, tour.route.join(" -> "));
        }

        best_genetic = Some(best);
    }

    if let Some(out_path) = output {
        let best = match best_genetic {
            Some(tour) => tour,
            None => match GreedyTourBuilder::new().build(&graph, &start) {
                Ok(tour) => tour,
                Err(e) => {
                    eprintln!("No tour to save: {}", e);
                    std::process::exit(1);
                }
            },
        };

        let json = serde_json::to_string_pretty(&best).expect("tour serializes");
        if let Err(e) = std::fs::write(&out_path, json) {
            eprintln!("Failed to write output: {}", e);
            std::process::exit(1);
        }
        println!("\nBest tour saved to {:?}", out_path);
    }
}

fn compare(
    cities: &PathBuf,
    sizes: Vec<usize>,
    runs: usize,
    output: &PathBuf,
    seed: u64,
    serial: bool,
) {
    let names = match generator::read_city_names(cities) {
        Ok(names) => names,
        Err(e) => {
            eprintln!("Error reading city names: {}", e);
            std::process::exit(1);
        }
    };

    let config = BenchmarkConfig {
        sizes,
        runs_per_size: runs,
        base_seed: seed,
        parallel: !serial,
        ..Default::default()
    };

    let mut benchmark = Benchmark::new(config);
    if let Err(e) = benchmark.run(&names) {
        eprintln!("Benchmark failed: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    let results_path = output.join("results.csv");
    benchmark
        .export_to_csv(&results_path)
        .expect("Failed to export results");
    println!("Results exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark
        .export_statistics_csv(&stats_path)
        .expect("Failed to export statistics");
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report).expect("Failed to save report");
    println!("Report saved to {:?}", report_path);
}
