//! Genetic algorithm for the TSP.
//!
//! Permutation-encoded population search with:
//! - Order Crossover (OX) with a forward-only fill cursor
//! - two hill-climbing mutation operators (random swap, directed max-edge swap)
//! - elitist generational replacement: offspring and the entire previous
//!   population are pooled, sorted by fitness, and truncated

use crate::error::SolverError;
use crate::graph::Graph;
use crate::tour::{route_cost, Tour};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// An ordered sequence of cities of length `num_cities + 1` representing a
/// closed tour: position 0 and the last position hold the starting city.
pub type Chromosome = Vec<String>;

/// Probability that a freshly bred offspring pair is mutated.
const MUTATION_PROBABILITY: f64 = 0.1;

/// Number of distinct chromosomes achievable for `num_cities`: the start
/// city is fixed, so `(num_cities - 1)!` interior orderings exist.
/// Saturates instead of overflowing for large city counts.
fn distinct_chromosome_bound(num_cities: usize) -> u128 {
    let mut bound: u128 = 1;
    for k in 2..num_cities {
        bound = bound.saturating_mul(k as u128);
    }
    bound
}

/// Population-based genetic optimizer over a read-only [`Graph`].
///
/// All randomness flows through a single seeded [`ChaCha8Rng`], so runs are
/// reproducible for a given seed.
pub struct GeneticOptimizer<'a> {
    graph: &'a Graph,
    population: Vec<Chromosome>,
    population_size: usize,
    num_cities: usize,
    start_city: String,
    rng: ChaCha8Rng,
    generation: usize,
}

impl<'a> GeneticOptimizer<'a> {
    /// Create an optimizer and generate its initial population.
    ///
    /// Fails with [`SolverError::InvalidConfig`] when `num_cities < 2`,
    /// when `population_size` is zero, or when `population_size` exceeds
    /// the number of distinct achievable chromosomes (initialization could
    /// never terminate).
    pub fn new(
        graph: &'a Graph,
        num_cities: usize,
        population_size: usize,
        seed: u64,
    ) -> Result<Self, SolverError> {
        if num_cities < 2 {
            return Err(SolverError::InvalidConfig {
                reason: format!("a tour needs at least 2 cities, got {}", num_cities),
            });
        }
        if graph.num_cities() != num_cities {
            return Err(SolverError::InvalidConfig {
                reason: format!(
                    "graph has {} cities but num_cities is {}",
                    graph.num_cities(),
                    num_cities
                ),
            });
        }
        if population_size == 0 {
            return Err(SolverError::InvalidConfig {
                reason: "population_size must be at least 1".to_string(),
            });
        }
        let bound = distinct_chromosome_bound(num_cities);
        if population_size as u128 > bound {
            return Err(SolverError::InvalidConfig {
                reason: format!(
                    "population_size {} exceeds the {} distinct tours achievable with {} cities",
                    population_size, bound, num_cities
                ),
            });
        }

        let start_city = graph.cities()[0].clone();
        let mut optimizer = GeneticOptimizer {
            graph,
            population: Vec::new(),
            population_size,
            num_cities,
            start_city,
            rng: ChaCha8Rng::seed_from_u64(seed),
            generation: 0,
        };
        optimizer.generate_initial_population();
        Ok(optimizer)
    }

    /// Shuffle the non-start cities and anchor the start city at both ends,
    /// collecting structurally distinct chromosomes until the population is
    /// full. Uniqueness is enforced only here, not in later generations.
    fn generate_initial_population(&mut self) {
        let mut others: Vec<String> = self
            .graph
            .cities()
            .iter()
            .filter(|c| **c != self.start_city)
            .cloned()
            .collect();

        let mut seen: HashSet<Chromosome> = HashSet::new();
        let mut population = Vec::with_capacity(self.population_size);
        while population.len() < self.population_size {
            others.shuffle(&mut self.rng);

            let mut chromosome = Vec::with_capacity(self.num_cities + 1);
            chromosome.push(self.start_city.clone());
            chromosome.extend(others.iter().cloned());
            chromosome.push(self.start_city.clone());

            // The set only deduplicates; population order follows draw
            // order so runs stay reproducible for a given seed.
            if seen.insert(chromosome.clone()) {
                population.push(chromosome);
            }
        }

        self.population = population;
    }

    /// Total tour distance of a chromosome, including the closing edge.
    /// Derived on every call, never cached.
    pub fn fitness(&self, chromosome: &[String]) -> u64 {
        route_cost(self.graph, chromosome)
    }

    /// Order Crossover with explicit cut points; `start..=end` is copied
    /// from `parent1`, the rest filled from `parent2` in order through a
    /// forward-only cursor.
    fn crossover_at(
        &self,
        parent1: &[String],
        parent2: &[String],
        start: usize,
        end: usize,
    ) -> Chromosome {
        let num_genes = parent1.len() - 1;
        let mut slots: Vec<Option<String>> = vec![None; num_genes];

        for i in start..=end {
            slots[i] = Some(parent1[i].clone());
        }

        let mut idx = 0;
        for gene in parent2 {
            if slots.iter().any(|s| s.as_ref() == Some(gene)) {
                continue;
            }
            while slots[idx].is_some() {
                idx += 1;
            }
            slots[idx] = Some(gene.clone());
        }

        let mut child: Chromosome = slots
            .into_iter()
            .map(|s| s.expect("permutation crossover fills every slot"))
            .collect();
        // Close the cycle on the child's own first gene; this is not
        // guaranteed to be the conventional start city.
        child.push(child[0].clone());
        child
    }

    /// Order Crossover with uniformly chosen cut points.
    fn crossover(&mut self, parent1: &[String], parent2: &[String]) -> Chromosome {
        let num_genes = parent1.len() - 1;
        let start = self.rng.gen_range(0..num_genes);
        let end = self.rng.gen_range(start..num_genes);
        self.crossover_at(parent1, parent2, start, end)
    }

    /// Swap two distinct interior positions, keeping the change only if it
    /// strictly improves fitness. The start/end anchor is never touched.
    fn random_swap_mutation(&mut self, chromosome: &mut Chromosome) {
        if self.num_cities < 3 {
            // No two distinct interior positions exist.
            return;
        }

        let (idx1, idx2) = loop {
            let i = self.rng.gen_range(1..self.num_cities);
            let j = self.rng.gen_range(1..self.num_cities);
            if i != j {
                break (i, j);
            }
        };

        let before = self.fitness(chromosome);
        chromosome.swap(idx1, idx2);
        let after = self.fitness(chromosome);
        if after >= before {
            chromosome.swap(idx1, idx2);
        }
    }

    /// Swap the endpoints of the maximum-weight edge (first maximum wins),
    /// keeping the change only if it strictly improves fitness.
    ///
    /// The scan covers every consecutive edge, anchor positions included,
    /// so unlike [`Self::random_swap_mutation`] this operator can move the
    /// start/end anchor and break cycle closure.
    fn directed_mutation(&mut self, chromosome: &mut Chromosome) {
        let mut max_weight: Option<u32> = None;
        let mut idx1 = 0;
        let mut idx2 = 0;

        for i in 0..chromosome.len() - 1 {
            let weight = self.graph.distance(&chromosome[i], &chromosome[i + 1]);
            if max_weight.map_or(true, |m| weight > m) {
                max_weight = Some(weight);
                idx1 = i;
                idx2 = i + 1;
            }
        }

        let before = self.fitness(chromosome);
        chromosome.swap(idx1, idx2);
        let after = self.fitness(chromosome);
        if after >= before {
            chromosome.swap(idx1, idx2);
        }
    }

    /// Apply both mutation operators in sequence.
    fn mutate(&mut self, chromosome: &mut Chromosome) {
        self.random_swap_mutation(chromosome);
        self.directed_mutation(chromosome);
    }

    /// Run a single generational step.
    ///
    /// Offspring are bred in pairs from uniformly chosen parents until the
    /// new generation reaches the population size (possibly overshooting by
    /// one), the entire previous population is appended, and the combined
    /// pool is sorted ascending by fitness and truncated.
    pub fn run_generation(&mut self) {
        let mut next: Vec<Chromosome> = Vec::with_capacity(2 * self.population_size + 1);

        while next.len() < self.population_size {
            let i = self.rng.gen_range(0..self.population.len());
            let j = self.rng.gen_range(0..self.population.len());
            let parent1 = self.population[i].clone();
            let parent2 = self.population[j].clone();

            let mut child1 = self.crossover(&parent1, &parent2);
            let mut child2 = self.crossover(&parent2, &parent1);

            if self.rng.gen::<f64>() < MUTATION_PROBABILITY {
                self.mutate(&mut child1);
                self.mutate(&mut child2);
            }

            next.push(child1);
            next.push(child2);
        }

        next.append(&mut self.population);
        // Fitness is recomputed per comparison; lower total distance sorts
        // first, and the stable sort keeps pool order among ties.
        next.sort_by_key(|c| route_cost(self.graph, c));
        next.truncate(self.population_size);

        self.population = next;
        self.generation += 1;
    }

    /// Run `n` generational steps in sequence.
    pub fn run_generations(&mut self, n: usize) {
        for _ in 0..n {
            self.run_generation();
            log::debug!(
                "generation {}: best cost {}",
                self.generation,
                self.fitness(&self.population[0])
            );
        }
    }

    /// The lowest-fitness chromosome of the current population, as a
    /// [`Tour`]. Pure query; valid before the first generation.
    pub fn best_tour(&self) -> Tour {
        let best = self
            .population
            .iter()
            .min_by_key(|c| route_cost(self.graph, c))
            .expect("population is never empty");

        let mut tour = Tour::from_route(self.graph, best.clone(), "GeneticOptimizer");
        tour.iterations = Some(self.generation);
        tour
    }

    /// The `k` lowest-fitness chromosomes, ties broken by population order
    /// under a stable sort. Pure query.
    pub fn top_k(&self, k: usize) -> Vec<Tour> {
        let mut indices: Vec<usize> = (0..self.population.len()).collect();
        indices.sort_by_key(|&i| route_cost(self.graph, &self.population[i]));
        indices.truncate(k.min(self.population.len()));

        indices
            .into_iter()
            .map(|i| {
                let mut tour =
                    Tour::from_route(self.graph, self.population[i].clone(), "GeneticOptimizer");
                tour.iterations = Some(self.generation);
                tour
            })
            .collect()
    }

    /// Number of generational steps run so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current population, in its current order.
    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chromosome(names: &[&str]) -> Chromosome {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Complete graph over n cities named C0..C{n-1}. Edges incident to the
    /// start city C0 are kept strictly cheapest so directed mutation always
    /// selects an interior edge and the anchor invariant holds throughout.
    fn anchored_complete_graph(n: usize) -> Graph {
        let mut g = Graph::new();
        let names: Vec<String> = (0..n).map(|i| format!("C{}", i)).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = if i == 0 {
                    1
                } else {
                    10 + ((i * 7 + j * 3) % 40) as u32
                };
                g.add_edge(&names[i], &names[j], weight);
            }
        }
        g
    }

    /// Complete graph where every edge has the same weight; no swap can
    /// strictly improve fitness, so every mutation must revert.
    fn uniform_graph(n: usize) -> Graph {
        let mut g = Graph::new();
        let names: Vec<String> = (0..n).map(|i| format!("C{}", i)).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                g.add_edge(&names[i], &names[j], 7);
            }
        }
        g
    }

    fn assert_anchored_chromosome(c: &Chromosome, n: usize, start: &str) {
        assert_eq!(c.len(), n + 1);
        assert_eq!(c[0], start);
        assert_eq!(c[n], start);
        let unique: HashSet<&String> = c[..n].iter().collect();
        assert_eq!(unique.len(), n);
    }

    #[test]
    fn test_config_preconditions() {
        let g = anchored_complete_graph(3);
        assert!(matches!(
            GeneticOptimizer::new(&g, 1, 1, 42),
            Err(SolverError::InvalidConfig { .. })
        ));
        assert!(matches!(
            GeneticOptimizer::new(&g, 3, 0, 42),
            Err(SolverError::InvalidConfig { .. })
        ));
        // Only 2! = 2 distinct chromosomes exist for 3 cities.
        assert!(matches!(
            GeneticOptimizer::new(&g, 3, 3, 42),
            Err(SolverError::InvalidConfig { .. })
        ));
        assert!(GeneticOptimizer::new(&g, 3, 2, 42).is_ok());

        let g4 = anchored_complete_graph(4);
        assert!(matches!(
            GeneticOptimizer::new(&g4, 3, 2, 42),
            Err(SolverError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_distinct_chromosome_bound() {
        assert_eq!(distinct_chromosome_bound(2), 1);
        assert_eq!(distinct_chromosome_bound(3), 2);
        assert_eq!(distinct_chromosome_bound(5), 24);
        // Large counts saturate instead of overflowing.
        assert_eq!(distinct_chromosome_bound(200), u128::MAX);
    }

    #[test]
    fn test_initial_population_distinct_and_anchored() {
        let g = anchored_complete_graph(4);
        // 3! = 6 distinct chromosomes; ask for all of them.
        let optimizer = GeneticOptimizer::new(&g, 4, 6, 42).unwrap();

        assert_eq!(optimizer.population().len(), 6);
        let unique: HashSet<&Chromosome> = optimizer.population().iter().collect();
        assert_eq!(unique.len(), 6);
        for c in optimizer.population() {
            assert_anchored_chromosome(c, 4, "C0");
        }
    }

    #[test]
    fn test_fitness_is_sum_of_consecutive_edges() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("B", "C", 2);
        g.add_edge("C", "D", 6);
        g.add_edge("D", "A", 3);
        g.add_edge("A", "C", 4);
        g.add_edge("B", "D", 5);

        let optimizer = GeneticOptimizer::new(&g, 4, 2, 42).unwrap();
        let c = chromosome(&["A", "B", "C", "D", "A"]);
        assert_eq!(optimizer.fitness(&c), 1 + 2 + 6 + 3);
    }

    #[test]
    fn test_crossover_fixed_points() {
        let g = anchored_complete_graph(4);
        let optimizer = GeneticOptimizer::new(&g, 4, 2, 42).unwrap();

        let parent1 = chromosome(&["C0", "C1", "C2", "C3", "C0"]);
        let parent2 = chromosome(&["C0", "C3", "C1", "C2", "C0"]);

        // Copy indices 1..=2 from parent1; the remaining gene comes from
        // parent2 in order.
        let child = optimizer.crossover_at(&parent1, &parent2, 1, 2);
        assert_eq!(child, chromosome(&["C0", "C1", "C2", "C3", "C0"]));
    }

    #[test]
    fn test_crossover_children_are_valid_closed_tours() {
        let g = anchored_complete_graph(6);
        let mut optimizer = GeneticOptimizer::new(&g, 6, 10, 42).unwrap();

        for _ in 0..200 {
            let i = optimizer.rng.gen_range(0..optimizer.population.len());
            let j = optimizer.rng.gen_range(0..optimizer.population.len());
            let p1 = optimizer.population[i].clone();
            let p2 = optimizer.population[j].clone();

            let child = optimizer.crossover(&p1, &p2);
            assert_eq!(child.len(), 7);
            assert_eq!(child.first(), child.last());
            let unique: HashSet<&String> = child[..6].iter().collect();
            assert_eq!(unique.len(), 6);
        }
    }

    #[test]
    fn test_mutation_reverts_when_not_strictly_better() {
        let g = uniform_graph(5);
        let mut optimizer = GeneticOptimizer::new(&g, 5, 4, 42).unwrap();

        let original = chromosome(&["C0", "C1", "C2", "C3", "C4", "C0"]);
        for _ in 0..50 {
            let mut mutated = original.clone();
            optimizer.mutate(&mut mutated);
            assert_eq!(mutated, original);
        }
    }

    #[test]
    fn test_random_swap_never_touches_anchor() {
        let g = anchored_complete_graph(6);
        let mut optimizer = GeneticOptimizer::new(&g, 6, 4, 42).unwrap();

        let mut c = optimizer.population()[0].clone();
        for _ in 0..200 {
            optimizer.random_swap_mutation(&mut c);
            assert_eq!(c[0], "C0");
            assert_eq!(c[6], "C0");
        }
    }

    #[test]
    fn test_directed_mutation_may_move_anchor() {
        // Documents the asymmetry between the two mutation operators: the
        // directed scan covers anchor edges, so an improving swap there
        // relocates the start city and breaks cycle closure.
        let mut g = Graph::new();
        g.add_edge("S", "A", 10);
        g.add_edge("A", "B", 9);
        g.add_edge("B", "C", 5);
        g.add_edge("C", "S", 9);
        g.add_edge("S", "B", 1);
        g.add_edge("A", "C", 1);

        let mut optimizer = GeneticOptimizer::new(&g, 4, 2, 42).unwrap();
        let mut c = chromosome(&["S", "A", "B", "C", "S"]);
        // Max edge is S-A at positions (0, 1); the swap drops the total
        // from 33 to 25, so it is kept.
        optimizer.directed_mutation(&mut c);

        assert_eq!(c, chromosome(&["A", "S", "B", "C", "S"]));
        assert_ne!(c.first(), c.last());
    }

    #[test]
    fn test_populations_stay_valid_across_generations() {
        let g = anchored_complete_graph(10);
        let mut optimizer = GeneticOptimizer::new(&g, 10, 5, 42).unwrap();

        // Snapshots after 1, 20, and 40 cumulative generations.
        for step in [1usize, 19, 20] {
            optimizer.run_generations(step);

            assert_eq!(optimizer.population().len(), 5);
            for c in optimizer.population() {
                assert_anchored_chromosome(c, 10, "C0");
            }

            let costs: Vec<u64> = optimizer
                .population()
                .iter()
                .map(|c| optimizer.fitness(c))
                .collect();
            assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        }
        assert_eq!(optimizer.generation(), 40);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let g = anchored_complete_graph(8);

        let mut first = GeneticOptimizer::new(&g, 8, 6, 7).unwrap();
        let mut second = GeneticOptimizer::new(&g, 8, 6, 7).unwrap();
        first.run_generations(10);
        second.run_generations(10);

        assert_eq!(first.population(), second.population());
        assert_eq!(first.best_tour().route, second.best_tour().route);
    }

    #[test]
    fn test_best_tour_and_top_k() {
        let g = anchored_complete_graph(6);
        let mut optimizer = GeneticOptimizer::new(&g, 6, 8, 42).unwrap();
        optimizer.run_generations(5);

        let best = optimizer.best_tour();
        let top = optimizer.top_k(3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].route, best.route);
        assert!(top.windows(2).all(|w| w[0].cost <= w[1].cost));

        // k larger than the population is clamped.
        assert_eq!(optimizer.top_k(100).len(), 8);
    }
}
