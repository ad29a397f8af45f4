use crate::models::{Codec, DomainError, Evaluator, Gene, Rates};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// Odd sizes are rejected outright rather than silently leaving the last
    /// individual unpaired during crossover.
    #[error("population size must be a positive even number, got {size}")]
    InvalidSize { size: usize },
    #[error("Seed coordinate error: {0}")]
    Domain(#[from] DomainError),
}

/// The best individual observed at one point of the search, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Best {
    pub x: f64,
    pub y: f64,
    pub fitness: f64,
}

/// An evolving population of fixed size with cached fitness values.
///
/// `fitnesses[i]` always holds the fitness of `genes[i]` after the last
/// refresh; every generation step rebuilds both in lockstep. `history` gets
/// exactly one entry per generation, the seed generation included, and feeds
/// external consumers such as plotting layers.
#[derive(Debug)]
pub struct Population<E> {
    codec: Codec,
    rates: Rates,
    evaluator: E,
    rng: StdRng,
    genes: Vec<Gene>,
    fitnesses: Vec<f64>,
    history: Vec<Best>,
}

impl<E: Evaluator> Population<E> {
    /// Seeds `size` individuals uniformly at random within the codec domain,
    /// evaluates them and records the generation-0 best.
    pub fn new(
        size: usize,
        codec: Codec,
        rates: Rates,
        evaluator: E,
    ) -> Result<Self, PopulationError> {
        Self::with_rng(size, codec, rates, evaluator, StdRng::from_os_rng())
    }

    /// Like [`Population::new`] with a caller-provided generator, for
    /// reproducible runs.
    #[instrument(level = "debug", skip(codec, rates, evaluator, rng), fields(size = size))]
    pub fn with_rng(
        size: usize,
        codec: Codec,
        rates: Rates,
        evaluator: E,
        mut rng: StdRng,
    ) -> Result<Self, PopulationError> {
        Self::validate_size(size)?;

        let genes = (0..size).map(|_| Gene::random(&codec, &mut rng)).collect();

        Ok(Self::assemble(genes, codec, rates, evaluator, rng))
    }

    /// Seeds the population from explicit coordinates. Any coordinate outside
    /// the codec domain surfaces as a [`DomainError`] before any state is
    /// built.
    pub fn from_points(
        points: &[(f64, f64)],
        codec: Codec,
        rates: Rates,
        evaluator: E,
        rng: StdRng,
    ) -> Result<Self, PopulationError> {
        Self::validate_size(points.len())?;

        let genes = points
            .iter()
            .map(|&(x, y)| Gene::new(&codec, x, y))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::assemble(genes, codec, rates, evaluator, rng))
    }

    fn validate_size(size: usize) -> Result<(), PopulationError> {
        if size == 0 || size % 2 != 0 {
            return Err(PopulationError::InvalidSize { size });
        }

        Ok(())
    }

    fn assemble(genes: Vec<Gene>, codec: Codec, rates: Rates, evaluator: E, rng: StdRng) -> Self {
        let mut population = Self {
            fitnesses: vec![0.0; genes.len()],
            genes,
            codec,
            rates,
            evaluator,
            rng,
            history: Vec::new(),
        };

        population.refresh_fitness();
        population.record_best();
        population
    }

    /// Runs the full generation transition `generations` times:
    /// eliminate, select, crossover, mutate, refresh fitness, record best.
    #[instrument(level = "debug", skip(self), fields(size = self.genes.len(), generations = generations))]
    pub fn evolve(&mut self, generations: usize) {
        for generation in 0..generations {
            self.eliminate();
            self.select();
            self.crossover_pairs();
            self.mutate_all();
            self.refresh_fitness();
            self.record_best();

            if let Some(entry) = self.history.last() {
                debug!(
                    generation,
                    x = entry.x,
                    y = entry.y,
                    fitness = entry.fitness,
                    "generation complete"
                );
            }
        }
    }

    /// The best triple recorded across the whole history, not just the last
    /// generation. Ties go to the latest occurrence.
    pub fn best(&self) -> Best {
        self.history
            .iter()
            .copied()
            .reduce(|best, entry| if entry.fitness >= best.fitness { entry } else { best })
            .expect("history holds at least the seed generation")
    }

    /// One recorded best per generation, the seed generation first. Read-only:
    /// presentation layers consume this, the engine never renders anything.
    pub fn history(&self) -> &[Best] {
        &self.history
    }

    pub fn size(&self) -> usize {
        self.genes.len()
    }

    /// Clamps negative cached fitness to zero so a negative-valued landscape
    /// cannot break the cumulative-probability construction in selection.
    pub(crate) fn eliminate(&mut self) {
        for fitness in &mut self.fitnesses {
            if *fitness < 0.0 {
                *fitness = 0.0;
            }
        }
    }

    /// Fitness-proportionate resampling with replacement.
    ///
    /// Selected individuals are staged into a fresh buffer and swapped in
    /// only once the sweep completes, so the gene and fitness arrays never
    /// desynchronize mid-step. When the total fitness is zero the roulette
    /// wheel is undefined; selection falls back to uniform resampling.
    pub(crate) fn select(&mut self) {
        let size = self.genes.len();
        let total: f64 = self.fitnesses.iter().sum();
        let mut staged = Vec::with_capacity(size);

        if total > 0.0 {
            let mut cumulative = Vec::with_capacity(size);
            let mut accumulated = 0.0;
            for fitness in &self.fitnesses {
                accumulated += fitness / total;
                cumulative.push(accumulated);
            }

            for _ in 0..size {
                let draw = self.rng.random_range(0.0..1.0);
                // The last slot also absorbs draws that exceed the final
                // cumulative value through floating-point rounding.
                let index = cumulative
                    .iter()
                    .position(|&p| p >= draw)
                    .unwrap_or(size - 1);
                staged.push(self.genes[index]);
            }
        } else {
            warn!("total fitness is zero, falling back to uniform selection");
            for _ in 0..size {
                let index = self.rng.random_range(0..size);
                staged.push(self.genes[index]);
            }
        }

        self.genes = staged;
    }

    /// Walks disjoint consecutive pairs `(0,1), (2,3), …` and crosses each
    /// over with independent probability `pc`.
    pub(crate) fn crossover_pairs(&mut self) {
        let probability = self.rates.crossover.value();

        for pair in self.genes.chunks_exact_mut(2) {
            if self.rng.random_bool(probability)
                && let [first, second] = pair
            {
                first.crossover(second, &self.codec, &mut self.rng);
            }
        }
    }

    /// Mutates each individual independently with probability `pm`.
    pub(crate) fn mutate_all(&mut self) {
        let probability = self.rates.mutation.value();

        for gene in &mut self.genes {
            if self.rng.random_bool(probability) {
                gene.mutate(&self.codec, &mut self.rng);
            }
        }
    }

    /// Recomputes every cached fitness from the current genes.
    pub(crate) fn refresh_fitness(&mut self) {
        for (gene, fitness) in self.genes.iter().zip(self.fitnesses.iter_mut()) {
            let (x, y) = gene.decode(&self.codec);
            *fitness = self.evaluator.fitness(x, y);
        }
    }

    /// Appends the decoded best of the current generation to the history,
    /// ties broken by first occurrence.
    pub(crate) fn record_best(&mut self) {
        let mut index = 0;
        for (i, fitness) in self.fitnesses.iter().enumerate().skip(1) {
            if *fitness > self.fitnesses[index] {
                index = i;
            }
        }

        let (x, y) = self.genes[index].decode(&self.codec);
        self.history.push(Best {
            x,
            y,
            fitness: self.fitnesses[index],
        });
    }

    #[cfg(test)]
    pub(crate) fn genes(&self) -> &[Gene] {
        &self.genes
    }

    #[cfg(test)]
    pub(crate) fn fitnesses(&self) -> &[f64] {
        &self.fitnesses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED_POINTS: [(f64, f64); 4] = [(-5.0, -5.0), (5.0, 5.0), (0.0, 0.0), (2.0, -3.0)];

    fn fixed_population<E: Evaluator>(rates: Rates, evaluator: E) -> Population<E> {
        Population::from_points(
            &SEED_POINTS,
            Codec::default(),
            rates,
            evaluator,
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    #[test]
    fn it_rejects_odd_or_zero_sizes() {
        let codec = Codec::default();
        let rates = Rates::default();

        for size in [0, 3, 7] {
            let result = Population::with_rng(
                size,
                codec,
                rates,
                |_: f64, _: f64| 1.0,
                StdRng::seed_from_u64(1),
            );
            assert!(matches!(
                result,
                Err(PopulationError::InvalidSize { size: s }) if s == size
            ));
        }
    }

    #[test]
    fn it_rejects_out_of_domain_seed_points() {
        let result = Population::from_points(
            &[(0.0, 0.0), (5.5, 0.0)],
            Codec::default(),
            Rates::default(),
            |_: f64, _: f64| 1.0,
            StdRng::seed_from_u64(1),
        );

        assert!(matches!(result, Err(PopulationError::Domain(_))));
    }

    #[test]
    fn it_records_the_seed_generation() {
        let population = fixed_population(Rates::default(), |x: f64, y: f64| x + y);

        assert_eq!(population.history().len(), 1);
        // (5, 5) is the fittest seed point under x + y.
        let best = population.best();
        assert!((best.fitness - 10.0).abs() < 1e-3);
    }

    #[test]
    fn it_clamps_negative_fitness_on_eliminate() {
        let mut population = fixed_population(Rates::default(), |_: f64, _: f64| -1.0);

        assert!(population.fitnesses().iter().all(|&f| f == -1.0));

        population.eliminate();

        assert!(population.fitnesses().iter().all(|&f| f == 0.0));
    }

    #[test]
    fn it_applies_crossover_to_both_pairs() {
        // pc = 1.0, pm = 0.0: every pair must cross over, nothing mutates.
        let mut population = fixed_population(Rates::new(1.0, 0.0).unwrap(), |_: f64, _: f64| 1.0);
        let before = population.genes().to_vec();

        population.crossover_pairs();

        let after = population.genes().to_vec();
        for pair in [(0, 1), (2, 3)] {
            // Suffix exchange: bits that left one gene arrived in the other.
            assert_eq!(
                before[pair.0].x_bits() ^ after[pair.0].x_bits(),
                before[pair.1].x_bits() ^ after[pair.1].x_bits()
            );
            assert_eq!(
                before[pair.0].y_bits() ^ after[pair.0].y_bits(),
                before[pair.1].y_bits() ^ after[pair.1].y_bits()
            );
            // The seed points are pairwise distinct, so the exchange must
            // have changed both operands.
            assert_ne!(before[pair.0], after[pair.0]);
            assert_ne!(before[pair.1], after[pair.1]);
        }

        let codec = Codec::default();
        for gene in after {
            let (x, y) = gene.decode(&codec);
            assert!((-5.0..=5.0).contains(&x));
            assert!((-5.0..=5.0).contains(&y));
        }
    }

    #[test]
    fn it_mutates_every_individual_by_one_bit() {
        // pc = 0.0, pm = 1.0: every individual flips exactly one bit.
        let mut population = fixed_population(Rates::new(0.0, 1.0).unwrap(), |_: f64, _: f64| 1.0);
        let before = population.genes().to_vec();

        population.mutate_all();

        for (before, after) in before.iter().zip(population.genes()) {
            let differing = (before.x_bits() ^ after.x_bits()).count_ones()
                + (before.y_bits() ^ after.y_bits()).count_ones();
            assert_eq!(differing, 1);
        }
    }

    #[test]
    fn it_selects_uniformly_for_equal_fitness() {
        const ROUNDS: usize = 1000;
        const TOLERANCE: f64 = 0.07;

        let mut population = fixed_population(Rates::default(), |_: f64, _: f64| 1.0);
        let original = population.genes.clone();
        let mut counts = [0usize; 4];

        for _ in 0..ROUNDS {
            population.genes = original.clone();
            population.select();

            for gene in &population.genes {
                let index = original.iter().position(|g| g == gene).unwrap();
                counts[index] += 1;
            }
        }

        let draws = (ROUNDS * original.len()) as f64;
        for count in counts {
            let proportion = count as f64 / draws;
            assert!(
                (proportion - 0.25).abs() < TOLERANCE,
                "selection proportion {proportion} deviates from uniform"
            );
        }
    }

    #[test]
    fn it_falls_back_to_uniform_selection_on_zero_total() {
        let mut population = fixed_population(Rates::default(), |_: f64, _: f64| 0.0);
        let original = population.genes.clone();

        population.select();

        assert_eq!(population.genes.len(), original.len());
        for gene in &population.genes {
            assert!(original.contains(gene));
        }
    }

    #[test]
    fn it_records_one_history_entry_per_generation() {
        let mut population = fixed_population(Rates::default(), |x: f64, y: f64| (x + y).abs());

        population.evolve(5);

        assert_eq!(population.history().len(), 6);
    }

    #[test]
    fn it_keeps_fitness_aligned_with_genes_after_evolution() {
        let evaluator = |x: f64, y: f64| (x * y).abs() + 0.1;
        let mut population = fixed_population(Rates::default(), evaluator);

        population.evolve(10);

        let codec = Codec::default();
        for (gene, &fitness) in population.genes().iter().zip(population.fitnesses()) {
            let (x, y) = gene.decode(&codec);
            assert_eq!(fitness, evaluator(x, y));
        }
    }

    #[test]
    fn it_returns_the_history_maximum_with_latest_tie() {
        let mut population = fixed_population(Rates::default(), |_: f64, _: f64| 1.0);

        population.history = vec![
            Best {
                x: 0.0,
                y: 0.0,
                fitness: 1.0,
            },
            Best {
                x: 1.0,
                y: 1.0,
                fitness: 3.0,
            },
            Best {
                x: 2.0,
                y: 2.0,
                fitness: 2.0,
            },
            Best {
                x: 3.0,
                y: 3.0,
                fitness: 3.0,
            },
        ];

        let best = population.best();
        assert_eq!(best.fitness, 3.0);
        // Equal fitness resolves to the latest entry.
        assert_eq!(best.x, 3.0);
    }

    #[test]
    fn it_breaks_record_ties_by_first_occurrence() {
        let mut population = fixed_population(Rates::default(), |_: f64, _: f64| 1.0);
        population.history.clear();

        population.record_best();

        // All fitness values equal: index 0 wins, which decodes to (-5, -5).
        let recorded = population.history[0];
        assert!((recorded.x - -5.0).abs() < 1e-3);
        assert!((recorded.y - -5.0).abs() < 1e-3);
    }
}
