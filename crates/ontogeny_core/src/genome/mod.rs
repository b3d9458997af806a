pub mod crossover;
pub mod mutation;

use crate::config::{GenomeConfig, RandomizePolicy};
use crate::groups::{CrossoverLevels, MUTATION_RATE};
use ontogeny_data::Genome;
use rand::Rng;

/// Fallback mutation rate when a catalog carries no mutation-rate gene.
pub const DEFAULT_MUTATION_RATE: f32 = 0.01;

/// Fallback crossover point count when a catalog carries no
/// crossover-points gene.
pub const DEFAULT_CROSSOVER_POINTS: usize = 4;

/// Trait defining the heritable-data operations on a genome.
pub trait GenomeLogic {
    /// Decode a single-element gene by name. A missing gene is fatal.
    fn get(&self, name: &str) -> f32;

    /// Decode element `idx` of a gene by name. A missing gene or an
    /// out-of-range element is fatal.
    fn get_at(&self, name: &str, idx: usize) -> f32;

    /// Deterministically set a single-element gene from a `[0,1]` ratio.
    fn seed(&mut self, name: &str, ratio: f32);

    /// Deterministically set element `idx` of a gene from a `[0,1]` ratio.
    fn seed_at(&mut self, name: &str, idx: usize, ratio: f32);

    /// Fill every mutable byte according to the configured policy.
    fn randomize_with_rng<R: Rng>(&mut self, policy: RandomizePolicy, rng: &mut R);

    /// Perturb mutable bits/bytes according to the configured policy.
    fn mutate_with_config<R: Rng>(&mut self, config: &GenomeConfig, rng: &mut R);

    /// Produce a child genome from two parents. Parents are never
    /// mutated; the child buffer is freshly allocated.
    fn crossover_with_config<R: Rng>(
        &self,
        other: &Genome,
        config: &GenomeConfig,
        levels: &CrossoverLevels,
        mutate_after: bool,
        rng: &mut R,
    ) -> Genome;

    /// Gene-weighted normalized byte distance in `[0,1]`.
    fn separation(&self, other: &Genome) -> f32;

    /// Mate probability `(1 - separation)^power`.
    fn mate_probability(&self, other: &Genome, power: f32) -> f32;

    /// The genome's own encoded mutation rate, when the catalog has one.
    fn encoded_mutation_rate(&self) -> Option<f32>;
}

impl GenomeLogic for Genome {
    fn get(&self, name: &str) -> f32 {
        self.get_at(name, 0)
    }

    fn get_at(&self, name: &str, idx: usize) -> f32 {
        let gene = self.schema.catalog.require(name);
        match gene.span {
            Some(span) => gene.interpolate(self.raw(span.element(idx))),
            None => gene.min,
        }
    }

    fn seed(&mut self, name: &str, ratio: f32) {
        self.seed_at(name, 0, ratio);
    }

    fn seed_at(&mut self, name: &str, idx: usize, ratio: f32) {
        let schema = self.schema.clone();
        let gene = schema.catalog.require(name);
        let span = gene
            .span
            .unwrap_or_else(|| panic!("gene '{name}' is constant and cannot be seeded"));
        self.set_raw(span.element(idx), gene.raw_for_ratio(ratio));
    }

    fn randomize_with_rng<R: Rng>(&mut self, policy: RandomizePolicy, rng: &mut R) {
        match policy {
            RandomizePolicy::BitFlip { p_on } => {
                for byte in &mut self.bytes {
                    let mut value = 0u8;
                    for bit in 0..8 {
                        if rng.gen::<f32>() < p_on {
                            value |= 1 << bit;
                        }
                    }
                    *byte = value;
                }
            }
            RandomizePolicy::GaussianByte { mean, stddev } => {
                for byte in &mut self.bytes {
                    let sample = mean + mutation::gaussian(rng) * stddev;
                    *byte = sample.clamp(0.0, 255.0) as u8;
                }
            }
            RandomizePolicy::UniformByte => {
                for byte in &mut self.bytes {
                    *byte = rng.gen();
                }
            }
        }
    }

    fn mutate_with_config<R: Rng>(&mut self, config: &GenomeConfig, rng: &mut R) {
        mutation::mutate(self, config.mutate, rng);
    }

    fn crossover_with_config<R: Rng>(
        &self,
        other: &Genome,
        config: &GenomeConfig,
        levels: &CrossoverLevels,
        mutate_after: bool,
        rng: &mut R,
    ) -> Genome {
        let mut child = crossover::crossover(self, other, &config.crossover, levels, rng);
        if mutate_after {
            child.mutate_with_config(config, rng);
        }
        child
    }

    fn separation(&self, other: &Genome) -> f32 {
        assert_eq!(
            self.len(),
            other.len(),
            "separation across mismatched schemas"
        );
        let mut weighted_diff = 0.0f32;
        let mut weight_total = 0.0f32;
        for gene in self.schema.catalog.genes() {
            let Some(span) = gene.span else { continue };
            for idx in 0..span.count {
                let offset = span.element(idx);
                let diff = f32::from(self.raw(offset).abs_diff(other.raw(offset)));
                weighted_diff += gene.weight * diff / 255.0;
                weight_total += gene.weight;
            }
        }
        if weight_total == 0.0 {
            // Sentinel for an all-constant catalog; callers check before use.
            return 0.0;
        }
        weighted_diff / weight_total
    }

    fn mate_probability(&self, other: &Genome, power: f32) -> f32 {
        (1.0 - self.separation(other)).powf(power)
    }

    fn encoded_mutation_rate(&self) -> Option<f32> {
        self.schema
            .catalog
            .gene(MUTATION_RATE)
            .map(|_| self.get(MUTATION_RATE))
    }
}
