//! Batch growth for external evaluation drivers.
//!
//! Every organism's state is independent; only the shared, read-only
//! groups catalog is touched concurrently. Each genome gets its own RNG
//! stream derived from the base seed and its position, so results do not
//! depend on scheduling.

use crate::brain::{grow_with_rng, GrownBrain};
use crate::config::OntogenyConfig;
use crate::groups::GroupsCatalog;
use ontogeny_data::Genome;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn stream_rng(base_seed: u64, index: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(base_seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// Grow one brain per genome, in parallel when the `parallel` feature is
/// enabled.
#[cfg(feature = "parallel")]
pub fn grow_batch(
    genomes: &[Genome],
    groups: &GroupsCatalog,
    config: &OntogenyConfig,
    base_seed: u64,
) -> Vec<GrownBrain> {
    genomes
        .par_iter()
        .enumerate()
        .map(|(index, genome)| {
            let mut rng = stream_rng(base_seed, index);
            grow_with_rng(genome, groups, config, &mut rng)
        })
        .collect()
}

/// Grow one brain per genome, sequentially.
#[cfg(not(feature = "parallel"))]
pub fn grow_batch(
    genomes: &[Genome],
    groups: &GroupsCatalog,
    config: &OntogenyConfig,
    base_seed: u64,
) -> Vec<GrownBrain> {
    genomes
        .iter()
        .enumerate()
        .map(|(index, genome)| {
            let mut rng = stream_rng(base_seed, index);
            grow_with_rng(genome, groups, config, &mut rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeLogic;

    #[test]
    fn test_batch_matches_sequential_growth() {
        let config = OntogenyConfig::default();
        let groups = GroupsCatalog::new(&config);

        let mut genomes = Vec::new();
        for i in 0..4u64 {
            let mut g = Genome::new(groups.schema());
            let mut rng = ChaCha8Rng::seed_from_u64(i);
            g.randomize_with_rng(config.genome.randomize, &mut rng);
            genomes.push(g);
        }

        let batch = grow_batch(&genomes, &groups, &config, 99);
        assert_eq!(batch.len(), 4);
        for (index, grown) in batch.iter().enumerate() {
            let mut rng = stream_rng(99, index);
            let solo = grow_with_rng(&genomes[index], &groups, &config, &mut rng);
            assert_eq!(grown.dimensions, solo.dimensions);
        }
    }
}
