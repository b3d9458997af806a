use super::{GenomeLogic, DEFAULT_MUTATION_RATE};
use crate::config::MutatePolicy;
use ontogeny_data::Genome;
use rand::Rng;

/// Standard-normal sample via the Irwin-Hall sum of twelve uniforms.
pub(crate) fn gaussian<R: Rng>(rng: &mut R) -> f32 {
    let sum: f32 = (0..12).map(|_| rng.gen::<f32>()).sum();
    sum - 6.0
}

pub fn mutate<R: Rng>(genome: &mut Genome, policy: MutatePolicy, rng: &mut R) {
    match policy {
        MutatePolicy::BitFlip { rate } => {
            let rate = resolve_rate(genome, rate);
            for offset in 0..genome.bytes.len() {
                for bit in 0..8u8 {
                    if rng.gen::<f32>() < rate {
                        genome.bytes[offset] ^= 1 << bit;
                    }
                }
            }
        }
        MutatePolicy::ByteJitter { rate, stddev } => {
            let rate = resolve_rate(genome, rate);
            for offset in 0..genome.bytes.len() {
                if rng.gen::<f32>() < rate {
                    let jittered = f32::from(genome.bytes[offset]) + gaussian(rng) * stddev;
                    genome.bytes[offset] = jittered.clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

fn resolve_rate(genome: &Genome, configured: Option<f32>) -> f32 {
    configured
        .or_else(|| genome.encoded_mutation_rate())
        .unwrap_or(DEFAULT_MUTATION_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GeneCatalogBuilder;
    use crate::layout;
    use ontogeny_data::GenomeSchema;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn genome() -> Genome {
        let mut builder = GeneCatalogBuilder::new();
        builder.scalar("A", [0.0, 1.0]).scalar("B", [-5.0, 5.0]);
        let catalog = builder.complete();
        let genome_layout = layout::linear(&catalog);
        Genome::new(Arc::new(GenomeSchema::new(catalog, genome_layout)))
    }

    #[test]
    fn test_zero_rate_changes_nothing() {
        let mut g = genome();
        g.bytes.fill(0x5A);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        mutate(&mut g, MutatePolicy::BitFlip { rate: Some(0.0) }, &mut rng);
        assert!(g.bytes.iter().all(|&b| b == 0x5A));
    }

    #[test]
    fn test_full_rate_flips_every_bit() {
        let mut g = genome();
        g.bytes.fill(0x0F);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        mutate(&mut g, MutatePolicy::BitFlip { rate: Some(1.0) }, &mut rng);
        assert!(g.bytes.iter().all(|&b| b == 0xF0));
    }

    #[test]
    fn test_decoded_values_stay_in_range() {
        let mut g = genome();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            mutate(
                &mut g,
                MutatePolicy::ByteJitter {
                    rate: Some(0.5),
                    stddev: 64.0,
                },
                &mut rng,
            );
            let b = g.get("B");
            assert!((-5.0..=5.0).contains(&b), "decoded value {b} out of range");
        }
    }

    #[test]
    fn test_byte_jitter_moves_bytes() {
        let mut g = genome();
        g.bytes.fill(128);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        mutate(
            &mut g,
            MutatePolicy::ByteJitter {
                rate: Some(1.0),
                stddev: 32.0,
            },
            &mut rng,
        );
        assert!(g.bytes.iter().any(|&b| b != 128));
    }
}
