//! # Ontogeny
//!
//! Genetic encoding and neural development for agent-based artificial
//! life: a packed bit-level genome deterministically grows into a neural
//! network at birth, runs one activation update per simulated timestep
//! (with optional Hebbian plasticity), and recombines through crossover
//! and mutation at reproduction.
//!
//! ## Quick Start
//!
//! ```
//! use ontogeny_lib::{GenomeLogic, GroupsCatalog, OntogenyConfig};
//! use ontogeny_data::Genome;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = OntogenyConfig::default();
//! let groups = GroupsCatalog::new(&config);
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut genome = Genome::new(groups.schema());
//! genome.randomize_with_rng(config.genome.randomize, &mut rng);
//! groups.seed(&mut genome, config.groups.seed_mode);
//!
//! let mut brain = ontogeny_lib::grow_with_rng(&genome, &groups, &config, &mut rng);
//! brain.set_input("Energy", 0.9);
//! brain.update(true);
//! println!("Eat drive: {}", brain.output("Eat"));
//! ```

pub use ontogeny_core::brain::{grow_with_rng, BrainModel, GrownBrain, NeuronModel};
pub use ontogeny_core::config::OntogenyConfig;
pub use ontogeny_core::genome::GenomeLogic;
pub use ontogeny_core::groups::GroupsCatalog;
pub use ontogeny_core::metrics::{init_logging, Metrics};
pub use ontogeny_core::nerves::{Nerve, NerveSet};
pub use ontogeny_data::{Dimensions, Genome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
