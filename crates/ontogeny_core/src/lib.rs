//! # Ontogeny Core
//!
//! The genetic-encoding and neural-development engine: a packed bit-level
//! genome grows, at birth, into a concrete neural network that is updated
//! every simulated timestep and recombined at reproduction.
//!
//! This crate contains the deterministic pipeline logic, including:
//! - Two-phase gene catalog construction and the grouped genome layout
//! - Genome operations (decode, seed, randomize, mutate, crossover)
//! - The groups catalog used by the default brain architecture
//! - Brain growth from genome bytes to wired neuron/synapse arrays
//! - Two interchangeable neuron runtime models (rate-based and spiking)
//!
//! ## Example
//!
//! ```
//! use ontogeny_core::brain::grow_with_rng;
//! use ontogeny_core::config::OntogenyConfig;
//! use ontogeny_core::genome::GenomeLogic;
//! use ontogeny_core::groups::GroupsCatalog;
//! use ontogeny_data::Genome;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = OntogenyConfig::default();
//! let groups = GroupsCatalog::new(&config);
//!
//! // Build a random genome and grow its brain.
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut genome = Genome::new(groups.schema());
//! genome.randomize_with_rng(config.genome.randomize, &mut rng);
//!
//! let mut grown = grow_with_rng(&genome, &groups, &config, &mut rng);
//! grown.set_input("Energy", 0.8);
//! grown.update(false);
//! let eat = grown.output("Eat");
//! assert!((0.0..=1.0).contains(&eat));
//! ```

/// Batch growth for external evaluation drivers
pub mod batch;
/// Brain growth and the two neuron runtime models
pub mod brain;
/// Two-phase gene catalog construction
pub mod catalog;
/// Configuration management for pipeline parameters
pub mod config;
/// Genome operations: decode, seed, randomize, mutate, crossover
pub mod genome;
/// The groups gene catalog of the default brain architecture
pub mod groups;
/// Physical byte ordering of the genome buffer
pub mod layout;
/// Lifecycle metrics and structured logging
pub mod metrics;
/// String-keyed nerve abstraction over the activation array
pub mod nerves;

pub use brain::{grow_with_rng, BrainModel, GrownBrain, NeuronModel};
pub use catalog::GeneCatalogBuilder;
pub use config::OntogenyConfig;
pub use genome::GenomeLogic;
pub use groups::GroupsCatalog;
pub use metrics::{init_logging, Metrics};
pub use nerves::{Nerve, NerveSet};
