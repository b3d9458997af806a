//! Configuration management for the genome and brain subsystem.
//!
//! Strongly-typed configuration structures that map to the `config.toml`
//! file. Every numeric range and toggle consumed by the gene catalog, the
//! growth algorithm and the runtime models comes from here.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [genome]
//! layout = "Grouped"
//! mate_power = 4.0
//!
//! [genome.mutate]
//! policy = "BitFlip"
//!
//! [groups]
//! max_internal_groups = 5
//! connection_density = [0.0, 1.0]
//!
//! [brain]
//! model = "Rate"
//! max_weight = 8.0
//! learning = true
//! ```

use ontogeny_data::LayoutStrategy;
use serde::{Deserialize, Serialize};

/// How `randomize` fills a genome's mutable bytes. The policy is chosen
/// at configuration time, not per call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy")]
pub enum RandomizePolicy {
    /// Independent per-bit coin flips with the given on-probability.
    BitFlip { p_on: f32 },
    /// Per-byte Gaussian jitter around `mean` (both in byte units).
    GaussianByte { mean: f32, stddev: f32 },
    /// Uniform byte sampling over the full range.
    UniformByte,
}

impl Default for RandomizePolicy {
    fn default() -> Self {
        Self::BitFlip { p_on: 0.5 }
    }
}

/// How `mutate` perturbs a genome. Bit-level and byte-level operation are
/// alternative, mutually exclusive configurations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy")]
pub enum MutatePolicy {
    /// Flip individual bits at `rate`; `None` reads the rate from the
    /// genome's own mutation-rate gene.
    BitFlip { rate: Option<f32> },
    /// Gaussian jitter on whole bytes at `rate` per byte.
    ByteJitter { rate: Option<f32>, stddev: f32 },
}

impl Default for MutatePolicy {
    fn default() -> Self {
        Self::BitFlip { rate: None }
    }
}

/// Crossover point-selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum CrossoverPolicy {
    /// Alternating byte ranges between `points` cut positions; `None`
    /// reads the count from the child's crossover-points gene. With three
    /// or more points one cut is forced inside the physical scalar prefix.
    Positional { points: Option<usize> },
    /// Walks the catalog's named crossover levels and copies one
    /// level-defined segment at a time. Each probability is the chance of
    /// switching parents at that boundary kind.
    Hierarchical {
        group_p: f32,
        attr_p: f32,
        byte_p: f32,
    },
}

impl Default for CrossoverPolicy {
    fn default() -> Self {
        Self::Positional { points: None }
    }
}

/// Genome-level configuration: layout and operator policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeConfig {
    pub layout: LayoutStrategy,
    pub randomize: RandomizePolicy,
    pub mutate: MutatePolicy,
    pub crossover: CrossoverPolicy,
    /// Exponent of `(1 - separation)` in the mate-probability curve.
    pub mate_power: f32,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            layout: LayoutStrategy::Grouped,
            randomize: RandomizePolicy::default(),
            mutate: MutatePolicy::default(),
            crossover: CrossoverPolicy::default(),
            mate_power: 4.0,
        }
    }
}

/// Seeding mode for freshly created genomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeedMode {
    /// Designer starting wiring: positive mate bias, color groups wired
    /// to matching behaviors.
    #[default]
    Designer,
    /// Direct reflexes only, zero internal groups.
    Minimal,
    /// Leave the genome untouched after randomization.
    None,
}

/// One declared input neuron group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputGroupSpec {
    pub name: String,
    /// Ranged groups carry a neuron-count gene; fixed groups hold one
    /// neuron.
    #[serde(default)]
    pub ranged: bool,
}

impl InputGroupSpec {
    #[must_use]
    pub fn fixed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ranged: false,
        }
    }

    #[must_use]
    pub fn ranged(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ranged: true,
        }
    }
}

/// Gene ranges and group architecture bounds for the groups catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsConfig {
    /// Input neuron groups, in slot order.
    pub input_groups: Vec<InputGroupSpec>,
    /// Output neuron groups, in slot order. One neuron each.
    pub output_groups: Vec<String>,
    /// Neuron count range of each ranged input group.
    pub vision_neurons: [f32; 2],
    /// Maximum evolvable internal group count.
    pub max_internal_groups: usize,
    /// Excitatory and inhibitory neuron count range per internal group.
    pub internal_neurons: [f32; 2],
    /// Bias range is `[-bias_max, bias_max]` for every non-input group.
    pub bias_max: f32,
    pub bias_learning_rate: [f32; 2],
    pub connection_density: [f32; 2],
    pub learning_rate: [f32; 2],
    pub topological_distortion: [f32; 2],
    /// Leaky-integrator time constant range (rate model only).
    pub tau: [f32; 2],
    pub mutation_rate: [f32; 2],
    pub crossover_points: [f32; 2],
    /// Externally consumed physiology scalars.
    pub life_span: [f32; 2],
    pub strength: [f32; 2],
    pub max_speed: [f32; 2],
    pub seed_mode: SeedMode,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            input_groups: vec![
                InputGroupSpec::fixed("Random"),
                InputGroupSpec::fixed("Energy"),
                InputGroupSpec::ranged("Red"),
                InputGroupSpec::ranged("Green"),
                InputGroupSpec::ranged("Blue"),
            ],
            output_groups: ["Eat", "Mate", "Fight", "Speed", "Yaw", "Light", "Focus"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vision_neurons: [1.0, 8.0],
            max_internal_groups: 5,
            internal_neurons: [1.0, 16.0],
            bias_max: 1.0,
            bias_learning_rate: [-0.1, 0.1],
            connection_density: [0.0, 1.0],
            learning_rate: [0.0, 0.1],
            topological_distortion: [0.0, 1.0],
            tau: [0.1, 0.9],
            mutation_rate: [0.001, 0.1],
            crossover_points: [2.0, 8.0],
            life_span: [500.0, 1500.0],
            strength: [0.5, 2.0],
            max_speed: [0.5, 1.5],
            seed_mode: SeedMode::Designer,
        }
    }
}

/// Runtime model selection. The active variant never changes after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModelVariant {
    #[default]
    Rate,
    Spiking,
}

/// Neuron-runtime configuration shared by both model variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub model: ModelVariant,
    /// Slope of the logistic squashing function.
    pub logistic_slope: f32,
    /// Hard bound on synaptic efficacy magnitude.
    pub max_weight: f32,
    /// Upper bound of initial efficacy magnitudes at growth time.
    pub init_max_weight: f32,
    /// Exponential decay factor of the Hebbian soft clamp.
    pub decay_rate: f32,
    /// Whether synaptic learning runs at all.
    pub learning: bool,
    /// Enables the leaky-integrator update in the rate model.
    pub leaky_integrator: bool,
    /// Activation every neuron starts with at birth.
    pub initial_activation: f32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            model: ModelVariant::Rate,
            logistic_slope: 1.0,
            max_weight: 8.0,
            init_max_weight: 0.5,
            decay_rate: 0.99,
            learning: true,
            leaky_integrator: false,
            initial_activation: 0.1,
        }
    }
}

/// Spiking-model parameters (Variant B only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikingConfig {
    /// Integration sub-steps per simulation timestep.
    pub substeps: usize,
    /// Integration step size in model milliseconds.
    pub dt: f32,
    /// Scale from `[0,1]` input activation to injected current.
    pub input_current_scale: f32,
    /// Timesteps in the firing-rate estimation window.
    pub rate_window: usize,
    /// Weight nudge amplitude of a paired pre/post spike.
    pub stdp_amplitude: f32,
    /// Per-step decay of the plasticity trace.
    pub trace_decay: f32,
    /// Gene ranges for the four per-group spiking parameters.
    pub param_a: [f32; 2],
    pub param_b: [f32; 2],
    pub param_c: [f32; 2],
    pub param_d: [f32; 2],
}

impl Default for SpikingConfig {
    fn default() -> Self {
        Self {
            substeps: 10,
            dt: 1.0,
            input_current_scale: 20.0,
            rate_window: 10,
            stdp_amplitude: 0.01,
            trace_decay: 0.9,
            param_a: [0.02, 0.1],
            param_b: [0.2, 0.25],
            param_c: [-65.0, -50.0],
            param_d: [2.0, 8.0],
        }
    }
}

/// Top-level configuration for the whole subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OntogenyConfig {
    pub genome: GenomeConfig,
    pub groups: GroupsConfig,
    pub brain: BrainConfig,
    pub spiking: SpikingConfig,
}

impl OntogenyConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing sections.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        Ok(config)
    }
}
