use serde::{Deserialize, Serialize};

/// Directional synapse class. The first letter is the source polarity,
/// the second the target polarity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SynapseType {
    /// Excitatory source, excitatory target.
    EE,
    /// Excitatory source, inhibitory target.
    EI,
    /// Inhibitory source, excitatory target.
    IE,
    /// Inhibitory source, inhibitory target.
    II,
}

impl SynapseType {
    /// All four types, in catalog declaration order.
    pub const ALL: [SynapseType; 4] = [
        SynapseType::EE,
        SynapseType::EI,
        SynapseType::IE,
        SynapseType::II,
    ];

    /// Index of this type inside [`Self::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            SynapseType::EE => 0,
            SynapseType::EI => 1,
            SynapseType::IE => 2,
            SynapseType::II => 3,
        }
    }

    /// Whether the source side of this type is inhibitory.
    #[must_use]
    pub fn from_inhibitory(self) -> bool {
        matches!(self, SynapseType::IE | SynapseType::II)
    }

    /// Whether the target side of this type is inhibitory.
    #[must_use]
    pub fn to_inhibitory(self) -> bool {
        matches!(self, SynapseType::EI | SynapseType::II)
    }

    /// Sign carried by efficacies and learning rates of this type.
    #[must_use]
    pub fn sign(self) -> f32 {
        if self.from_inhibitory() {
            -1.0
        } else {
            1.0
        }
    }
}

/// Shape of one grown network, computed once at growth time.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimensions {
    /// Total neuron count.
    pub neurons: usize,
    /// Leading input neurons (activations set externally each step).
    pub input_neurons: usize,
    /// Output neurons, immediately after the inputs.
    pub output_neurons: usize,
    /// Total synapse count.
    pub synapses: usize,
}

impl Dimensions {
    /// Neurons whose activation is computed rather than sensed.
    #[must_use]
    pub fn non_input_neurons(&self) -> usize {
        self.neurons - self.input_neurons
    }

    /// Index of the first output neuron.
    #[must_use]
    pub fn first_output(&self) -> usize {
        self.input_neurons
    }
}

/// Spiking-model parameters decoded per group.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpikeParams {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Default for SpikeParams {
    fn default() -> Self {
        // Regular-spiking defaults of the two-variable quadratic model.
        Self {
            a: 0.02,
            b: 0.2,
            c: -65.0,
            d: 8.0,
        }
    }
}

/// Group-level attributes applied identically to every neuron in a group.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NeuronAttrs {
    /// Additive bias on the integrated input.
    pub bias: f32,
    /// Learning rate applied to the virtual bias synapse.
    pub bias_learning_rate: f32,
    /// Leaky-integrator time constant; 1.0 disables the leak.
    pub tau: f32,
    /// Spiking-model parameters (ignored by the rate model).
    pub spike: SpikeParams,
}

/// One grown neuron record. Allocated exactly once per organism.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Neuron {
    /// Group this neuron belongs to.
    pub group: usize,
    /// Whether the neuron is inhibitory.
    pub inhibitory: bool,
    /// Group-decoded attributes.
    pub attrs: NeuronAttrs,
    /// First index of this neuron's incoming synapses.
    pub syn_lo: usize,
    /// One past the last index of this neuron's incoming synapses.
    pub syn_hi: usize,
}

/// One grown synapse record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Synapse {
    /// Source neuron index.
    pub from: usize,
    /// Target neuron index.
    pub to: usize,
    /// Signed efficacy; sign matches the synapse's declared polarity.
    pub efficacy: f32,
    /// Signed per-synapse learning rate.
    pub learning_rate: f32,
}

/// Neural activation buffers: current and previous step.
///
/// The two vectors swap roles each step instead of copying.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Activations(pub Vec<f32>, pub Vec<f32>);

impl Default for Activations {
    fn default() -> Self {
        Self(Vec::new(), Vec::new())
    }
}

impl Activations {
    /// Allocate both buffers for `neurons` entries at `initial`.
    #[must_use]
    pub fn new(neurons: usize, initial: f32) -> Self {
        Self(vec![initial; neurons], vec![initial; neurons])
    }

    /// Swap the current/previous roles.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.0, &mut self.1);
    }
}
