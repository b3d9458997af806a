pub mod growth;
pub mod rate;
pub mod spiking;

use ontogeny_data::{Dimensions, Neuron, NeuronAttrs, Synapse};
use std::io::Write;

pub use growth::{grow_with_rng, GrownBrain};
pub use rate::RateModel;
pub use spiking::SpikingModel;

/// Common contract of the neuron runtime variants.
///
/// The surrounding simulation writes input activations each step through
/// [`NeuronModel::set_activation`], calls [`NeuronModel::update`] once per
/// timestep, and reads outputs back through [`NeuronModel::activation`],
/// agnostic to which variant grew the brain.
pub trait NeuronModel {
    /// Allocate all per-organism arrays. Runs exactly once, at birth.
    fn init(&mut self, dims: Dimensions, initial_activation: f32);

    /// Install one grown neuron record and its incoming synapse range.
    fn set_neuron(&mut self, index: usize, attrs: &NeuronAttrs, syn_lo: usize, syn_hi: usize);

    /// Install one grown synapse record.
    fn set_synapse(&mut self, index: usize, from: usize, to: usize, efficacy: f32, learning_rate: f32);

    /// Advance activations one timestep. `learn` is false while the
    /// organism is frozen or learning is disabled.
    fn update(&mut self, learn: bool);

    /// Externally drive one (input) neuron's activation.
    fn set_activation(&mut self, index: usize, value: f32);

    /// Current activation of a neuron.
    fn activation(&self, index: usize) -> f32;

    /// Shape of the grown network.
    fn dimensions(&self) -> &Dimensions;

    /// Write the normalized (N+1)x(N+1) per-mille from x to strength
    /// matrix, including the virtual bias row, one row per line.
    fn dump_anatomical(&self, w: &mut dyn Write) -> std::io::Result<()>;

    /// Write one line of every neuron's current activation.
    fn dump_functional(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Closed set of runtime variants, selected once at configuration time.
pub enum BrainModel {
    Rate(RateModel),
    Spiking(SpikingModel),
}

impl BrainModel {
    /// The active variant as the common trait object.
    pub fn model(&mut self) -> &mut dyn NeuronModel {
        match self {
            BrainModel::Rate(m) => m,
            BrainModel::Spiking(m) => m,
        }
    }

    pub fn as_model(&self) -> &dyn NeuronModel {
        match self {
            BrainModel::Rate(m) => m,
            BrainModel::Spiking(m) => m,
        }
    }
}

/// The logistic squashing function used by the rate model.
#[must_use]
pub fn logistic(x: f32, slope: f32) -> f32 {
    1.0 / (1.0 + (-slope * x).exp())
}

/// Shared anatomical dump: per-mille strengths normalized to the maximum
/// weight, row `i` holding the synapses from neuron `i`, with a final
/// virtual bias row and an all-zero bias column.
pub(crate) fn write_anatomical(
    w: &mut dyn Write,
    dims: &Dimensions,
    neurons: &[Neuron],
    synapses: &[Synapse],
    max_weight: f32,
) -> std::io::Result<()> {
    let n = dims.neurons;
    let mut matrix = vec![0i32; (n + 1) * (n + 1)];

    let per_mille = |value: f32| -> i32 {
        ((value / max_weight) * 1000.0).round().clamp(-1000.0, 1000.0) as i32
    };

    for syn in synapses {
        matrix[syn.from * (n + 1) + syn.to] = per_mille(syn.efficacy);
    }
    for (idx, neuron) in neurons.iter().enumerate() {
        matrix[n * (n + 1) + idx] = per_mille(neuron.attrs.bias);
    }

    for row in 0..=n {
        let cells = &matrix[row * (n + 1)..(row + 1) * (n + 1)];
        let line: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
        writeln!(w, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Shared functional dump row: every activation, space separated.
pub(crate) fn write_functional_row(
    w: &mut dyn Write,
    activations: &[f32],
) -> std::io::Result<()> {
    let line: Vec<String> = activations.iter().map(|a| format!("{a:.6}")).collect();
    writeln!(w, "{}", line.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_midpoint_and_limits() {
        assert!((logistic(0.0, 1.0) - 0.5).abs() < 1e-6);
        assert!(logistic(20.0, 1.0) > 0.999);
        assert!(logistic(-20.0, 1.0) < 0.001);
        // Steeper slope moves faster from the midpoint.
        assert!(logistic(1.0, 4.0) > logistic(1.0, 1.0));
    }

    #[test]
    fn test_anatomical_matrix_shape() {
        let dims = Dimensions {
            neurons: 2,
            input_neurons: 1,
            output_neurons: 1,
            synapses: 1,
        };
        let neurons = vec![
            Neuron {
                group: 0,
                inhibitory: false,
                attrs: Default::default(),
                syn_lo: 0,
                syn_hi: 0,
            },
            Neuron {
                group: 1,
                inhibitory: false,
                attrs: ontogeny_data::NeuronAttrs {
                    bias: 4.0,
                    ..Default::default()
                },
                syn_lo: 0,
                syn_hi: 1,
            },
        ];
        let synapses = vec![Synapse {
            from: 0,
            to: 1,
            efficacy: 8.0,
            learning_rate: 0.0,
        }];

        let mut out = Vec::new();
        write_anatomical(&mut out, &dims, &neurons, &synapses, 8.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.split(' ').count() == 3));
        // Full-strength synapse 0->1 is 1000 per-mille.
        assert_eq!(rows[0], "0 1000 0");
        // Virtual bias row carries neuron 1's bias at half strength.
        assert_eq!(rows[2], "0 500 0");
    }
}
