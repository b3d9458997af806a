//! Rate-based neuron runtime (Variant A).
//!
//! Two equal-length activation buffers swap roles each step instead of
//! copying. Input-neuron activations are set externally by the
//! surrounding simulation; every other neuron squashes its weighted input
//! sum through the logistic function, optionally as a leaky integrator.

use super::{logistic, write_anatomical, write_functional_row, NeuronModel};
use crate::config::BrainConfig;
use ontogeny_data::{Activations, Dimensions, Neuron, NeuronAttrs, Synapse};
use std::io::Write;

/// Efficacy magnitudes never reach zero, so a synapse keeps its polarity
/// for life.
const MIN_EFFICACY: f32 = 1e-10;

pub struct RateModel {
    logistic_slope: f32,
    max_weight: f32,
    decay_rate: f32,
    learning_enabled: bool,
    leaky: bool,
    dims: Dimensions,
    neurons: Vec<Neuron>,
    synapses: Vec<Synapse>,
    activations: Activations,
}

impl RateModel {
    #[must_use]
    pub fn new(config: &BrainConfig) -> Self {
        Self {
            logistic_slope: config.logistic_slope,
            max_weight: config.max_weight,
            decay_rate: config.decay_rate,
            learning_enabled: config.learning,
            leaky: config.leaky_integrator,
            dims: Dimensions::default(),
            neurons: Vec::new(),
            synapses: Vec::new(),
            activations: Activations::default(),
        }
    }

    /// The grown synapse array (read-only).
    #[must_use]
    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    /// The grown neuron array (read-only).
    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    fn learn_step(&mut self) {
        let half_max = 0.5 * self.max_weight;
        for syn in &mut self.synapses {
            let pre = self.activations.1[syn.from];
            let post = self.activations.0[syn.to];
            syn.efficacy += syn.learning_rate * (post - 0.5) * (pre - 0.5);

            // Soft clamp: decay oversized magnitudes toward the maximum
            // instead of hard-clipping at it.
            let magnitude = syn.efficacy.abs();
            if magnitude > half_max {
                syn.efficacy *=
                    1.0 - (1.0 - self.decay_rate) * (magnitude - half_max) / half_max;
            }
            if syn.learning_rate.is_sign_negative() {
                syn.efficacy = syn.efficacy.clamp(-self.max_weight, -MIN_EFFICACY);
            } else {
                syn.efficacy = syn.efficacy.clamp(MIN_EFFICACY, self.max_weight);
            }
        }

        for idx in self.dims.input_neurons..self.dims.neurons {
            let post = self.activations.0[idx];
            let neuron = &mut self.neurons[idx];
            if neuron.attrs.bias_learning_rate != 0.0 {
                neuron.attrs.bias += neuron.attrs.bias_learning_rate * (post - 0.5) * 0.5;
                neuron.attrs.bias = neuron.attrs.bias.clamp(-self.max_weight, self.max_weight);
            }
        }
    }
}

impl NeuronModel for RateModel {
    fn init(&mut self, dims: Dimensions, initial_activation: f32) {
        self.dims = dims;
        self.neurons = vec![
            Neuron {
                group: 0,
                inhibitory: false,
                attrs: NeuronAttrs::default(),
                syn_lo: 0,
                syn_hi: 0,
            };
            dims.neurons
        ];
        self.synapses = vec![
            Synapse {
                from: 0,
                to: 0,
                efficacy: 0.0,
                learning_rate: 0.0,
            };
            dims.synapses
        ];
        self.activations = Activations::new(dims.neurons, initial_activation);
    }

    fn set_neuron(&mut self, index: usize, attrs: &NeuronAttrs, syn_lo: usize, syn_hi: usize) {
        let neuron = &mut self.neurons[index];
        neuron.attrs = *attrs;
        neuron.syn_lo = syn_lo;
        neuron.syn_hi = syn_hi;
    }

    fn set_synapse(
        &mut self,
        index: usize,
        from: usize,
        to: usize,
        efficacy: f32,
        learning_rate: f32,
    ) {
        self.synapses[index] = Synapse {
            from,
            to,
            efficacy,
            learning_rate,
        };
    }

    fn update(&mut self, learn: bool) {
        self.activations.flip();

        // Inputs keep their externally supplied values.
        for idx in 0..self.dims.input_neurons {
            self.activations.0[idx] = self.activations.1[idx];
        }

        for idx in self.dims.input_neurons..self.dims.neurons {
            let neuron = &self.neurons[idx];
            let mut raw = neuron.attrs.bias;
            for syn in &self.synapses[neuron.syn_lo..neuron.syn_hi] {
                raw += syn.efficacy * self.activations.1[syn.from];
            }
            let squashed = logistic(raw, self.logistic_slope);
            self.activations.0[idx] = if self.leaky {
                let tau = neuron.attrs.tau;
                (1.0 - tau) * self.activations.1[idx] + tau * squashed
            } else {
                squashed
            };
        }

        if learn && self.learning_enabled {
            self.learn_step();
        }
    }

    fn set_activation(&mut self, index: usize, value: f32) {
        self.activations.0[index] = value;
    }

    fn activation(&self, index: usize) -> f32 {
        self.activations.0[index]
    }

    fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    fn dump_anatomical(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write_anatomical(w, &self.dims, &self.neurons, &self.synapses, self.max_weight)
    }

    fn dump_functional(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write_functional_row(w, &self.activations.0)
    }
}
