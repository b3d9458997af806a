//! Spiking neuron runtime (Variant B).
//!
//! Each neuron integrates a membrane-potential/recovery pair through a
//! fixed-step two-variable quadratic update plus injected synaptic
//! current. Threshold crossings reset the potential, bump a plasticity
//! trace, and paired pre/post spikes nudge efficacies without an explicit
//! error gradient. A rolling spike-count window exposes an estimated
//! firing rate through the same activation array shape as the rate model.

use super::{write_anatomical, write_functional_row, NeuronModel};
use crate::config::{BrainConfig, SpikingConfig};
use ontogeny_data::{Activations, Dimensions, Neuron, NeuronAttrs, Synapse};
use std::io::Write;

const FIRING_THRESHOLD: f32 = 30.0;
const MIN_EFFICACY: f32 = 1e-10;

pub struct SpikingModel {
    max_weight: f32,
    learning_enabled: bool,
    substeps: usize,
    dt: f32,
    input_scale: f32,
    window: usize,
    stdp_amplitude: f32,
    trace_decay: f32,
    dims: Dimensions,
    neurons: Vec<Neuron>,
    synapses: Vec<Synapse>,
    /// Membrane potential per neuron.
    v: Vec<f32>,
    /// Recovery variable per neuron.
    u: Vec<f32>,
    /// Plasticity trace per neuron.
    trace: Vec<f32>,
    fired_prev: Vec<bool>,
    fired_now: Vec<bool>,
    fired_step: Vec<bool>,
    step_spikes: Vec<u16>,
    /// Ring buffer of per-step spike counts, `window` frames of `neurons`.
    window_counts: Vec<u16>,
    window_totals: Vec<u32>,
    window_pos: usize,
    window_filled: usize,
    /// Estimated firing rates, same shape as the rate model's buffer.
    rates: Activations,
}

impl SpikingModel {
    #[must_use]
    pub fn new(config: &BrainConfig, spiking: &SpikingConfig) -> Self {
        Self {
            max_weight: config.max_weight,
            learning_enabled: config.learning,
            substeps: spiking.substeps.max(1),
            dt: spiking.dt,
            input_scale: spiking.input_current_scale,
            window: spiking.rate_window.max(1),
            stdp_amplitude: spiking.stdp_amplitude,
            trace_decay: spiking.trace_decay,
            dims: Dimensions::default(),
            neurons: Vec::new(),
            synapses: Vec::new(),
            v: Vec::new(),
            u: Vec::new(),
            trace: Vec::new(),
            fired_prev: Vec::new(),
            fired_now: Vec::new(),
            fired_step: Vec::new(),
            step_spikes: Vec::new(),
            window_counts: Vec::new(),
            window_totals: Vec::new(),
            window_pos: 0,
            window_filled: 0,
            rates: Activations::default(),
        }
    }

    #[must_use]
    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    fn integrate_substep(&mut self) {
        let inputs = self.dims.input_neurons;
        for idx in inputs..self.dims.neurons {
            let neuron = &self.neurons[idx];
            let mut current = neuron.attrs.bias;
            for syn in &self.synapses[neuron.syn_lo..neuron.syn_hi] {
                let signal = if syn.from < inputs {
                    self.rates.0[syn.from]
                } else {
                    f32::from(u8::from(self.fired_prev[syn.from]))
                };
                current += syn.efficacy * signal;
            }
            let injected = current * self.input_scale;

            let params = neuron.attrs.spike;
            let v = self.v[idx];
            let u = self.u[idx];
            let dv = 0.04 * v * v + 5.0 * v + 140.0 - u + injected;
            self.v[idx] = v + self.dt * dv;
            self.u[idx] = u + self.dt * params.a * (params.b * self.v[idx] - u);

            if self.v[idx] >= FIRING_THRESHOLD {
                self.v[idx] = params.c;
                self.u[idx] += params.d;
                self.fired_now[idx] = true;
                self.fired_step[idx] = true;
                self.step_spikes[idx] += 1;
                self.trace[idx] += 1.0;
            } else {
                self.fired_now[idx] = false;
            }
        }
        std::mem::swap(&mut self.fired_prev, &mut self.fired_now);
    }

    /// Paired pre/post spike plasticity: a post spike strengthens by the
    /// pre trace, a pre spike weakens by the post trace. Magnitude stays
    /// inside `(0, max_weight]`; polarity never flips.
    fn stdp_step(&mut self) {
        for syn in &mut self.synapses {
            let pre_fired = syn.from >= self.dims.input_neurons && self.fired_step[syn.from];
            let post_fired = self.fired_step[syn.to];
            if !pre_fired && !post_fired {
                continue;
            }
            let mut nudge = 0.0f32;
            if post_fired {
                nudge += self.trace[syn.from];
            }
            if pre_fired {
                nudge -= self.trace[syn.to];
            }
            if nudge == 0.0 {
                continue;
            }
            let delta = syn.learning_rate.abs() * self.stdp_amplitude * nudge;
            let magnitude = (syn.efficacy.abs() + delta).clamp(MIN_EFFICACY, self.max_weight);
            syn.efficacy = magnitude.copysign(syn.efficacy);
        }
    }

    fn roll_window(&mut self) {
        let n = self.dims.neurons;
        let frame = &mut self.window_counts[self.window_pos * n..(self.window_pos + 1) * n];
        for idx in 0..n {
            self.window_totals[idx] -= u32::from(frame[idx]);
            frame[idx] = self.step_spikes[idx];
            self.window_totals[idx] += u32::from(self.step_spikes[idx]);
        }
        self.window_pos = (self.window_pos + 1) % self.window;
        self.window_filled = (self.window_filled + 1).min(self.window);

        let steps = (self.window_filled * self.substeps) as f32;
        for idx in self.dims.input_neurons..n {
            self.rates.0[idx] = self.window_totals[idx] as f32 / steps;
        }
    }
}

impl NeuronModel for SpikingModel {
    fn init(&mut self, dims: Dimensions, initial_activation: f32) {
        let n = dims.neurons;
        self.dims = dims;
        self.neurons = vec![
            Neuron {
                group: 0,
                inhibitory: false,
                attrs: NeuronAttrs::default(),
                syn_lo: 0,
                syn_hi: 0,
            };
            n
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
        self.v = vec![-65.0; n];
        self.u = vec![-13.0; n];
        self.trace = vec![0.0; n];
        self.fired_prev = vec![false; n];
        self.fired_now = vec![false; n];
        self.fired_step = vec![false; n];
        self.step_spikes = vec![0; n];
        self.window_counts = vec![0; n * self.window];
        self.window_totals = vec![0; n];
        self.window_pos = 0;
        self.window_filled = 0;
        self.rates = Activations::new(n, initial_activation);
    }

    fn set_neuron(&mut self, index: usize, attrs: &NeuronAttrs, syn_lo: usize, syn_hi: usize) {
        let neuron = &mut self.neurons[index];
        neuron.attrs = *attrs;
        neuron.syn_lo = syn_lo;
        neuron.syn_hi = syn_hi;
        self.v[index] = attrs.spike.c;
        self.u[index] = attrs.spike.b * attrs.spike.c;
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
        self.step_spikes.fill(0);
        self.fired_step.fill(false);

        // Input traces follow the externally supplied rates.
        for idx in 0..self.dims.input_neurons {
            self.trace[idx] = self.trace[idx] * self.trace_decay + self.rates.0[idx];
        }

        for _ in 0..self.substeps {
            self.integrate_substep();
        }

        if learn && self.learning_enabled {
            self.stdp_step();
        }

        for idx in self.dims.input_neurons..self.dims.neurons {
            self.trace[idx] *= self.trace_decay;
        }

        self.roll_window();
    }

    fn set_activation(&mut self, index: usize, value: f32) {
        self.rates.0[index] = value;
    }

    fn activation(&self, index: usize) -> f32 {
        self.rates.0[index]
    }

    fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    fn dump_anatomical(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write_anatomical(w, &self.dims, &self.neurons, &self.synapses, self.max_weight)
    }

    fn dump_functional(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write_functional_row(w, &self.rates.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontogeny_data::SpikeParams;

    fn driven_model(efficacy: f32, learning_rate: f32, learning: bool) -> SpikingModel {
        let config = BrainConfig {
            learning,
            ..BrainConfig::default()
        };
        let mut model = SpikingModel::new(&config, &SpikingConfig::default());
        model.init(
            Dimensions {
                neurons: 2,
                input_neurons: 1,
                output_neurons: 1,
                synapses: 1,
            },
            0.0,
        );
        model.set_neuron(0, &NeuronAttrs::default(), 0, 0);
        model.set_neuron(
            1,
            &NeuronAttrs {
                spike: SpikeParams::default(),
                ..NeuronAttrs::default()
            },
            0,
            1,
        );
        model.set_synapse(0, 0, 1, efficacy, learning_rate);
        model
    }

    #[test]
    fn test_driven_neuron_fires() {
        let mut model = driven_model(1.0, 0.0, false);
        model.set_activation(0, 1.0);
        for _ in 0..20 {
            model.update(false);
        }
        assert!(
            model.activation(1) > 0.0,
            "strongly driven neuron never fired"
        );
    }

    #[test]
    fn test_silent_input_means_low_rate() {
        let mut model = driven_model(1.0, 0.0, false);
        model.set_activation(0, 0.0);
        for _ in 0..20 {
            model.update(false);
        }
        let driven = {
            let mut m = driven_model(1.0, 0.0, false);
            m.set_activation(0, 1.0);
            for _ in 0..20 {
                m.update(false);
            }
            m.activation(1)
        };
        assert!(model.activation(1) <= driven);
    }

    #[test]
    fn test_update_is_deterministic() {
        let run = || {
            let mut model = driven_model(0.8, 0.0, false);
            model.set_activation(0, 0.7);
            for _ in 0..50 {
                model.update(false);
            }
            model.activation(1)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_stdp_keeps_efficacy_bounded_and_signed() {
        let mut model = driven_model(0.5, 0.1, true);
        model.set_activation(0, 1.0);
        for _ in 0..500 {
            model.update(true);
            let e = model.synapses()[0].efficacy;
            assert!(e > 0.0, "polarity flipped");
            assert!(e <= model.max_weight, "efficacy {e} above maximum");
        }
    }

    #[test]
    fn test_rate_window_is_normalized() {
        let mut model = driven_model(1.0, 0.0, false);
        model.set_activation(0, 1.0);
        for _ in 0..100 {
            model.update(false);
            assert!(model.activation(1) <= 1.0);
            assert!(model.activation(1) >= 0.0);
        }
    }
}
