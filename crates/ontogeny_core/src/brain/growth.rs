//! Deterministic brain growth: one genome in, one wired network out.
//!
//! Growth is a pure function of the genome bytes, the groups catalog and
//! the RNG stream. It runs exactly once per organism, at birth, off the
//! per-step hot path.

use super::{BrainModel, NeuronModel, RateModel, SpikingModel};
use crate::config::{ModelVariant, OntogenyConfig};
use crate::groups::{
    GroupsCatalog, BIAS, BIAS_LEARNING_RATE, SPIKE_A, SPIKE_B, SPIKE_C, SPIKE_D, TAU,
};
use crate::nerves::NerveSet;
use ontogeny_data::{
    Dimensions, Genome, Neuron, NeuronAttrs, SpikeParams, Synapse, SynapseType,
};
use rand::Rng;
use std::ops::Range;

/// A grown brain: the runtime model plus its nerve map and dimensions.
pub struct GrownBrain {
    pub dimensions: Dimensions,
    pub nerves: NerveSet,
    pub brain: BrainModel,
}

impl GrownBrain {
    /// Drive every neuron of a named input nerve. Unknown names are
    /// fatal; nerve names are fixed by the catalog.
    pub fn set_input(&mut self, name: &str, value: f32) {
        let nerve = self
            .nerves
            .nerve(name)
            .unwrap_or_else(|| panic!("unknown nerve '{name}'"))
            .clone();
        let model = self.brain.model();
        for idx in nerve.indices() {
            model.set_activation(idx, value);
        }
    }

    /// Read the first neuron of a named output nerve.
    #[must_use]
    pub fn output(&self, name: &str) -> f32 {
        let nerve = self
            .nerves
            .nerve(name)
            .unwrap_or_else(|| panic!("unknown nerve '{name}'"));
        self.brain.as_model().activation(nerve.start)
    }

    /// Advance one timestep.
    pub fn update(&mut self, learn: bool) {
        self.brain.model().update(learn);
    }
}

/// Neuron index ranges of one active group, split by polarity.
struct GroupNeurons {
    slot: usize,
    excitatory: Range<usize>,
    inhibitory: Range<usize>,
}

impl GroupNeurons {
    fn pool(&self, inhibitory: bool) -> Range<usize> {
        if inhibitory {
            self.inhibitory.clone()
        } else {
            self.excitatory.clone()
        }
    }
}

/// One incoming wiring plan entry for a target zone.
struct Incoming {
    pool: Range<usize>,
    stype: SynapseType,
    distortion: f32,
    learning_rate: f32,
    /// Synapse count per target neuron of the zone, remainder-distributed.
    counts: Vec<usize>,
}

/// A run of same-polarity target neurons inside one group.
struct TargetZone {
    neurons: Range<usize>,
    incoming: Vec<Incoming>,
}

/// Grow a brain from a genome. Deterministic given the RNG stream.
pub fn grow_with_rng<R: Rng>(
    genome: &Genome,
    groups: &GroupsCatalog,
    config: &OntogenyConfig,
    rng: &mut R,
) -> GrownBrain {
    let internal_count = groups.internal_group_count(genome);

    // Census: inputs first, outputs immediately after, internal last.
    let mut census: Vec<GroupNeurons> = Vec::new();
    let mut next = 0usize;
    for slot in 0..groups.input_group_count() {
        let n = groups.input_neuron_count(genome, slot);
        census.push(GroupNeurons {
            slot,
            excitatory: next..next + n,
            inhibitory: next + n..next + n,
        });
        next += n;
    }
    let input_neurons = next;
    for k in 0..groups.output_group_count() {
        census.push(GroupNeurons {
            slot: groups.first_output_slot() + k,
            excitatory: next..next + 1,
            inhibitory: next + 1..next + 1,
        });
        next += 1;
    }
    let output_neurons = groups.output_group_count();
    for g in 0..internal_count {
        let (e, i) = groups.internal_neuron_counts(genome, g);
        census.push(GroupNeurons {
            slot: groups.first_internal_slot() + g,
            excitatory: next..next + e,
            inhibitory: next + e..next + e + i,
        });
        next += e + i;
    }
    let total_neurons = next;

    // Neuron records with group-decoded attributes.
    let mut neurons: Vec<Neuron> = Vec::with_capacity(total_neurons);
    for group in &census {
        let attrs = decode_attrs(genome, groups, config, group.slot);
        for _ in group.excitatory.clone() {
            neurons.push(Neuron {
                group: group.slot,
                inhibitory: false,
                attrs,
                syn_lo: 0,
                syn_hi: 0,
            });
        }
        for _ in group.inhibitory.clone() {
            neurons.push(Neuron {
                group: group.slot,
                inhibitory: true,
                attrs,
                syn_lo: 0,
                syn_hi: 0,
            });
        }
    }

    // Wiring plan: per target zone, the per-neuron synapse counts from
    // every source pool. count = round(density * from * to), with the
    // overlapping-pool case reduced by one source per target and output
    // groups never targeted by inhibitory-class synapses.
    let input_group_count = groups.input_group_count();
    let mut zones: Vec<TargetZone> = Vec::new();
    for (g_idx, to_group) in census.iter().enumerate() {
        if g_idx < input_group_count {
            continue;
        }
        let is_output = to_group.slot < groups.first_internal_slot();
        for to_inhib in [false, true] {
            let to_pool = to_group.pool(to_inhib);
            let to_len = to_pool.len();
            if to_len == 0 {
                continue;
            }
            let mut incoming = Vec::new();
            for from_group in &census {
                for stype in SynapseType::ALL {
                    if stype.to_inhibitory() != to_inhib {
                        continue;
                    }
                    if is_output && stype.to_inhibitory() {
                        continue;
                    }
                    let pool = from_group.pool(stype.from_inhibitory());
                    if pool.is_empty() {
                        continue;
                    }
                    let overlap = pool == to_pool;
                    let avail = pool.len() - usize::from(overlap);
                    if avail == 0 {
                        continue;
                    }
                    let density = groups.density(genome, stype, from_group.slot, to_group.slot);
                    let distortion =
                        groups.distortion(genome, stype, from_group.slot, to_group.slot);
                    let learning_rate =
                        groups.learning_rate(genome, stype, from_group.slot, to_group.slot);
                    let pair_total =
                        (density * avail as f32 * to_len as f32).round() as usize;
                    if pair_total == 0 {
                        continue;
                    }
                    let base = pair_total / to_len;
                    let remainder = pair_total % to_len;
                    let counts: Vec<usize> = (0..to_len)
                        .map(|t| (base + usize::from(t < remainder)).min(avail))
                        .collect();
                    incoming.push(Incoming {
                        pool,
                        stype,
                        distortion,
                        learning_rate,
                        counts,
                    });
                }
            }
            zones.push(TargetZone {
                neurons: to_pool,
                incoming,
            });
        }
    }

    // Grow synapses per target neuron; ranges partition the array.
    let mut synapses: Vec<Synapse> = Vec::new();
    for zone in &zones {
        let to_len = zone.neurons.len();
        for (t_rel, target) in zone.neurons.clone().enumerate() {
            let syn_lo = synapses.len();
            for entry in &zone.incoming {
                let wanted = entry.counts[t_rel];
                if wanted == 0 {
                    continue;
                }
                let self_idx = entry.pool.contains(&target).then_some(target);
                let sources = select_sources(
                    entry.pool.clone(),
                    self_idx,
                    t_rel,
                    to_len,
                    entry.distortion,
                    wanted,
                    rng,
                );
                for from in sources {
                    let efficacy = rng.gen::<f32>() * config.brain.init_max_weight
                        * entry.stype.sign();
                    synapses.push(Synapse {
                        from,
                        to: target,
                        efficacy,
                        learning_rate: entry.learning_rate,
                    });
                }
            }
            neurons[target].syn_lo = syn_lo;
            neurons[target].syn_hi = synapses.len();
        }
    }

    assert!(
        synapses.len() <= groups.max_synapses(),
        "grew {} synapses, catalog maximum is {}",
        synapses.len(),
        groups.max_synapses()
    );

    let dimensions = Dimensions {
        neurons: total_neurons,
        input_neurons,
        output_neurons,
        synapses: synapses.len(),
    };

    let mut nerves = NerveSet::default();
    for (slot, spec) in groups.input_groups().iter().enumerate() {
        let range = census[slot].excitatory.clone();
        nerves.add_input(&spec.name, range.start, range.len());
    }
    for (k, name) in groups.output_groups().iter().enumerate() {
        let range = census[input_group_count + k].excitatory.clone();
        nerves.add_output(name, range.start, range.len());
    }

    tracing::debug!(
        neurons = dimensions.neurons,
        inputs = dimensions.input_neurons,
        outputs = dimensions.output_neurons,
        synapses = dimensions.synapses,
        internal_groups = internal_count,
        "brain grown"
    );

    let mut brain = match config.brain.model {
        ModelVariant::Rate => BrainModel::Rate(RateModel::new(&config.brain)),
        ModelVariant::Spiking => {
            BrainModel::Spiking(SpikingModel::new(&config.brain, &config.spiking))
        }
    };
    let model = brain.model();
    model.init(dimensions, config.brain.initial_activation);
    for (idx, neuron) in neurons.iter().enumerate() {
        model.set_neuron(idx, &neuron.attrs, neuron.syn_lo, neuron.syn_hi);
    }
    for (idx, syn) in synapses.iter().enumerate() {
        model.set_synapse(idx, syn.from, syn.to, syn.efficacy, syn.learning_rate);
    }

    GrownBrain {
        dimensions,
        nerves,
        brain,
    }
}

fn decode_attrs(
    genome: &Genome,
    groups: &GroupsCatalog,
    config: &OntogenyConfig,
    slot: usize,
) -> NeuronAttrs {
    if slot < groups.input_group_count() {
        return NeuronAttrs {
            tau: 1.0,
            ..NeuronAttrs::default()
        };
    }
    let mut attrs = NeuronAttrs {
        bias: groups.group_attr(genome, BIAS, slot),
        bias_learning_rate: groups.group_attr(genome, BIAS_LEARNING_RATE, slot),
        tau: 1.0,
        spike: SpikeParams::default(),
    };
    if config.brain.leaky_integrator {
        attrs.tau = groups.group_attr(genome, TAU, slot);
    }
    if config.brain.model == ModelVariant::Spiking {
        attrs.spike = SpikeParams {
            a: groups.group_attr(genome, SPIKE_A, slot),
            b: groups.group_attr(genome, SPIKE_B, slot),
            c: groups.group_attr(genome, SPIKE_C, slot),
            d: groups.group_attr(genome, SPIKE_D, slot),
        };
    }
    attrs
}

/// Pick `wanted` distinct sources from the pool.
///
/// The search starts at the position-aligned index, perturbed by the
/// distortion, and scans outward alternating below/above (lower side
/// first), wrapping at the pool bounds. Chosen sources stay marked until
/// the pool is exhausted, then the pool resets; the target itself is
/// never admitted.
fn select_sources<R: Rng>(
    pool: Range<usize>,
    self_idx: Option<usize>,
    t_rel: usize,
    to_len: usize,
    distortion: f32,
    wanted: usize,
    rng: &mut R,
) -> Vec<usize> {
    let len = pool.len();
    let excluded = self_idx.map(|s| s - pool.start);
    let reset = |used: &mut Vec<bool>| -> usize {
        used.fill(false);
        if let Some(x) = excluded {
            used[x] = true;
            1
        } else {
            0
        }
    };

    let mut used = vec![false; len];
    let mut used_count = reset(&mut used);
    let mut picked = Vec::with_capacity(wanted);

    for _ in 0..wanted {
        if used_count >= len {
            used_count = reset(&mut used);
            if used_count >= len {
                break;
            }
        }
        let rel = if to_len > 1 {
            t_rel as f32 / (to_len - 1) as f32
        } else {
            0.5
        };
        let aligned = rel * (len - 1) as f32;
        let jitter = distortion * (rng.gen::<f32>() - 0.5) * len as f32;
        let start = ((aligned + jitter).rem_euclid(len as f32) as usize).min(len - 1);

        let mut chosen = None;
        'search: for d in 0..len {
            let below = (start + len - d % len) % len;
            let above = (start + d) % len;
            for candidate in [below, above] {
                if !used[candidate] {
                    chosen = Some(candidate);
                    break 'search;
                }
            }
        }
        let rel_idx = chosen.expect("pool has a free source after reset");
        used[rel_idx] = true;
        used_count += 1;
        picked.push(pool.start + rel_idx);
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_select_sources_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let sources = select_sources(10..20, None, 0, 4, 0.5, 10, &mut rng);
        let mut sorted = sources.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), sources.len(), "duplicate source picked");
        assert!(sources.iter().all(|&s| (10..20).contains(&s)));
    }

    #[test]
    fn test_select_sources_excludes_self() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        // Ask for every source in the pool; the target must never appear.
        let sources = select_sources(0..6, Some(3), 1, 3, 1.0, 5, &mut rng);
        assert_eq!(sources.len(), 5);
        assert!(!sources.contains(&3));
    }

    #[test]
    fn test_zero_distortion_is_position_aligned() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        // Target at the start of its zone maps to the pool start.
        let first = select_sources(100..110, None, 0, 10, 0.0, 1, &mut rng);
        assert_eq!(first, vec![100]);
        // Target at the end maps to the pool end.
        let last = select_sources(100..110, None, 9, 10, 0.0, 1, &mut rng);
        assert_eq!(last, vec![109]);
    }
}
