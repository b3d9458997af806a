use ontogeny_core::brain::{grow_with_rng, BrainModel};
use ontogeny_core::config::OntogenyConfig;
use ontogeny_core::genome::GenomeLogic;
use ontogeny_core::groups::GroupsCatalog;
use ontogeny_data::{Genome, Neuron, Synapse};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn grown_arrays(seed: u64) -> (Vec<Neuron>, Vec<Synapse>, ontogeny_data::Dimensions, usize) {
    let config = OntogenyConfig::default();
    let groups = GroupsCatalog::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut genome = Genome::new(groups.schema());
    genome.randomize_with_rng(config.genome.randomize, &mut rng);

    let grown = grow_with_rng(&genome, &groups, &config, &mut rng);
    let BrainModel::Rate(model) = &grown.brain else {
        panic!("default config grows the rate model");
    };
    (
        model.neurons().to_vec(),
        model.synapses().to_vec(),
        grown.dimensions,
        groups.max_synapses(),
    )
}

#[test]
fn test_no_duplicate_synapse_per_target() {
    for seed in 0..10 {
        let (_, synapses, _, _) = grown_arrays(seed);
        let mut seen = HashSet::new();
        for syn in &synapses {
            assert!(
                seen.insert((syn.from, syn.to)),
                "duplicate synapse {}->{} at seed {seed}",
                syn.from,
                syn.to
            );
        }
    }
}

#[test]
fn test_synapse_ranges_partition_the_array() {
    for seed in 0..10 {
        let (neurons, synapses, dims, _) = grown_arrays(seed);
        let mut expected_lo = 0usize;
        for (idx, neuron) in neurons.iter().enumerate() {
            if idx < dims.input_neurons {
                assert_eq!(neuron.syn_lo, neuron.syn_hi, "input neuron has synapses");
                continue;
            }
            assert_eq!(neuron.syn_lo, expected_lo, "gap before neuron {idx}");
            assert!(neuron.syn_hi >= neuron.syn_lo);
            expected_lo = neuron.syn_hi;

            for syn in &synapses[neuron.syn_lo..neuron.syn_hi] {
                assert_eq!(syn.to, idx, "synapse filed under the wrong target");
            }
        }
        assert_eq!(expected_lo, synapses.len(), "trailing unowned synapses");
    }
}

#[test]
fn test_synapse_count_within_catalog_maximum() {
    for seed in 0..10 {
        let (_, synapses, dims, max_synapses) = grown_arrays(seed);
        assert!(synapses.len() <= max_synapses);
        assert_eq!(dims.synapses, synapses.len());
    }
}

#[test]
fn test_no_input_targets_and_no_self_loops() {
    for seed in 0..10 {
        let (_, synapses, dims, _) = grown_arrays(seed);
        for syn in &synapses {
            assert!(syn.to >= dims.input_neurons, "input neuron targeted");
            assert_ne!(syn.from, syn.to, "self loop grown");
        }
    }
}

#[test]
fn test_output_neurons_are_never_inhibitory_targets() {
    for seed in 0..10 {
        let (neurons, synapses, dims, _) = grown_arrays(seed);

        // Output neurons are excitatory by construction…
        let outputs = dims.first_output()..dims.first_output() + dims.output_neurons;
        for idx in outputs.clone() {
            assert!(!neurons[idx].inhibitory, "output neuron {idx} inhibitory");
        }
        // …and inhibitory-target synapse classes only land on inhibitory
        // neurons, so no such class can reach an output.
        for syn in &synapses {
            if neurons[syn.to].inhibitory {
                assert!(!outputs.contains(&syn.to));
            }
        }
    }
}

#[test]
fn test_efficacy_signs_match_source_polarity() {
    for seed in 0..10 {
        let (neurons, synapses, _, _) = grown_arrays(seed);
        for syn in &synapses {
            if neurons[syn.from].inhibitory {
                assert!(syn.efficacy <= 0.0, "inhibitory source, positive weight");
                assert!(syn.learning_rate <= 0.0);
            } else {
                assert!(syn.efficacy >= 0.0, "excitatory source, negative weight");
                assert!(syn.learning_rate >= 0.0);
            }
        }
    }
}

#[test]
fn test_minimal_seed_grows_reflex_brain() {
    let config = OntogenyConfig::default();
    let groups = GroupsCatalog::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut genome = Genome::new(groups.schema());
    genome.randomize_with_rng(config.genome.randomize, &mut rng);
    groups.seed(&mut genome, ontogeny_core::config::SeedMode::Minimal);

    let grown = grow_with_rng(&genome, &groups, &config, &mut rng);
    // No internal groups: every neuron belongs to an input or output slot.
    assert_eq!(
        grown.dimensions.neurons,
        grown.dimensions.input_neurons + grown.dimensions.output_neurons
    );
    assert!(grown.dimensions.synapses > 0, "reflex wiring missing");
}
