//! The groups gene catalog: the concrete schema used by the default brain
//! architecture.
//!
//! Declares the physical scalar prefix, one size gene per input/output
//! neuron group, the evolvable internal-group genes, per-group attributes,
//! and the per-(group-pair, synapse-type) wiring genes. Completion caches
//! the group counts, first-slot indices, maximum neuron count and the
//! closed-form maximum synapse count consumed by growth-time assertions.

use crate::catalog::GeneCatalogBuilder;
use crate::config::{InputGroupSpec, ModelVariant, OntogenyConfig, SeedMode};
use crate::genome::GenomeLogic;
use crate::layout::{self, GroupPlan};
use ontogeny_data::{
    GeneCatalog, GeneType, Genome, GenomeSchema, RoundingMode, SynapseType,
};
use std::sync::Arc;

pub const MUTATION_RATE: &str = "MutationRate";
pub const CROSSOVER_POINTS: &str = "CrossoverPoints";
pub const LIFE_SPAN: &str = "LifeSpan";
pub const STRENGTH: &str = "Strength";
pub const MAX_SPEED: &str = "MaxSpeed";
pub const INTERNAL_GROUP_COUNT: &str = "InternalGroupCount";
pub const INTERNAL_EXCITATORY: &str = "InternalExcitatoryCount";
pub const INTERNAL_INHIBITORY: &str = "InternalInhibitoryCount";
pub const BIAS: &str = "Bias";
pub const BIAS_LEARNING_RATE: &str = "BiasLearningRate";
pub const TAU: &str = "Tau";
pub const SPIKE_A: &str = "SpikeA";
pub const SPIKE_B: &str = "SpikeB";
pub const SPIKE_C: &str = "SpikeC";
pub const SPIKE_D: &str = "SpikeD";

/// Name of the size gene for one input group.
#[must_use]
pub fn size_gene(group: &str) -> String {
    format!("{group}NeuronCount")
}

/// Name of the connection-density gene for one synapse type.
#[must_use]
pub fn density_gene(stype: SynapseType) -> &'static str {
    match stype {
        SynapseType::EE => "ConnectionDensityEE",
        SynapseType::EI => "ConnectionDensityEI",
        SynapseType::IE => "ConnectionDensityIE",
        SynapseType::II => "ConnectionDensityII",
    }
}

/// Name of the learning-rate gene for one synapse type.
#[must_use]
pub fn learning_rate_gene(stype: SynapseType) -> &'static str {
    match stype {
        SynapseType::EE => "LearningRateEE",
        SynapseType::EI => "LearningRateEI",
        SynapseType::IE => "LearningRateIE",
        SynapseType::II => "LearningRateII",
    }
}

/// Name of the topological-distortion gene for one synapse type.
#[must_use]
pub fn distortion_gene(stype: SynapseType) -> &'static str {
    match stype {
        SynapseType::EE => "TopologicalDistortionEE",
        SynapseType::EI => "TopologicalDistortionEI",
        SynapseType::IE => "TopologicalDistortionIE",
        SynapseType::II => "TopologicalDistortionII",
    }
}

/// Crossover segmentation of the genome, coarse to fine: group blocks,
/// attribute runs inside each block, bytes inside each run. Offsets are
/// logical. The first block is the physical scalar region.
#[derive(Debug, Clone, Default)]
pub struct CrossoverLevels {
    pub groups: Vec<Vec<Vec<usize>>>,
}

/// The completed groups catalog plus its cached architecture numbers.
pub struct GroupsCatalog {
    schema: Arc<GenomeSchema>,
    levels: CrossoverLevels,
    input_groups: Vec<InputGroupSpec>,
    output_groups: Vec<String>,
    max_internal_groups: usize,
    /// Non-input attribute gene names actually declared for this config.
    attr_genes: Vec<&'static str>,
    max_neurons: usize,
    max_input_neurons: usize,
    max_synapses: usize,
}

impl GroupsCatalog {
    /// Build and complete the catalog, layout and schema for one run.
    #[must_use]
    pub fn new(config: &OntogenyConfig) -> Self {
        let groups = &config.groups;
        let input_groups = groups.input_groups.clone();
        let output_groups = groups.output_groups.clone();
        let max_internal = groups.max_internal_groups;
        let total_slots = input_groups.len() + output_groups.len() + max_internal;
        let non_input_slots = output_groups.len() + max_internal;
        assert!(
            !input_groups.is_empty() && !output_groups.is_empty(),
            "a brain needs at least one input and one output group"
        );

        let mut attr_genes: Vec<&'static str> = vec![BIAS, BIAS_LEARNING_RATE];
        if config.brain.leaky_integrator {
            attr_genes.push(TAU);
        }
        if config.brain.model == ModelVariant::Spiking {
            attr_genes.extend([SPIKE_A, SPIKE_B, SPIKE_C, SPIKE_D]);
        }

        let mut builder = GeneCatalogBuilder::new();
        builder
            .scalar(MUTATION_RATE, groups.mutation_rate)
            .interpolated(
                CROSSOVER_POINTS,
                GeneType::Scalar,
                1,
                groups.crossover_points,
                1.0,
                RoundingMode::Nearest,
                1.0,
            )
            .interpolated(
                LIFE_SPAN,
                GeneType::Scalar,
                1,
                groups.life_span,
                1.0,
                RoundingMode::Nearest,
                1.0,
            )
            .scalar(STRENGTH, groups.strength)
            .scalar(MAX_SPEED, groups.max_speed);

        builder.interpolated(
            INTERNAL_GROUP_COUNT,
            GeneType::NeurGroup,
            1,
            [0.0, max_internal as f32],
            1.0,
            RoundingMode::Nearest,
            2.0,
        );

        for group in &input_groups {
            if group.ranged {
                builder.interpolated(
                    &size_gene(&group.name),
                    GeneType::NeurGroup,
                    1,
                    groups.vision_neurons,
                    1.0,
                    RoundingMode::Nearest,
                    1.0,
                );
            } else {
                builder.constant(&size_gene(&group.name), GeneType::NeurGroup, 1.0);
            }
        }
        for group in &output_groups {
            builder.constant(&size_gene(group), GeneType::NeurGroup, 1.0);
        }
        if max_internal > 0 {
            for gene in [INTERNAL_EXCITATORY, INTERNAL_INHIBITORY] {
                builder.interpolated(
                    gene,
                    GeneType::NeurGroup,
                    max_internal,
                    groups.internal_neurons,
                    1.0,
                    RoundingMode::Nearest,
                    1.0,
                );
            }
        }

        for &name in &attr_genes {
            let range = match name {
                BIAS => [-groups.bias_max, groups.bias_max],
                BIAS_LEARNING_RATE => groups.bias_learning_rate,
                TAU => groups.tau,
                SPIKE_A => config.spiking.param_a,
                SPIKE_B => config.spiking.param_b,
                SPIKE_C => config.spiking.param_c,
                SPIKE_D => config.spiking.param_d,
                _ => unreachable!("unknown attribute gene {name}"),
            };
            builder.interpolated(
                name,
                GeneType::GroupAttr,
                non_input_slots,
                range,
                1.0,
                RoundingMode::None,
                1.0,
            );
        }

        let pair_count = total_slots * non_input_slots;
        for stype in SynapseType::ALL {
            builder.interpolated(
                density_gene(stype),
                GeneType::SynapseAttr,
                pair_count,
                groups.connection_density,
                1.0,
                RoundingMode::None,
                1.0,
            );
            builder.interpolated(
                learning_rate_gene(stype),
                GeneType::SynapseAttr,
                pair_count,
                groups.learning_rate,
                1.0,
                RoundingMode::None,
                1.0,
            );
            builder.interpolated(
                distortion_gene(stype),
                GeneType::SynapseAttr,
                pair_count,
                groups.topological_distortion,
                1.0,
                RoundingMode::None,
                1.0,
            );
        }

        let catalog = builder.complete();
        let levels = Self::build_levels(
            &catalog,
            &input_groups,
            &output_groups,
            max_internal,
            &attr_genes,
        );
        let plan = Self::plan_from_levels(&levels);
        let genome_layout = layout::build(config.genome.layout, &catalog, &plan);
        let schema = Arc::new(GenomeSchema::new(catalog, genome_layout));

        let vision_max = groups.vision_neurons[1].round() as usize;
        let internal_max = groups.internal_neurons[1].round() as usize;
        let max_input_neurons = input_groups
            .iter()
            .map(|g| if g.ranged { vision_max } else { 1 })
            .sum();
        let max_output_neurons = output_groups.len();
        let max_internal_e = max_internal * internal_max;
        let max_internal_i = max_internal * internal_max;
        let max_neurons =
            max_input_neurons + max_output_neurons + max_internal_e + max_internal_i;
        // Every synapse targets a non-input neuron; any neuron can source.
        let max_synapses =
            max_neurons * (max_output_neurons + max_internal_e + max_internal_i);

        Self {
            schema,
            levels,
            input_groups,
            output_groups,
            max_internal_groups: max_internal,
            attr_genes,
            max_neurons,
            max_input_neurons,
            max_synapses,
        }
    }

    fn build_levels(
        catalog: &GeneCatalog,
        input_groups: &[InputGroupSpec],
        output_groups: &[String],
        max_internal: usize,
        attr_genes: &[&'static str],
    ) -> CrossoverLevels {
        let span_bytes = |name: &str, idx: usize| -> Vec<usize> {
            catalog
                .require(name)
                .span
                .map(|s| vec![s.element(idx)])
                .unwrap_or_default()
        };

        let mut groups: Vec<Vec<Vec<usize>>> = Vec::new();

        // Block 0: the physical scalar region, one attribute run per gene.
        let physical: Vec<Vec<usize>> =
            [MUTATION_RATE, CROSSOVER_POINTS, LIFE_SPAN, STRENGTH, MAX_SPEED]
                .into_iter()
                .map(|name| span_bytes(name, 0))
                .collect();
        groups.push(physical);

        // Block 1: the global internal-group-count byte.
        groups.push(vec![span_bytes(INTERNAL_GROUP_COUNT, 0)]);

        let input_count = input_groups.len();
        let total_slots = input_count + output_groups.len() + max_internal;
        for slot in 0..total_slots {
            let mut block: Vec<Vec<usize>> = Vec::new();

            if slot < input_count {
                let run = span_bytes(&size_gene(&input_groups[slot].name), 0);
                if !run.is_empty() {
                    block.push(run);
                }
            } else {
                let rel = slot - input_count;
                if slot >= input_count + output_groups.len() {
                    let internal = slot - input_count - output_groups.len();
                    block.push(span_bytes(INTERNAL_EXCITATORY, internal));
                    block.push(span_bytes(INTERNAL_INHIBITORY, internal));
                }
                for &name in attr_genes {
                    block.push(span_bytes(name, rel));
                }
                for from in 0..total_slots {
                    let mut partner = Vec::new();
                    for stype in SynapseType::ALL {
                        let idx = rel * total_slots + from;
                        partner.extend(span_bytes(density_gene(stype), idx));
                        partner.extend(span_bytes(learning_rate_gene(stype), idx));
                        partner.extend(span_bytes(distortion_gene(stype), idx));
                    }
                    block.push(partner);
                }
            }
            if !block.is_empty() {
                groups.push(block);
            }
        }

        CrossoverLevels { groups }
    }

    fn plan_from_levels(levels: &CrossoverLevels) -> GroupPlan {
        let flatten =
            |block: &Vec<Vec<usize>>| -> Vec<usize> { block.iter().flatten().copied().collect() };
        GroupPlan {
            scalar_bytes: flatten(&levels.groups[0]),
            global_bytes: flatten(&levels.groups[1]),
            group_bytes: levels.groups[2..].iter().map(flatten).collect(),
        }
    }

    /// The shared schema handle every genome of this run references.
    #[must_use]
    pub fn schema(&self) -> Arc<GenomeSchema> {
        Arc::clone(&self.schema)
    }

    /// Crossover segmentation used by the hierarchical crossover mode.
    #[must_use]
    pub fn crossover_levels(&self) -> &CrossoverLevels {
        &self.levels
    }

    /// Declared input groups, in slot order.
    #[must_use]
    pub fn input_groups(&self) -> &[InputGroupSpec] {
        &self.input_groups
    }

    /// Declared output group names, in slot order.
    #[must_use]
    pub fn output_groups(&self) -> &[String] {
        &self.output_groups
    }

    #[must_use]
    pub fn input_group_count(&self) -> usize {
        self.input_groups.len()
    }

    #[must_use]
    pub fn output_group_count(&self) -> usize {
        self.output_groups.len()
    }

    /// First output slot index.
    #[must_use]
    pub fn first_output_slot(&self) -> usize {
        self.input_groups.len()
    }

    /// First internal slot index.
    #[must_use]
    pub fn first_internal_slot(&self) -> usize {
        self.input_groups.len() + self.output_groups.len()
    }

    /// Maximum group count across all types (inputs + outputs + internal).
    #[must_use]
    pub fn max_group_count(&self) -> usize {
        self.input_groups.len() + self.output_groups.len() + self.max_internal_groups
    }

    #[must_use]
    pub fn max_internal_groups(&self) -> usize {
        self.max_internal_groups
    }

    /// Maximum neuron count any genome of this catalog can grow.
    #[must_use]
    pub fn max_neurons(&self) -> usize {
        self.max_neurons
    }

    #[must_use]
    pub fn max_input_neurons(&self) -> usize {
        self.max_input_neurons
    }

    /// Closed-form maximum synapse count any genome of this catalog can
    /// grow; growth asserts against this.
    #[must_use]
    pub fn max_synapses(&self) -> usize {
        self.max_synapses
    }

    /// Attribute genes declared for this configuration.
    #[must_use]
    pub fn attr_genes(&self) -> &[&'static str] {
        &self.attr_genes
    }

    /// Display name of a group slot.
    #[must_use]
    pub fn group_name(&self, slot: usize) -> String {
        let input = self.input_groups.len();
        let output = self.output_groups.len();
        if slot < input {
            self.input_groups[slot].name.clone()
        } else if slot < input + output {
            self.output_groups[slot - input].clone()
        } else {
            format!("Internal{}", slot - input - output)
        }
    }

    /// Element index of a (from-slot, to-slot) pair inside the synapse
    /// attribute genes. `to` must be a non-input slot.
    #[must_use]
    pub fn pair_index(&self, from_slot: usize, to_slot: usize) -> usize {
        assert!(
            to_slot >= self.input_groups.len(),
            "input slot {to_slot} cannot be a synapse target"
        );
        (to_slot - self.input_groups.len()) * self.max_group_count() + from_slot
    }

    /// Decoded internal group count, clipped to the catalog maximum.
    #[must_use]
    pub fn internal_group_count(&self, genome: &Genome) -> usize {
        let count = genome.get(INTERNAL_GROUP_COUNT) as usize;
        count.min(self.max_internal_groups)
    }

    /// Decoded neuron count of an input group slot.
    #[must_use]
    pub fn input_neuron_count(&self, genome: &Genome, slot: usize) -> usize {
        genome.get(&size_gene(&self.input_groups[slot].name)).max(1.0) as usize
    }

    /// Decoded (excitatory, inhibitory) counts of one internal group.
    #[must_use]
    pub fn internal_neuron_counts(&self, genome: &Genome, internal: usize) -> (usize, usize) {
        let e = genome.get_at(INTERNAL_EXCITATORY, internal).max(1.0) as usize;
        let i = genome.get_at(INTERNAL_INHIBITORY, internal).max(1.0) as usize;
        (e, i)
    }

    /// Decoded per-group attribute for a non-input slot.
    #[must_use]
    pub fn group_attr(&self, genome: &Genome, name: &str, slot: usize) -> f32 {
        genome.get_at(name, slot - self.input_groups.len())
    }

    /// Decoded connection density between two group slots.
    #[must_use]
    pub fn density(&self, genome: &Genome, stype: SynapseType, from: usize, to: usize) -> f32 {
        genome.get_at(density_gene(stype), self.pair_index(from, to))
    }

    /// Decoded learning rate between two group slots, signed per type.
    #[must_use]
    pub fn learning_rate(
        &self,
        genome: &Genome,
        stype: SynapseType,
        from: usize,
        to: usize,
    ) -> f32 {
        genome.get_at(learning_rate_gene(stype), self.pair_index(from, to)) * stype.sign()
    }

    /// Decoded topological distortion between two group slots.
    #[must_use]
    pub fn distortion(&self, genome: &Genome, stype: SynapseType, from: usize, to: usize) -> f32 {
        genome.get_at(distortion_gene(stype), self.pair_index(from, to))
    }

    /// Deploy the configured starting wiring into a genome.
    pub fn seed(&self, genome: &mut Genome, mode: SeedMode) {
        match mode {
            SeedMode::Designer => self.seed_designer(genome),
            SeedMode::Minimal => self.seed_minimal(genome),
            SeedMode::None => {}
        }
    }

    /// Designer wiring: a positive mate bias and sensor groups wired to
    /// their matching behaviors, on top of whatever the genome holds.
    fn seed_designer(&self, genome: &mut Genome) {
        genome.seed(MUTATION_RATE, 0.5);
        genome.seed(CROSSOVER_POINTS, 0.5);

        if let Some(mate) = self.try_slot_of("Mate") {
            genome.seed_at(BIAS, mate - self.input_groups.len(), 0.75);
        }
        for (sensor, behavior) in [("Red", "Fight"), ("Green", "Eat"), ("Blue", "Mate")] {
            self.seed_pair(genome, sensor, behavior, 1.0);
        }
        self.seed_pair(genome, "Energy", "Eat", 1.0);
    }

    /// Reflex-only wiring: zero internal groups, direct sensor→behavior
    /// connections and nothing else.
    fn seed_minimal(&self, genome: &mut Genome) {
        genome.seed(MUTATION_RATE, 0.5);
        genome.seed(CROSSOVER_POINTS, 0.5);
        genome.seed(INTERNAL_GROUP_COUNT, 0.0);

        let schema = genome.schema.clone();
        for stype in SynapseType::ALL {
            if let Some(span) = schema.catalog.require(density_gene(stype)).span {
                for idx in 0..span.count {
                    genome.set_raw(span.element(idx), 0);
                }
            }
        }
        for (sensor, behavior) in [("Red", "Fight"), ("Green", "Eat"), ("Blue", "Mate")] {
            self.seed_pair(genome, sensor, behavior, 1.0);
        }
        self.seed_pair(genome, "Energy", "Eat", 1.0);
    }

    fn seed_pair(&self, genome: &mut Genome, from: &str, to: &str, ratio: f32) {
        let (Some(from_slot), Some(to_slot)) = (self.try_slot_of(from), self.try_slot_of(to))
        else {
            return;
        };
        let idx = self.pair_index(from_slot, to_slot);
        genome.seed_at(density_gene(SynapseType::EE), idx, ratio);
        genome.seed_at(distortion_gene(SynapseType::EE), idx, 0.0);
    }

    /// Slot index of a named group, if declared.
    #[must_use]
    pub fn try_slot_of(&self, name: &str) -> Option<usize> {
        self.input_groups
            .iter()
            .position(|g| g.name == name)
            .or_else(|| {
                self.output_groups
                    .iter()
                    .position(|g| g == name)
                    .map(|i| i + self.input_groups.len())
            })
    }

    /// Slot index of a named group. Unknown names are fatal; group names
    /// are fixed by the catalog, so a miss is a programming error.
    #[must_use]
    pub fn slot_of(&self, name: &str) -> usize {
        self.try_slot_of(name)
            .unwrap_or_else(|| panic!("unknown group '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OntogenyConfig;

    #[test]
    fn test_catalog_covers_every_byte() {
        let config = OntogenyConfig::default();
        let groups = GroupsCatalog::new(&config);
        let schema = groups.schema();
        assert!(schema.mutable_size() > 0);
        assert_eq!(schema.layout.len(), schema.mutable_size());
        assert_eq!(schema.physical_bytes(), 5);
    }

    #[test]
    fn test_cached_maxima() {
        let config = OntogenyConfig::default();
        let groups = GroupsCatalog::new(&config);
        // 2 single-neuron inputs + 3 vision groups of up to 8.
        assert_eq!(groups.max_input_neurons(), 26);
        let non_input = 7 + 5 * 16 * 2;
        assert_eq!(groups.max_neurons(), 26 + non_input);
        assert_eq!(groups.max_synapses(), groups.max_neurons() * non_input);
    }

    #[test]
    fn test_spiking_config_declares_spike_genes() {
        let mut config = OntogenyConfig::default();
        config.brain.model = ModelVariant::Spiking;
        let groups = GroupsCatalog::new(&config);
        assert!(groups.schema().catalog.gene(SPIKE_A).is_some());

        let rate_only = GroupsCatalog::new(&OntogenyConfig::default());
        assert!(rate_only.schema().catalog.gene(SPIKE_A).is_none());
    }

    #[test]
    fn test_pair_index_is_unique() {
        let config = OntogenyConfig::default();
        let groups = GroupsCatalog::new(&config);
        let mut seen = std::collections::HashSet::new();
        for to in groups.first_output_slot()..groups.max_group_count() {
            for from in 0..groups.max_group_count() {
                assert!(seen.insert(groups.pair_index(from, to)));
            }
        }
    }

    #[test]
    #[should_panic(expected = "cannot be a synapse target")]
    fn test_input_target_pair_is_fatal() {
        let config = OntogenyConfig::default();
        let groups = GroupsCatalog::new(&config);
        let _ = groups.pair_index(0, 0);
    }

    #[test]
    fn test_grouped_layout_keeps_group_bytes_adjacent() {
        let config = OntogenyConfig::default();
        let groups = GroupsCatalog::new(&config);
        let schema = groups.schema();

        // Every block of the crossover plan must occupy a contiguous
        // physical range under the grouped layout.
        for block in &groups.crossover_levels().groups {
            let mut physical: Vec<usize> = block
                .iter()
                .flatten()
                .map(|&logical| schema.layout.physical(logical))
                .collect();
            physical.sort_unstable();
            for pair in physical.windows(2) {
                assert_eq!(pair[1], pair[0] + 1, "non-contiguous group block");
            }
        }
    }

    #[test]
    fn test_designer_seed_sets_reflex_wiring() {
        let config = OntogenyConfig::default();
        let groups = GroupsCatalog::new(&config);
        let mut genome = Genome::new(groups.schema());
        groups.seed(&mut genome, SeedMode::Designer);

        let red = groups.slot_of("Red");
        let fight = groups.slot_of("Fight");
        let density = groups.density(&genome, SynapseType::EE, red, fight);
        assert!((density - config.groups.connection_density[1]).abs() < 0.01);

        let mate_bias = groups.group_attr(&genome, BIAS, groups.slot_of("Mate"));
        assert!(mate_bias > 0.0, "mate bias should be seeded positive");
    }

    #[test]
    fn test_minimal_seed_forces_zero_internal_groups() {
        let config = OntogenyConfig::default();
        let groups = GroupsCatalog::new(&config);
        let mut genome = Genome::new(groups.schema());
        genome.bytes.fill(0xFF);
        groups.seed(&mut genome, SeedMode::Minimal);

        assert_eq!(groups.internal_group_count(&genome), 0);
        // Only the seeded reflex pairs keep a nonzero density.
        let energy = groups.slot_of("Energy");
        let eat = groups.slot_of("Eat");
        let speed = groups.slot_of("Speed");
        assert!(groups.density(&genome, SynapseType::EE, energy, eat) > 0.5);
        assert!(groups.density(&genome, SynapseType::EE, energy, speed) < 0.01);
    }

    #[test]
    fn test_zero_internal_groups_catalog() {
        let mut config = OntogenyConfig::default();
        config.groups.max_internal_groups = 0;
        let groups = GroupsCatalog::new(&config);
        assert!(groups.schema().catalog.gene(INTERNAL_EXCITATORY).is_none());
        assert_eq!(groups.max_group_count(), 12);
    }
}
