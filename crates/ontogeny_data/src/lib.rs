pub mod data;

pub use data::gene::{Gene, GeneType, RoundingMode, Span};
pub use data::genome::Genome;
pub use data::network::{
    Activations, Dimensions, Neuron, NeuronAttrs, SpikeParams, Synapse, SynapseType,
};
pub use data::schema::{GeneCatalog, GenomeLayout, GenomeSchema, LayoutStrategy};
