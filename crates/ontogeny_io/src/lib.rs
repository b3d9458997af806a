//! Persistence and report streams for the ontogeny pipeline.
//!
//! Genome dumps serialize only the raw mutable buffer (plain, gzip or
//! hex-DNA); schema and layout always come from the run's configuration.
//! Anatomical and functional reports serve downstream analysis tooling.

pub mod error;
pub mod genome_store;
pub mod report;
pub mod serialization;

pub use error::{IoError, Result};
pub use genome_store::{
    dump, dump_compressed, from_hex_dna, load, load_compressed, load_file, save_file, to_hex_dna,
};
pub use report::{write_anatomical_file, FunctionalRecorder};
