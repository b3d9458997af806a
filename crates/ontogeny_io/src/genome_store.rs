//! Genome persistence: raw byte dumps to abstract read/write streams.
//!
//! Only the mutable buffer is serialized; the schema and layout are
//! reconstructed from the run's configuration and never stored per
//! genome. No schema version is embedded; loading against a mismatched
//! catalog is undefined and the caller's responsibility to avoid.

use crate::error::{IoError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ontogeny_data::{Genome, GenomeSchema};
use std::io::{Read, Write};
use std::sync::Arc;

/// Write the raw mutable buffer to a plain stream.
pub fn dump<W: Write>(genome: &Genome, writer: &mut W) -> Result<()> {
    writer.write_all(&genome.bytes)?;
    Ok(())
}

/// Write the raw mutable buffer through a gzip stream.
pub fn dump_compressed<W: Write>(genome: &Genome, writer: W) -> Result<()> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    encoder.write_all(&genome.bytes)?;
    encoder
        .finish()
        .map_err(|e| IoError::compression(e.to_string()))?;
    Ok(())
}

/// Read a genome back from a plain stream. A wrong-length buffer is
/// corruption, fatal at detection.
pub fn load<R: Read>(schema: Arc<GenomeSchema>, reader: &mut R) -> Result<Genome> {
    let mut bytes = Vec::with_capacity(schema.mutable_size());
    reader.read_to_end(&mut bytes)?;
    Genome::from_bytes(schema, bytes).map_err(|e| IoError::corrupt(e.to_string()))
}

/// Read a genome back through a gzip stream.
pub fn load_compressed<R: Read>(schema: Arc<GenomeSchema>, reader: R) -> Result<Genome> {
    let mut decoder = GzDecoder::new(reader);
    let mut bytes = Vec::with_capacity(schema.mutable_size());
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| IoError::compression(e.to_string()))?;
    Genome::from_bytes(schema, bytes).map_err(|e| IoError::corrupt(e.to_string()))
}

/// Save a genome to a file; gzip when `compressed`.
pub fn save_file(genome: &Genome, path: &str, compressed: bool) -> Result<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| IoError::from(e).with_context(format!("creating {path}")))?;
    let mut writer = std::io::BufWriter::new(file);
    if compressed {
        dump_compressed(genome, writer)
    } else {
        dump(genome, &mut writer)
    }
}

/// Load a genome from a file; gzip when `compressed`.
pub fn load_file(schema: Arc<GenomeSchema>, path: &str, compressed: bool) -> Result<Genome> {
    let file = std::fs::File::open(path)
        .map_err(|e| IoError::from(e).with_context(format!("opening {path}")))?;
    let mut reader = std::io::BufReader::new(file);
    if compressed {
        load_compressed(schema, reader)
    } else {
        load(schema, &mut reader)
    }
}

/// Serialize a genome to its hex-DNA string form.
#[must_use]
pub fn to_hex_dna(genome: &Genome) -> String {
    genome.to_hex()
}

/// Deserialize a genome from a hex-DNA string.
pub fn from_hex_dna(schema: Arc<GenomeSchema>, hex_str: &str) -> Result<Genome> {
    if hex_str.trim().is_empty() {
        return Err(IoError::validation("empty hex string"));
    }
    Genome::from_hex(schema, hex_str.trim()).map_err(|e| IoError::corrupt(e.to_string()))
}
