use crate::data::schema::GenomeSchema;
use std::sync::Arc;

/// One organism's packed heritable byte buffer.
///
/// The buffer is stored in physical order and owned exclusively by its
/// organism; the schema handle is a non-owning reference to the run's
/// shared catalog/layout pair. Logic lives in `ontogeny_core::genome`.
#[derive(Clone, Debug)]
pub struct Genome {
    /// Raw bytes in physical order. Length equals the schema's mutable size.
    pub bytes: Vec<u8>,
    /// Shared, immutable schema for this run's configuration.
    pub schema: Arc<GenomeSchema>,
}

impl Genome {
    /// A zero-filled genome for the given schema.
    #[must_use]
    pub fn new(schema: Arc<GenomeSchema>) -> Self {
        let bytes = vec![0u8; schema.mutable_size()];
        Self { bytes, schema }
    }

    /// Wrap an existing buffer. Fails on length mismatch; a wrong-length
    /// buffer indicates load-time corruption and is never patched up.
    pub fn from_bytes(schema: Arc<GenomeSchema>, bytes: Vec<u8>) -> anyhow::Result<Self> {
        if bytes.len() != schema.mutable_size() {
            anyhow::bail!(
                "genome buffer is {} bytes, schema requires {}",
                bytes.len(),
                schema.mutable_size()
            );
        }
        Ok(Self { bytes, schema })
    }

    /// Buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read the byte at a logical offset, routed through the layout.
    #[must_use]
    pub fn raw(&self, logical: usize) -> u8 {
        self.bytes[self.schema.layout.physical(logical)]
    }

    /// Write the byte at a logical offset, routed through the layout.
    pub fn set_raw(&mut self, logical: usize, value: u8) {
        let physical = self.schema.layout.physical(logical);
        self.bytes[physical] = value;
    }

    /// Serialize the raw buffer to a hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Deserialize a genome from a hex string against the run's schema.
    pub fn from_hex(schema: Arc<GenomeSchema>, hex_str: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| anyhow::anyhow!("invalid hex encoding: {e}"))?;
        Self::from_bytes(schema, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::gene::{Gene, GeneType, RoundingMode, Span};
    use crate::data::schema::{GeneCatalog, GenomeLayout, LayoutStrategy};

    fn schema() -> Arc<GenomeSchema> {
        let genes = vec![Gene {
            name: "a".to_string(),
            gene_type: GeneType::Scalar,
            mutable: true,
            span: Some(Span {
                offset: 0,
                width: 1,
                count: 3,
            }),
            min: 0.0,
            max: 1.0,
            power: 1.0,
            rounding: RoundingMode::None,
            weight: 1.0,
        }];
        let catalog = GeneCatalog::freeze(genes);
        let layout = GenomeLayout::from_map(LayoutStrategy::Grouped, vec![2, 0, 1]);
        Arc::new(GenomeSchema::new(catalog, layout))
    }

    #[test]
    fn test_raw_roundtrip_through_layout() {
        let mut g = Genome::new(schema());
        g.set_raw(0, 0xAA);
        assert_eq!(g.raw(0), 0xAA);
        // Logical 0 lands at physical 2.
        assert_eq!(g.bytes[2], 0xAA);
    }

    #[test]
    fn test_hex_roundtrip() {
        let mut g = Genome::new(schema());
        g.set_raw(1, 7);
        g.set_raw(2, 250);
        let restored = Genome::from_hex(g.schema.clone(), &g.to_hex()).unwrap();
        assert_eq!(restored.bytes, g.bytes);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let result = Genome::from_bytes(schema(), vec![0u8; 2]);
        assert!(result.is_err());
    }
}
