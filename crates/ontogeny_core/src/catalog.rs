//! Two-phase gene catalog construction.
//!
//! The builder owns the mutable gene list; [`GeneCatalogBuilder::complete`]
//! consumes it and yields the frozen [`GeneCatalog`], which has no mutation
//! methods. Size and count queries live only on the frozen type, so
//! querying before completion is impossible by construction.

use ontogeny_data::{Gene, GeneCatalog, GeneType, RoundingMode, Span};

/// Accumulates gene declarations and assigns logical byte offsets.
#[derive(Debug, Default)]
pub struct GeneCatalogBuilder {
    genes: Vec<Gene>,
    cursor: usize,
}

impl GeneCatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an immutable constant. It owns no buffer bytes; `get`
    /// always decodes to `value`.
    pub fn constant(&mut self, name: &str, gene_type: GeneType, value: f32) -> &mut Self {
        self.genes.push(Gene {
            name: name.to_string(),
            gene_type,
            mutable: false,
            span: None,
            min: value,
            max: value,
            power: 1.0,
            rounding: RoundingMode::None,
            weight: 0.0,
        });
        self
    }

    /// Declare a mutable interpolated gene of `count` one-byte elements.
    #[allow(clippy::too_many_arguments)]
    pub fn interpolated(
        &mut self,
        name: &str,
        gene_type: GeneType,
        count: usize,
        range: [f32; 2],
        power: f32,
        rounding: RoundingMode,
        weight: f32,
    ) -> &mut Self {
        assert!(count > 0, "gene '{name}' declared with zero elements");
        assert!(
            range[0] <= range[1],
            "gene '{name}' range [{}, {}] is inverted",
            range[0],
            range[1]
        );
        let span = Span {
            offset: self.cursor,
            width: 1,
            count,
        };
        self.cursor += span.len();
        self.genes.push(Gene {
            name: name.to_string(),
            gene_type,
            mutable: true,
            span: Some(span),
            min: range[0],
            max: range[1],
            power,
            rounding,
            weight,
        });
        self
    }

    /// Shorthand for a single-element linear scalar gene.
    pub fn scalar(&mut self, name: &str, range: [f32; 2]) -> &mut Self {
        self.interpolated(name, GeneType::Scalar, 1, range, 1.0, RoundingMode::None, 1.0)
    }

    /// Bytes assigned so far; the next gene starts here.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Freeze the declarations into the immutable catalog.
    #[must_use]
    pub fn complete(self) -> GeneCatalog {
        GeneCatalog::freeze(self.genes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_assigned_sequentially() {
        let mut builder = GeneCatalogBuilder::new();
        builder
            .scalar("first", [0.0, 1.0])
            .scalar("second", [0.0, 1.0])
            .interpolated(
                "third",
                GeneType::GroupAttr,
                4,
                [-1.0, 1.0],
                1.0,
                RoundingMode::None,
                1.0,
            );
        let catalog = builder.complete();

        assert_eq!(catalog.require("first").span.unwrap().offset, 0);
        assert_eq!(catalog.require("second").span.unwrap().offset, 1);
        assert_eq!(catalog.require("third").span.unwrap().offset, 2);
        assert_eq!(catalog.mutable_size(), 6);
        assert_eq!(catalog.physical_bytes(), 2);
    }

    #[test]
    fn test_constants_own_no_bytes() {
        let mut builder = GeneCatalogBuilder::new();
        builder
            .constant("fixed", GeneType::NeurGroup, 1.0)
            .scalar("stored", [0.0, 1.0]);
        let catalog = builder.complete();

        assert!(catalog.require("fixed").span.is_none());
        assert_eq!(catalog.require("fixed").interpolate(0), 1.0);
        assert_eq!(catalog.mutable_size(), 1);
    }

    #[test]
    #[should_panic(expected = "zero elements")]
    fn test_zero_count_rejected() {
        let mut builder = GeneCatalogBuilder::new();
        builder.interpolated(
            "bad",
            GeneType::Scalar,
            0,
            [0.0, 1.0],
            1.0,
            RoundingMode::None,
            1.0,
        );
    }
}
