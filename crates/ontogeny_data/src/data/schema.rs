use crate::data::gene::{Gene, GeneType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Physical byte-ordering strategy for a genome buffer.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LayoutStrategy {
    /// Keep catalog declaration order.
    #[default]
    Linear,
    /// Scalars first, then each group's genes contiguously, so a single
    /// positional cut tends to transplant a whole group's wiring.
    Grouped,
}

/// Frozen, process-wide set of all genes for one configuration.
///
/// Built once through `ontogeny_core::catalog::GeneCatalogBuilder` and
/// shared read-only by every organism. No mutation methods exist on this
/// type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneCatalog {
    genes: Vec<Gene>,
    by_name: HashMap<String, usize>,
    mutable_size: usize,
    type_counts: [usize; 4],
    physical_bytes: usize,
}

impl GeneCatalog {
    /// Freeze a declaration-ordered gene list into a catalog.
    ///
    /// Panics when two stored genes overlap, when a stored scalar does not
    /// precede every non-scalar, or when offsets leave gaps. All of these
    /// are cataloging bugs, not runtime conditions.
    #[must_use]
    pub fn freeze(genes: Vec<Gene>) -> Self {
        let mut by_name = HashMap::new();
        let mut covered = Vec::new();
        let mut type_counts = [0usize; 4];
        let mut physical_bytes = 0usize;

        for (idx, gene) in genes.iter().enumerate() {
            let prev = by_name.insert(gene.name.clone(), idx);
            assert!(prev.is_none(), "duplicate gene name '{}'", gene.name);
            type_counts[gene.gene_type as usize] += 1;

            if let Some(span) = gene.span {
                assert!(gene.mutable, "stored gene '{}' must be mutable", gene.name);
                covered.push((span.offset, span.offset + span.len(), gene.name.clone()));
                if gene.gene_type == GeneType::Scalar {
                    physical_bytes += span.len();
                }
            }
        }

        covered.sort();
        let mut expected = 0usize;
        for (lo, hi, name) in &covered {
            assert!(
                *lo == expected,
                "gene '{name}' starts at {lo}, expected {expected} (gap or overlap)"
            );
            expected = *hi;
        }
        let mutable_size = expected;

        // Scalar genes must form the logical prefix: the forced crossover
        // cut addresses [0, physical_bytes) in physical space and both
        // layout strategies keep scalars first only under this ordering.
        for gene in &genes {
            if let Some(span) = gene.span {
                if gene.gene_type == GeneType::Scalar {
                    assert!(
                        span.offset + span.len() <= physical_bytes,
                        "scalar gene '{}' declared after non-scalar genes",
                        gene.name
                    );
                }
            }
        }

        Self {
            genes,
            by_name,
            mutable_size,
            type_counts,
            physical_bytes,
        }
    }

    /// Look up a gene by name. Absence is soft here; callers that treat a
    /// missing gene as fatal use [`Self::require`].
    #[must_use]
    pub fn gene(&self, name: &str) -> Option<&Gene> {
        self.by_name.get(name).map(|&idx| &self.genes[idx])
    }

    /// Look up a gene by name, panicking with a diagnostic when absent.
    #[must_use]
    pub fn require(&self, name: &str) -> &Gene {
        self.gene(name)
            .unwrap_or_else(|| panic!("gene '{name}' not in catalog"))
    }

    /// All genes in declaration order.
    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Total packed size of the mutable buffer, in bytes.
    #[must_use]
    pub fn mutable_size(&self) -> usize {
        self.mutable_size
    }

    /// Width of the physical scalar prefix, in bytes.
    #[must_use]
    pub fn physical_bytes(&self) -> usize {
        self.physical_bytes
    }

    /// Number of genes of the given type.
    #[must_use]
    pub fn count_of(&self, gene_type: GeneType) -> usize {
        self.type_counts[gene_type as usize]
    }
}

/// Bijective permutation from logical declaration offsets to physical
/// buffer offsets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenomeLayout {
    strategy: LayoutStrategy,
    log2phys: Vec<usize>,
    phys2log: Vec<usize>,
}

impl GenomeLayout {
    /// Assemble a layout from a logical→physical map.
    ///
    /// Panics unless the map is a bijection over `[0, len)`; a broken
    /// permutation is a cataloging bug.
    #[must_use]
    pub fn from_map(strategy: LayoutStrategy, log2phys: Vec<usize>) -> Self {
        let len = log2phys.len();
        let mut phys2log = vec![usize::MAX; len];
        for (logical, &physical) in log2phys.iter().enumerate() {
            assert!(
                physical < len,
                "physical offset {physical} out of range {len}"
            );
            assert!(
                phys2log[physical] == usize::MAX,
                "physical offset {physical} mapped twice"
            );
            phys2log[physical] = logical;
        }
        for (physical, &logical) in phys2log.iter().enumerate() {
            assert!(
                logical != usize::MAX,
                "physical offset {physical} unmapped"
            );
        }
        Self {
            strategy,
            log2phys,
            phys2log,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    /// Physical buffer offset of a logical declaration offset.
    #[must_use]
    pub fn physical(&self, logical: usize) -> usize {
        self.log2phys[logical]
    }

    /// Logical declaration offset of a physical buffer offset.
    #[must_use]
    pub fn logical(&self, physical: usize) -> usize {
        self.phys2log[physical]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log2phys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log2phys.is_empty()
    }
}

/// The shared (catalog, layout) pair every genome references.
///
/// Built once per run, immutable afterwards, shared behind an `Arc`,
/// never copied per organism.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenomeSchema {
    pub catalog: GeneCatalog,
    pub layout: GenomeLayout,
}

impl GenomeSchema {
    #[must_use]
    pub fn new(catalog: GeneCatalog, layout: GenomeLayout) -> Self {
        assert_eq!(
            catalog.mutable_size(),
            layout.len(),
            "layout covers {} bytes, catalog declares {}",
            layout.len(),
            catalog.mutable_size()
        );
        Self { catalog, layout }
    }

    /// Total mutable buffer size in bytes.
    #[must_use]
    pub fn mutable_size(&self) -> usize {
        self.catalog.mutable_size()
    }

    /// Width of the physical scalar prefix in bytes.
    #[must_use]
    pub fn physical_bytes(&self) -> usize {
        self.catalog.physical_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::gene::{RoundingMode, Span};

    fn scalar(name: &str, offset: usize) -> Gene {
        Gene {
            name: name.to_string(),
            gene_type: GeneType::Scalar,
            mutable: true,
            span: Some(Span {
                offset,
                width: 1,
                count: 1,
            }),
            min: 0.0,
            max: 1.0,
            power: 1.0,
            rounding: RoundingMode::None,
            weight: 1.0,
        }
    }

    #[test]
    fn test_freeze_caches_sizes() {
        let catalog = GeneCatalog::freeze(vec![scalar("a", 0), scalar("b", 1)]);
        assert_eq!(catalog.mutable_size(), 2);
        assert_eq!(catalog.physical_bytes(), 2);
        assert_eq!(catalog.count_of(GeneType::Scalar), 2);
        assert!(catalog.gene("a").is_some());
        assert!(catalog.gene("missing").is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate gene name")]
    fn test_freeze_rejects_duplicate_names() {
        GeneCatalog::freeze(vec![scalar("a", 0), scalar("a", 1)]);
    }

    #[test]
    #[should_panic(expected = "gap or overlap")]
    fn test_freeze_rejects_overlap() {
        GeneCatalog::freeze(vec![scalar("a", 0), scalar("b", 0)]);
    }

    #[test]
    #[should_panic(expected = "not in catalog")]
    fn test_require_missing_is_fatal() {
        let catalog = GeneCatalog::freeze(vec![scalar("a", 0)]);
        let _ = catalog.require("missing");
    }

    #[test]
    fn test_layout_bijection() {
        let layout = GenomeLayout::from_map(LayoutStrategy::Grouped, vec![2, 0, 1]);
        assert_eq!(layout.physical(0), 2);
        assert_eq!(layout.logical(2), 0);
        for logical in 0..3 {
            assert_eq!(layout.logical(layout.physical(logical)), logical);
        }
    }

    #[test]
    #[should_panic(expected = "mapped twice")]
    fn test_layout_rejects_collision() {
        GenomeLayout::from_map(LayoutStrategy::Linear, vec![0, 0, 1]);
    }
}
