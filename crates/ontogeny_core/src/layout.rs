//! Physical byte ordering of the genome buffer.
//!
//! The linear layout keeps declaration order. The grouped layout places
//! the scalar prefix first, then every group's bytes contiguously, so one
//! positional crossover cut tends to transplant an entire group's wiring
//! instead of splicing inconsistent halves.

use ontogeny_data::{GeneCatalog, GenomeLayout, LayoutStrategy};

/// Byte-grouping plan produced by the catalog that knows the group
/// structure (see `groups.rs`). Offsets are logical.
#[derive(Debug, Clone, Default)]
pub struct GroupPlan {
    /// Scalar prefix bytes in declaration order.
    pub scalar_bytes: Vec<usize>,
    /// Global (non-per-group) neurological bytes.
    pub global_bytes: Vec<usize>,
    /// Per group: that group's size, attribute, and per-partner synapse
    /// bytes, in coherent order.
    pub group_bytes: Vec<Vec<usize>>,
}

/// Build the identity layout for a completed catalog.
#[must_use]
pub fn linear(catalog: &GeneCatalog) -> GenomeLayout {
    let size = catalog.mutable_size();
    GenomeLayout::from_map(LayoutStrategy::Linear, (0..size).collect())
}

/// Build the grouped layout from a plan.
///
/// Panics when the plan does not cover the catalog exactly once. The
/// bijection check in `GenomeLayout::from_map` is exhaustive in both
/// directions, and a failure is a cataloging bug.
#[must_use]
pub fn grouped(catalog: &GeneCatalog, plan: &GroupPlan) -> GenomeLayout {
    let mut phys2log = Vec::with_capacity(catalog.mutable_size());
    phys2log.extend_from_slice(&plan.scalar_bytes);
    phys2log.extend_from_slice(&plan.global_bytes);
    for group in &plan.group_bytes {
        phys2log.extend_from_slice(group);
    }
    assert_eq!(
        phys2log.len(),
        catalog.mutable_size(),
        "group plan covers {} bytes, catalog declares {}",
        phys2log.len(),
        catalog.mutable_size()
    );

    let mut log2phys = vec![usize::MAX; phys2log.len()];
    for (physical, &logical) in phys2log.iter().enumerate() {
        assert!(
            logical < log2phys.len() && log2phys[logical] == usize::MAX,
            "group plan repeats or exceeds logical offset {logical}"
        );
        log2phys[logical] = physical;
    }
    GenomeLayout::from_map(LayoutStrategy::Grouped, log2phys)
}

/// Build the layout for the requested strategy.
#[must_use]
pub fn build(
    strategy: LayoutStrategy,
    catalog: &GeneCatalog,
    plan: &GroupPlan,
) -> GenomeLayout {
    match strategy {
        LayoutStrategy::Linear => linear(catalog),
        LayoutStrategy::Grouped => grouped(catalog, plan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GeneCatalogBuilder;
    use ontogeny_data::{GeneType, RoundingMode};

    fn catalog() -> GeneCatalog {
        let mut builder = GeneCatalogBuilder::new();
        builder
            .scalar("s0", [0.0, 1.0])
            .scalar("s1", [0.0, 1.0])
            .interpolated(
                "count",
                GeneType::NeurGroup,
                1,
                [0.0, 4.0],
                1.0,
                RoundingMode::Nearest,
                1.0,
            )
            .interpolated(
                "attr",
                GeneType::GroupAttr,
                2,
                [-1.0, 1.0],
                1.0,
                RoundingMode::None,
                1.0,
            );
        builder.complete()
    }

    #[test]
    fn test_linear_is_identity() {
        let catalog = catalog();
        let layout = linear(&catalog);
        for offset in 0..catalog.mutable_size() {
            assert_eq!(layout.physical(offset), offset);
        }
    }

    #[test]
    fn test_grouped_follows_plan() {
        let catalog = catalog();
        // Interleave: scalars, global count byte, then attr elements in
        // reverse group order.
        let plan = GroupPlan {
            scalar_bytes: vec![0, 1],
            global_bytes: vec![2],
            group_bytes: vec![vec![4], vec![3]],
        };
        let layout = grouped(&catalog, &plan);
        assert_eq!(layout.physical(4), 3);
        assert_eq!(layout.physical(3), 4);
        assert_eq!(layout.logical(3), 4);
        for logical in 0..catalog.mutable_size() {
            assert_eq!(layout.logical(layout.physical(logical)), logical);
        }
    }

    #[test]
    #[should_panic(expected = "group plan")]
    fn test_incomplete_plan_is_fatal() {
        let catalog = catalog();
        let plan = GroupPlan {
            scalar_bytes: vec![0, 1],
            global_bytes: vec![2],
            group_bytes: vec![vec![3]],
        };
        let _ = grouped(&catalog, &plan);
    }
}
