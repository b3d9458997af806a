use super::{GenomeLogic, DEFAULT_CROSSOVER_POINTS};
use crate::config::CrossoverPolicy;
use crate::groups::{CrossoverLevels, CROSSOVER_POINTS};
use ontogeny_data::Genome;
use rand::Rng;

pub fn crossover<R: Rng>(
    a: &Genome,
    b: &Genome,
    policy: &CrossoverPolicy,
    levels: &CrossoverLevels,
    rng: &mut R,
) -> Genome {
    assert_eq!(a.len(), b.len(), "crossover across mismatched schemas");
    match *policy {
        CrossoverPolicy::Positional { points } => positional(a, b, points, rng),
        CrossoverPolicy::Hierarchical {
            group_p,
            attr_p,
            byte_p,
        } => hierarchical(a, b, levels, group_p, attr_p, byte_p, rng),
    }
}

/// Select `requested` distinct cut positions over `[0, len)`, sorted
/// ascending. When three or more points are requested and the physical
/// scalar prefix is non-trivial, one point is forced inside
/// `[0, physical_bytes)`; the rest are drawn uniformly, re-drawing on
/// collision.
pub fn select_points<R: Rng>(
    len: usize,
    physical_bytes: usize,
    requested: usize,
    rng: &mut R,
) -> Vec<usize> {
    let requested = requested.clamp(1, len);
    let mut points: Vec<usize> = Vec::with_capacity(requested);

    if requested >= 3 && physical_bytes > 0 {
        points.push(rng.gen_range(0..physical_bytes));
    }
    while points.len() < requested {
        let candidate = rng.gen_range(0..len);
        if !points.contains(&candidate) {
            points.push(candidate);
        }
    }
    points.sort_unstable();
    points
}

fn positional<R: Rng>(a: &Genome, b: &Genome, points: Option<usize>, rng: &mut R) -> Genome {
    let len = a.len();
    let mut child = Genome::new(a.schema.clone());
    if len == 0 {
        return child;
    }

    let requested = points.unwrap_or_else(|| {
        if a.schema.catalog.gene(CROSSOVER_POINTS).is_some() {
            a.get(CROSSOVER_POINTS) as usize
        } else {
            DEFAULT_CROSSOVER_POINTS
        }
    });
    let cuts = select_points(len, a.schema.physical_bytes(), requested, rng);

    let mut source = a;
    let mut pos = 0usize;
    for &cut in &cuts {
        child.bytes[pos..cut].copy_from_slice(&source.bytes[pos..cut]);
        source = if std::ptr::eq(source, a) { b } else { a };
        pos = cut;
    }
    child.bytes[pos..len].copy_from_slice(&source.bytes[pos..len]);
    child
}

/// Copy one level-defined segment at a time, switching parents at group,
/// attribute and byte boundaries with the configured probabilities. The
/// result inherits structurally coherent units rather than positional
/// splices.
fn hierarchical<R: Rng>(
    a: &Genome,
    b: &Genome,
    levels: &CrossoverLevels,
    group_p: f32,
    attr_p: f32,
    byte_p: f32,
    rng: &mut R,
) -> Genome {
    let covered: usize = levels
        .groups
        .iter()
        .flatten()
        .map(|run| run.len())
        .sum();
    assert_eq!(
        covered,
        a.len(),
        "crossover levels cover {covered} bytes, genome has {}",
        a.len()
    );

    let mut child = Genome::new(a.schema.clone());
    let mut from_a = rng.gen_bool(0.5);

    for (group_idx, block) in levels.groups.iter().enumerate() {
        if group_idx > 0 && rng.gen::<f32>() < group_p {
            from_a = !from_a;
        }
        for (attr_idx, run) in block.iter().enumerate() {
            if attr_idx > 0 && rng.gen::<f32>() < attr_p {
                from_a = !from_a;
            }
            for (byte_idx, &logical) in run.iter().enumerate() {
                if byte_idx > 0 && rng.gen::<f32>() < byte_p {
                    from_a = !from_a;
                }
                let source = if from_a { a } else { b };
                child.set_raw(logical, source.raw(logical));
            }
        }
    }
    child
}
