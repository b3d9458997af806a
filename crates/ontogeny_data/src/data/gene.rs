use serde::{Deserialize, Serialize};

/// Kind of heritable field a gene describes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GeneType {
    /// Plain interpolated scalar (physiology, rates).
    Scalar,
    /// Neuron count of one named group.
    NeurGroup,
    /// Per-group attribute (bias, tau, spiking parameters).
    GroupAttr,
    /// Per-(from-group, to-group, synapse-type) attribute.
    SynapseAttr,
}

/// How a decoded gene value is rounded after interpolation.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundingMode {
    /// Keep the interpolated value as-is.
    #[default]
    None,
    /// Truncate toward negative infinity.
    Floor,
    /// Round to the nearest integer.
    Nearest,
    /// Binary threshold: `min` below the midpoint, `max` at or above it.
    Threshold,
}

/// Byte range a gene occupies inside the packed mutable buffer.
///
/// `count` elements of `width` bytes each, starting at the logical
/// `offset`. Constant genes have no span at all.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Logical byte offset of the first element.
    pub offset: usize,
    /// Bytes per element. Interpolated genes are one byte wide.
    pub width: usize,
    /// Number of elements (1 for scalars, group count for group genes).
    pub count: usize,
}

impl Span {
    /// Total bytes covered by this span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.width * self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical offset of element `idx`. Panics on an out-of-range index;
    /// an invalid gene address is a programming error, not bad input.
    #[must_use]
    pub fn element(&self, idx: usize) -> usize {
        assert!(idx < self.count, "gene element {idx} out of {}", self.count);
        self.offset + idx * self.width
    }
}

/// Schema metadata for one named heritable field.
///
/// A `Gene` never holds a per-organism value; it describes how raw bytes
/// in any organism's genome decode into a value. The set of all genes for
/// one configuration forms the shared, immutable [`super::schema::GeneCatalog`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gene {
    /// Unique name inside the catalog.
    pub name: String,
    /// Kind of field this gene describes.
    pub gene_type: GeneType,
    /// Whether the field participates in mutation/crossover. Constant
    /// genes carry their value in `min` (== `max`) and own no bytes.
    pub mutable: bool,
    /// Buffer location, `None` for constants.
    pub span: Option<Span>,
    /// Lower bound of the decoded range (or the constant value).
    pub min: f32,
    /// Upper bound of the decoded range.
    pub max: f32,
    /// Interpolation exponent; 1.0 is linear.
    pub power: f32,
    /// Rounding applied after interpolation.
    pub rounding: RoundingMode,
    /// Relative weight of this gene in genetic-separation distance.
    pub weight: f32,
}

impl Gene {
    /// Decode a raw byte through this gene's interpolation rule:
    /// `min + (raw/255)^power * (max - min)`, then rounded.
    #[must_use]
    pub fn interpolate(&self, raw: u8) -> f32 {
        self.interpolate_ratio(f32::from(raw) / 255.0)
    }

    /// Decode a `[0,1]` ratio directly (used by `seed` and the tests).
    #[must_use]
    pub fn interpolate_ratio(&self, ratio: f32) -> f32 {
        let ratio = ratio.clamp(0.0, 1.0);
        let value = self.min + ratio.powf(self.power) * (self.max - self.min);
        match self.rounding {
            RoundingMode::None => value,
            RoundingMode::Floor => value.floor(),
            RoundingMode::Nearest => value.round(),
            RoundingMode::Threshold => {
                if ratio.powf(self.power) < 0.5 {
                    self.min
                } else {
                    self.max
                }
            }
        }
    }

    /// Invert a target value into the raw byte that decodes closest to it.
    #[must_use]
    pub fn raw_for_ratio(&self, ratio: f32) -> u8 {
        (ratio.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Whether this gene is a buffer-backed interpolated field.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        self.span.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(min: f32, max: f32, power: f32, rounding: RoundingMode) -> Gene {
        Gene {
            name: "test".to_string(),
            gene_type: GeneType::Scalar,
            mutable: true,
            span: Some(Span {
                offset: 0,
                width: 1,
                count: 1,
            }),
            min,
            max,
            power,
            rounding,
            weight: 1.0,
        }
    }

    #[test]
    fn test_interpolate_endpoints() {
        for rounding in [
            RoundingMode::None,
            RoundingMode::Floor,
            RoundingMode::Nearest,
            RoundingMode::Threshold,
        ] {
            let g = gene(-4.0, 12.0, 1.0, rounding);
            assert_eq!(g.interpolate(0), -4.0, "{rounding:?} at 0");
            assert_eq!(g.interpolate(255), 12.0, "{rounding:?} at 255");
        }
    }

    #[test]
    fn test_interpolate_monotonic() {
        let g = gene(0.0, 1.0, 2.5, RoundingMode::None);
        let mut prev = g.interpolate(0);
        for raw in 1..=255u8 {
            let v = g.interpolate(raw);
            assert!(v >= prev, "non-monotonic at raw={raw}");
            prev = v;
        }
    }

    #[test]
    fn test_threshold_rounding() {
        let g = gene(0.0, 1.0, 1.0, RoundingMode::Threshold);
        assert_eq!(g.interpolate(10), 0.0);
        assert_eq!(g.interpolate(250), 1.0);
    }

    #[test]
    fn test_nearest_rounding_is_integer() {
        let g = gene(0.0, 7.0, 1.0, RoundingMode::Nearest);
        for raw in [0u8, 17, 99, 200, 255] {
            let v = g.interpolate(raw);
            assert_eq!(v, v.round());
        }
    }

    #[test]
    fn test_span_element_addressing() {
        let span = Span {
            offset: 10,
            width: 1,
            count: 4,
        };
        assert_eq!(span.element(0), 10);
        assert_eq!(span.element(3), 13);
        assert_eq!(span.len(), 4);
    }
}
