//! Named distance functions over d-vectors.
//!
//! Every metric returns an `f64`, regardless of the coordinate type `D` —
//! see `DESIGN.md` for why distance values aren't parameterized per-`D`.
//! The one semantic wrinkle every caller must respect: **L2 is squared**.
//! The square root is never taken, so a caller-supplied radius for L2 is
//! un-squared and gets squared exactly once, at the query boundary
//! (`MetricKind::effective_radius`), never inside the hot loop.

use crate::coordinate::Coordinate;

/// Which of the four named metrics an index was built with.
///
/// This tag is threaded explicitly through every distance call instead of
/// being inferred via reflection on a method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Manhattan distance: `Σ |xᵢ − yᵢ|`.
    L1,
    /// Squared Euclidean distance: `Σ (xᵢ − yᵢ)²`. Never rooted.
    L2,
    /// Chebyshev distance: `max |xᵢ − yᵢ|`.
    LInf,
    /// Cosine-distance: `1 − cos(x, y)`.
    Cosine,
}

impl MetricKind {
    /// Only L2 needs its caller-supplied radius squared before use; every
    /// other metric's radius is used as-is.
    pub fn squares_radius(self) -> bool {
        matches!(self, MetricKind::L2)
    }

    /// The voxel grid's shell enumerators exist for L1, L2, and L∞ only —
    /// cosine-distance has no natural notion of an axis-aligned grid cell.
    pub fn supports_voxel(self) -> bool {
        !matches!(self, MetricKind::Cosine)
    }

    /// Square `radius` if (and only if) this metric requires it.
    pub fn effective_radius(self, radius: f64) -> f64 {
        if self.squares_radius() {
            radius * radius
        } else {
            radius
        }
    }

    /// Compute the distance between two d-vectors under this metric.
    pub fn distance<D: Coordinate>(self, x: &[D], y: &[D]) -> f64 {
        match self {
            MetricKind::L1 => l1(x, y),
            MetricKind::L2 => l2_squared(x, y),
            MetricKind::LInf => l_inf(x, y),
            MetricKind::Cosine => cosine_distance(x, y),
        }
    }
}

fn l1<D: Coordinate>(x: &[D], y: &[D]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(&a, &b)| (a.to_f64() - b.to_f64()).abs())
        .sum()
}

fn l2_squared<D: Coordinate>(x: &[D], y: &[D]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(&a, &b)| {
            let diff = a.to_f64() - b.to_f64();
            diff * diff
        })
        .sum()
}

fn l_inf<D: Coordinate>(x: &[D], y: &[D]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(&a, &b)| (a.to_f64() - b.to_f64()).abs())
        .fold(0.0, f64::max)
}

/// `1 - cos(x, y)`, with the zero-magnitude conventions fixed by
/// `DESIGN.md`: orthogonal vectors (zero dot product, nonzero magnitudes)
/// return `1.0`; a zero-magnitude vector on either side returns `2.0`
/// (the "opposite direction" convention, since cosine similarity of -1
/// would otherwise be indistinguishable from a degenerate input).
fn cosine_distance<D: Coordinate>(x: &[D], y: &[D]) -> f64 {
    let mut dot = 0.0;
    let mut mag_x = 0.0;
    let mut mag_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let af = a.to_f64();
        let bf = b.to_f64();
        dot += af * bf;
        mag_x += af * af;
        mag_y += bf * bf;
    }
    let magnitude_product = (mag_x * mag_y).sqrt();
    if magnitude_product < f64::EPSILON {
        return 2.0;
    }
    if dot == 0.0 {
        return 1.0;
    }
    1.0 - dot / magnitude_product
}
