//! Build-time error type.
//!
//! A hand-written enum (`impl Display` + `impl std::error::Error`, no
//! `thiserror`) rather than anything macro-generated — this crate has no
//! service boundary to justify the extra dependency.

use std::fmt;

use crate::metric::MetricKind;

/// Everything that can go wrong while constructing an index.
///
/// Query-time conditions that aren't errors (`k <= 0`, `k >= N`, a negative
/// radius) are handled in-band by the query methods instead of surfacing
/// here — see `SearchMethod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The input point set is empty (`N == 0`).
    EmptyInput,
    /// Two points in the input have different lengths, or a point's length
    /// doesn't match the dimension established by the first point.
    ShapeMismatch {
        expected_dim: usize,
        found_dim: usize,
        at_index: usize,
    },
    /// `payloads.len() != points.len()`.
    PayloadCountMismatch { points: usize, payloads: usize },
    /// A backend was asked to build with a metric it cannot serve — today
    /// this is only the voxel grid combined with cosine-distance.
    UnsupportedMetric {
        metric: MetricKind,
        backend: &'static str,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::EmptyInput => write!(f, "cannot build an index from zero points"),
            BuildError::ShapeMismatch {
                expected_dim,
                found_dim,
                at_index,
            } => write!(
                f,
                "point {at_index} has dimension {found_dim}, expected {expected_dim}"
            ),
            BuildError::PayloadCountMismatch { points, payloads } => write!(
                f,
                "payload count ({payloads}) does not match point count ({points})"
            ),
            BuildError::UnsupportedMetric { metric, backend } => {
                write!(f, "{backend} does not support the {metric:?} metric")
            }
        }
    }
}

impl std::error::Error for BuildError {}
