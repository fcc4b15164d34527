//! Input validation shared by every backend's `build` constructor.

use crate::error::BuildError;

/// Checks the invariants every backend needs before it can build: at least
/// one point, every point sharing the first point's dimension, and a
/// payload for each point. Returns the established dimension on success.
pub fn validate_input<D, N>(points: &[Vec<D>], payloads: &[N]) -> Result<usize, BuildError> {
    let first = points.first().ok_or(BuildError::EmptyInput)?;
    let dim = first.len();
    for (index, point) in points.iter().enumerate() {
        if point.len() != dim {
            return Err(BuildError::ShapeMismatch {
                expected_dim: dim,
                found_dim: point.len(),
                at_index: index,
            });
        }
    }
    if payloads.len() != points.len() {
        return Err(BuildError::PayloadCountMismatch {
            points: points.len(),
            payloads: payloads.len(),
        });
    }
    Ok(dim)
}
