//! The uniform query surface shared by every index backend.
//!
//! `KdTree`, `Voxel`, `Linear`, and `Ensemble` all implement this trait
//! instead of sharing an abstract base class — a discriminated set of
//! concrete backend types behind one trait rather than runtime-polymorphic
//! inheritance.

use crate::coordinate::Coordinate;

/// Shared query contract. A point's type `D` and a payload's type `N` are
/// fixed per index; `N: Clone` because payloads are copied by value/handle
/// out of the index on every query, never borrowed.
pub trait SearchMethod<D: Coordinate, N: Clone>: Send + Sync {
    /// The dimensionality `d` every point in this index shares.
    fn dimensions(&self) -> usize;

    /// The number of points `N` this index was built from.
    fn count(&self) -> usize;

    /// Every (point, payload) pair in the index, in unspecified order.
    fn all_data(&self) -> Vec<(Vec<D>, N)>;

    /// The single closest point to `query`, or `None` if the index is
    /// empty.
    fn nearest_neighbor(&self, query: &[D]) -> Option<(Vec<D>, N)> {
        self.nearest_neighbors(query, 1).into_iter().next()
    }

    /// The `k` closest points to `query`, ascending by distance. `k == 0`
    /// or `k >= count()` both degrade to "return every point" (§4.5 edge
    /// cases), in unspecified order.
    fn nearest_neighbors(&self, query: &[D], k: usize) -> Vec<(Vec<D>, N)>;

    /// Every point within `radius` of `query` (un-squared for L2; the
    /// backend squares it internally exactly once), ascending by
    /// distance, capped at `k` results if `k` is `Some`.
    fn neighbors_in_radius(
        &self,
        query: &[D],
        radius: f64,
        k: Option<usize>,
    ) -> Vec<(Vec<D>, N)>;
}
