//! The KD-tree backend (C5): a balanced, axis-cycling binary space
//! partition with branch-and-bound pruning.
//!
//! Nodes live in a growable array addressed like a binary heap —
//! `2*i + 1`/`2*i + 2` for a node's children — rather than as a tree of
//! `Box`-linked structs. The builder's split is count-balanced (the target
//! left-subtree size is always `count / 2`, with ties broken toward the
//! right child only once the left side has reached that target) rather
//! than value-balanced, so even a run of many duplicate coordinates stays
//! `O(log N)` deep; the array still grows lazily instead of being
//! pre-sized to the textbook `2^⌈log2(N+1)⌉` bound, since that's simpler
//! than threading the final slot count through the recursion.

use crate::bounded::BoundedPriorityList;
use crate::coordinate::Coordinate;
use crate::error::BuildError;
use crate::metric::MetricKind;
use crate::rect::HyperRect;
use crate::search::SearchMethod;
use crate::select::nth_position;
use crate::validate::validate_input;

pub struct KdTree<D, N> {
    dim: usize,
    metric: MetricKind,
    len: usize,
    slots: Vec<Option<(Vec<D>, N)>>,
    root_rect: HyperRect<D>,
}

impl<D: Coordinate, N: Clone + Send + Sync> KdTree<D, N> {
    /// Build a balanced KD-tree. `dimension_min`/`dimension_max` bound the
    /// root search region when the caller knows the data's extent in
    /// advance; `None` falls back to the coordinate type's own sentinels.
    ///
    /// Cosine-distance has no coordinate-wise decomposition — clamping a
    /// query into an axis-aligned box doesn't produce a valid lower bound
    /// on cosine-distance the way it does for L1/L2/L∞ — so it's rejected
    /// here the same way the voxel grid rejects it.
    pub fn build(
        points: Vec<Vec<D>>,
        payloads: Vec<N>,
        metric: MetricKind,
        dimension_min: Option<D>,
        dimension_max: Option<D>,
    ) -> Result<Self, BuildError> {
        if metric == MetricKind::Cosine {
            return Err(BuildError::UnsupportedMetric {
                metric,
                backend: "KdTree",
            });
        }
        let dim = validate_input(&points, &payloads)?;
        let len = points.len();
        let records: Vec<(Vec<D>, N)> = points.into_iter().zip(payloads).collect();

        let lo = dimension_min.unwrap_or_else(D::min_value);
        let hi = dimension_max.unwrap_or_else(D::max_value);
        let root_rect = HyperRect::bounded(dim, lo, hi);

        let mut slots = Vec::new();
        build_node(records, 0, dim, &mut slots, 0);

        Ok(Self {
            dim,
            metric,
            len,
            slots,
            root_rect,
        })
    }

    fn all_records(&self) -> Vec<(Vec<D>, N)> {
        self.slots.iter().filter_map(|s| s.clone()).collect()
    }

    fn materialize(&self, list: BoundedPriorityList<usize>) -> Vec<(Vec<D>, N)> {
        list.into_vec()
            .into_iter()
            .map(|(slot, _)| {
                let node = self.slots[slot].as_ref().expect("visited slot must be occupied");
                (node.0.clone(), node.1.clone())
            })
            .collect()
    }

    fn query_node(
        &self,
        slot_index: usize,
        depth: usize,
        rect: &HyperRect<D>,
        query: &[D],
        r_bar: f64,
        list: &mut BoundedPriorityList<usize>,
    ) {
        let node = match self.slots.get(slot_index) {
            Some(Some(node)) => node,
            _ => return,
        };
        let axis = depth % self.dim;
        let pivot = node.0[axis];
        let (left_rect, right_rect) = rect.split(axis, pivot);

        let (near_index, far_index, near_rect, far_rect) = if query[axis] <= pivot {
            (2 * slot_index + 1, 2 * slot_index + 2, left_rect, right_rect)
        } else {
            (2 * slot_index + 2, 2 * slot_index + 1, right_rect, left_rect)
        };

        self.query_node(near_index, depth + 1, &near_rect, query, r_bar, list);

        let far_closest = far_rect.closest_point_to(query);
        let far_lower_bound = self.metric.distance(&far_closest, query);
        let worth_visiting_far = far_lower_bound <= r_bar
            && (!list.is_full() || far_lower_bound <= list.max_priority().unwrap());
        if worth_visiting_far {
            self.query_node(far_index, depth + 1, &far_rect, query, r_bar, list);
        }

        let own_distance = self.metric.distance(&node.0, query);
        if own_distance <= r_bar {
            list.add(slot_index, own_distance);
        }
    }
}

/// Recursively partition `records` by the median of their `depth % dim`-th
/// coordinate and write the result into `slots` as a level-order array.
fn build_node<D: Coordinate, N>(
    records: Vec<(Vec<D>, N)>,
    depth: usize,
    dim: usize,
    slots: &mut Vec<Option<(Vec<D>, N)>>,
    slot_index: usize,
) {
    if records.is_empty() {
        return;
    }
    ensure_capacity(slots, slot_index);

    if records.len() == 1 {
        slots[slot_index] = records.into_iter().next();
        return;
    }

    let axis = depth % dim;
    let mut projections: Vec<f64> = records.iter().map(|(p, _)| p[axis].to_f64()).collect();
    let mid = records.len() / 2;
    let median = nth_position(&mut projections, mid);

    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();
    for record in records {
        let v = record.0[axis].to_f64();
        if v < median {
            less.push(record);
        } else if v > median {
            greater.push(record);
        } else {
            equal.push(record);
        }
    }
    // at least one record projects exactly onto the median by construction
    let node = equal.pop().expect("median value must match at least one record");

    // Count-balanced split, not value-balanced: `left` must reach size `mid`
    // even when ties pin most records to the median value, or a run of
    // duplicate coordinates collapses into an unbalanced right spine. Any
    // remaining equal-to-pivot records join `greater` in the right subtree.
    while less.len() < mid {
        match equal.pop() {
            Some(record) => less.push(record),
            None => break,
        }
    }
    greater.extend(equal);

    slots[slot_index] = Some(node);
    build_node(less, depth + 1, dim, slots, 2 * slot_index + 1);
    build_node(greater, depth + 1, dim, slots, 2 * slot_index + 2);
}

fn ensure_capacity<D, N>(slots: &mut Vec<Option<(Vec<D>, N)>>, index: usize) {
    if index >= slots.len() {
        slots.resize_with(index + 1, || None);
    }
}

impl<D: Coordinate, N: Clone + Send + Sync> SearchMethod<D, N> for KdTree<D, N> {
    fn dimensions(&self) -> usize {
        self.dim
    }

    fn count(&self) -> usize {
        self.len
    }

    fn all_data(&self) -> Vec<(Vec<D>, N)> {
        self.all_records()
    }

    fn nearest_neighbors(&self, query: &[D], k: usize) -> Vec<(Vec<D>, N)> {
        if k == 0 || k >= self.len {
            return self.all_records();
        }
        let mut list = BoundedPriorityList::new(k);
        self.query_node(0, 0, &self.root_rect, query, f64::INFINITY, &mut list);
        self.materialize(list)
    }

    fn neighbors_in_radius(
        &self,
        query: &[D],
        radius: f64,
        k: Option<usize>,
    ) -> Vec<(Vec<D>, N)> {
        if radius < 0.0 {
            return Vec::new();
        }
        let r_bar = self.metric.effective_radius(radius);
        let k_cap = match k {
            Some(0) | None => self.len,
            Some(kk) => kk.min(self.len),
        };
        if k_cap == 0 {
            return Vec::new();
        }
        let mut list = BoundedPriorityList::new(k_cap);
        self.query_node(0, 0, &self.root_rect, query, r_bar, &mut list);
        self.materialize(list)
    }
}
