//! The uniform voxel-grid backend (C6): points are bucketed into
//! fixed-size axis-aligned cells, and a query expands outward one shell of
//! neighboring cells at a time until no further shell can possibly improve
//! on the candidates already collected.
//!
//! Cells are addressed by their integer coordinate vector directly (a
//! `Vec<i64>` hash key) rather than by flattening it through per-axis
//! multipliers into one integer — a flattened key risks overflow when the
//! point set's bounding box is large relative to the cell size, and a
//! `HashMap<Vec<i64>, _>` gives the same sparse, only-pay-for-occupied-cells
//! storage without that risk.

use std::collections::HashMap;

use crate::bounded::BoundedPriorityList;
use crate::coordinate::Coordinate;
use crate::error::BuildError;
use crate::metric::MetricKind;
use crate::search::SearchMethod;
use crate::validate::validate_input;

pub struct Voxel<D, N> {
    dim: usize,
    metric: MetricKind,
    minima: Vec<D>,
    side_length: f64,
    inv_side: f64,
    max_layer_bound: i64,
    buckets: HashMap<Vec<i64>, Vec<usize>>,
    points: Vec<Vec<D>>,
    payloads: Vec<N>,
}

impl<D: Coordinate, N: Clone + Send + Sync> Voxel<D, N> {
    /// Build a uniform grid sized so the cell count tracks the point
    /// count, capped at one million cells for very large point sets.
    ///
    /// Cosine-distance has no axis-aligned cell structure to bucket into,
    /// so it's rejected here exactly as it is by the KD-tree.
    pub fn build(points: Vec<Vec<D>>, payloads: Vec<N>, metric: MetricKind) -> Result<Self, BuildError> {
        if !metric.supports_voxel() {
            return Err(BuildError::UnsupportedMetric {
                metric,
                backend: "Voxel",
            });
        }
        let dim = validate_input(&points, &payloads)?;
        let n = points.len();

        let mut minima = vec![D::max_value(); dim];
        let mut maxima = vec![D::min_value(); dim];
        for point in &points {
            for axis in 0..dim {
                if point[axis] < minima[axis] {
                    minima[axis] = point[axis];
                }
                if point[axis] > maxima[axis] {
                    maxima[axis] = point[axis];
                }
            }
        }

        let extents: Vec<f64> = (0..dim)
            .map(|axis| (maxima[axis].to_f64() - minima[axis].to_f64()).max(0.0))
            .collect();
        let target_cells = n.min(1_000_000).max(1) as f64;
        let volume: f64 = extents.iter().map(|&e| e.max(1e-9)).product();
        let side_length = (volume / target_cells).powf(1.0 / dim as f64).max(1e-9);
        let inv_side = 1.0 / side_length;

        let cells_per_axis: Vec<i64> = extents
            .iter()
            .map(|&e| (e * inv_side).ceil() as i64 + 2)
            .collect();
        let max_layer_bound = cells_per_axis.iter().copied().max().unwrap_or(1) * 2 + 2;

        let mut buckets: HashMap<Vec<i64>, Vec<usize>> = HashMap::with_capacity(n);
        for (idx, point) in points.iter().enumerate() {
            let cell = cell_of(point, &minima, inv_side, dim);
            buckets.entry(cell).or_default().push(idx);
        }

        Ok(Self {
            dim,
            metric,
            minima,
            side_length,
            inv_side,
            max_layer_bound,
            buckets,
            points,
            payloads,
        })
    }

    fn cell_of(&self, point: &[D]) -> Vec<i64> {
        cell_of(point, &self.minima, self.inv_side, self.dim)
    }

    fn all_records(&self) -> Vec<(Vec<D>, N)> {
        self.points
            .iter()
            .cloned()
            .zip(self.payloads.iter().cloned())
            .collect()
    }

    fn materialize(&self, list: BoundedPriorityList<usize>) -> Vec<(Vec<D>, N)> {
        list.into_vec()
            .into_iter()
            .map(|(idx, _)| (self.points[idx].clone(), self.payloads[idx].clone()))
            .collect()
    }

    fn query_shells(&self, query: &[D], k_cap: usize, r_bar: f64) -> BoundedPriorityList<usize> {
        let mut list = BoundedPriorityList::new(k_cap);
        let center = self.cell_of(query);

        for layer in 0..=self.max_layer_bound {
            for offset in shell_offsets(self.dim, layer, self.metric) {
                let cell: Vec<i64> = center.iter().zip(&offset).map(|(&c, &o)| c + o).collect();
                if let Some(bucket) = self.buckets.get(&cell) {
                    for &idx in bucket {
                        let d = self.metric.distance(&self.points[idx], query);
                        if d <= r_bar {
                            list.add(idx, d);
                        }
                    }
                }
            }

            // Any point in an unvisited cell lies at least `layer *
            // side_length` away — the query could sit right at the edge
            // of its own cell, so nothing closer than that is guaranteed
            // for a cell `layer + 1` shells out.
            let next_bound = self.metric.effective_radius(layer as f64 * self.side_length);
            if next_bound > r_bar {
                break;
            }
            if list.is_full() && next_bound > list.max_priority().unwrap() {
                break;
            }
        }
        list
    }
}

fn cell_of<D: Coordinate>(point: &[D], minima: &[D], inv_side: f64, dim: usize) -> Vec<i64> {
    (0..dim)
        .map(|axis| ((point[axis].to_f64() - minima[axis].to_f64()) * inv_side).floor() as i64)
        .collect()
}

/// Every integer offset vector of length `dim` whose norm under `metric`
/// equals `layer`. `layer == 0` is always just the origin (the query's own
/// cell), independent of metric.
fn shell_offsets(dim: usize, layer: i64, metric: MetricKind) -> Vec<Vec<i64>> {
    if layer == 0 {
        return vec![vec![0; dim]];
    }
    let mut out = Vec::new();
    let mut current = vec![0i64; dim];
    generate_offsets(dim, layer, metric, 0, &mut current, &mut out);
    out
}

fn generate_offsets(
    dim: usize,
    layer: i64,
    metric: MetricKind,
    axis: usize,
    current: &mut Vec<i64>,
    out: &mut Vec<Vec<i64>>,
) {
    if axis == dim {
        if matches_shell(current, layer, metric) {
            out.push(current.clone());
        }
        return;
    }
    for v in -layer..=layer {
        current[axis] = v;
        generate_offsets(dim, layer, metric, axis + 1, current, out);
    }
}

/// L1's shell is a diamond (coordinates summing in absolute value to
/// exactly `layer`); L∞'s is a square (the offset's largest component hits
/// `layer`); L2's approximates a sphere by rounding the offset's Euclidean
/// norm to the nearest integer layer — distinct from L∞'s square shell, as
/// a true ball and a bounding cube diverge increasingly with `layer`.
fn matches_shell(offset: &[i64], layer: i64, metric: MetricKind) -> bool {
    match metric {
        MetricKind::L1 => offset.iter().map(|v| v.abs()).sum::<i64>() == layer,
        MetricKind::LInf => offset.iter().map(|v| v.abs()).max().unwrap_or(0) == layer,
        MetricKind::L2 => {
            let sum_sq: i64 = offset.iter().map(|v| v * v).sum();
            (sum_sq as f64).sqrt().round() as i64 == layer
        }
        MetricKind::Cosine => unreachable!("voxel rejects cosine at build time"),
    }
}

impl<D: Coordinate, N: Clone + Send + Sync> SearchMethod<D, N> for Voxel<D, N> {
    fn dimensions(&self) -> usize {
        self.dim
    }

    fn count(&self) -> usize {
        self.points.len()
    }

    fn all_data(&self) -> Vec<(Vec<D>, N)> {
        self.all_records()
    }

    fn nearest_neighbors(&self, query: &[D], k: usize) -> Vec<(Vec<D>, N)> {
        if k == 0 || k >= self.points.len() {
            return self.all_records();
        }
        self.materialize(self.query_shells(query, k, f64::INFINITY))
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
            Some(0) | None => self.points.len(),
            Some(kk) => kk.min(self.points.len()),
        };
        if k_cap == 0 {
            return Vec::new();
        }
        self.materialize(self.query_shells(query, k_cap, r_bar))
    }
}
