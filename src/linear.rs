//! Exhaustive linear scan (C7): the simplest backend, and the correctness
//! oracle every other backend is tested against.

use rayon::prelude::*;

use crate::bounded::BoundedPriorityList;
use crate::coordinate::Coordinate;
use crate::error::BuildError;
use crate::metric::MetricKind;
use crate::search::SearchMethod;
use crate::validate::validate_input;

/// A flat array of points scanned in full on every query.
pub struct Linear<D, N> {
    dim: usize,
    metric: MetricKind,
    points: Vec<Vec<D>>,
    payloads: Vec<N>,
}

impl<D: Coordinate, N: Clone + Send + Sync> Linear<D, N> {
    /// Build from an owned point/payload set. Cosine-distance is fine here
    /// — unlike the voxel grid, a linear scan has no notion of a grid cell
    /// to be incompatible with.
    pub fn build(
        points: Vec<Vec<D>>,
        payloads: Vec<N>,
        metric: MetricKind,
    ) -> Result<Self, BuildError> {
        let dim = validate_input(&points, &payloads)?;
        Ok(Self {
            dim,
            metric,
            points,
            payloads,
        })
    }

    fn materialize(&self, list: BoundedPriorityList<usize>) -> Vec<(Vec<D>, N)> {
        list.into_vec()
            .into_iter()
            .map(|(i, _)| (self.points[i].clone(), self.payloads[i].clone()))
            .collect()
    }

    fn all_indices(&self) -> Vec<(Vec<D>, N)> {
        self.points
            .iter()
            .cloned()
            .zip(self.payloads.iter().cloned())
            .collect()
    }

    fn scan(&self, query: &[D], k_cap: usize, r_bar: f64) -> BoundedPriorityList<usize> {
        let mut list = BoundedPriorityList::new(k_cap);
        for (i, point) in self.points.iter().enumerate() {
            let d = self.metric.distance(point, query);
            if d <= r_bar {
                list.add(i, d);
            }
        }
        list
    }

    /// Rayon-parallel scan, generalizing the teacher's `search_parallel`:
    /// each chunk of the point array is scanned into a local bounded list
    /// on its own thread, and the lists are merged pairwise via `reduce`.
    pub fn scan_parallel(&self, query: &[D], k_cap: usize, r_bar: f64) -> BoundedPriorityList<usize> {
        if k_cap == 0 || self.points.is_empty() {
            return BoundedPriorityList::new(k_cap);
        }
        let threads = rayon::current_num_threads().max(1);
        let chunk_size = (self.points.len() / threads).max(1);
        self.points
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(chunk_idx, chunk)| {
                let base = chunk_idx * chunk_size;
                let mut local = BoundedPriorityList::new(k_cap);
                for (offset, point) in chunk.iter().enumerate() {
                    let d = self.metric.distance(point, query);
                    if d <= r_bar {
                        local.add(base + offset, d);
                    }
                }
                local
            })
            .reduce(
                || BoundedPriorityList::new(k_cap),
                |mut a, b| {
                    for (idx, d) in b.into_vec() {
                        a.add(idx, d);
                    }
                    a
                },
            )
    }

    /// Parallel counterpart to `nearest_neighbors`/`neighbors_in_radius`,
    /// exposed for the ensemble and for benchmarking — not part of
    /// `SearchMethod` since ordinary callers don't need to choose.
    pub fn nearest_neighbors_parallel(&self, query: &[D], k: usize) -> Vec<(Vec<D>, N)> {
        if k == 0 || k >= self.points.len() {
            return self.all_indices();
        }
        self.materialize(self.scan_parallel(query, k, f64::INFINITY))
    }
}

impl<D: Coordinate, N: Clone + Send + Sync> SearchMethod<D, N> for Linear<D, N> {
    fn dimensions(&self) -> usize {
        self.dim
    }

    fn count(&self) -> usize {
        self.points.len()
    }

    fn all_data(&self) -> Vec<(Vec<D>, N)> {
        self.all_indices()
    }

    fn nearest_neighbors(&self, query: &[D], k: usize) -> Vec<(Vec<D>, N)> {
        if k == 0 || k >= self.points.len() {
            return self.all_indices();
        }
        self.materialize(self.scan(query, k, f64::INFINITY))
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
        self.materialize(self.scan(query, k_cap, r_bar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wikipedia_points() -> (Vec<Vec<f64>>, Vec<&'static str>) {
        (
            vec![
                vec![7.0, 2.0],
                vec![5.0, 4.0],
                vec![2.0, 3.0],
                vec![4.0, 7.0],
                vec![9.0, 6.0],
                vec![8.0, 1.0],
            ],
            vec!["A", "B", "C", "D", "E", "F"],
        )
    }

    #[test]
    fn nearest_one_matches_wikipedia_example() {
        let (points, payloads) = wikipedia_points();
        let index = Linear::build(points, payloads, MetricKind::L2).unwrap();
        let (point, payload) = index.nearest_neighbor(&[9.0, 2.0]).unwrap();
        assert_eq!(point, vec![8.0, 1.0]);
        assert_eq!(payload, "F");
    }

    #[test]
    fn nearest_three_matches_wikipedia_example() {
        let (points, payloads) = wikipedia_points();
        let index = Linear::build(points, payloads, MetricKind::L2).unwrap();
        let got = index.nearest_neighbors(&[9.0, 2.0], 3);
        let labels: Vec<_> = got.iter().map(|(_, p)| *p).collect();
        assert_eq!(labels, vec!["F", "A", "E"]);
    }

    #[test]
    fn degenerate_k_returns_everything() {
        let (points, payloads) = wikipedia_points();
        let index = Linear::build(points.clone(), payloads.clone(), MetricKind::L2).unwrap();
        assert_eq!(index.nearest_neighbors(&[0.0, 0.0], 0).len(), points.len());
        assert_eq!(
            index.nearest_neighbors(&[0.0, 0.0], points.len() + 10).len(),
            points.len()
        );
    }

    #[test]
    fn negative_radius_returns_empty() {
        let (points, payloads) = wikipedia_points();
        let index = Linear::build(points, payloads, MetricKind::L2).unwrap();
        assert!(index.neighbors_in_radius(&[0.0, 0.0], -1.0, None).is_empty());
    }

    #[test]
    fn ties_at_same_point_both_returned() {
        let points = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        let payloads = vec!["X", "Y"];
        let index = Linear::build(points, payloads, MetricKind::L2).unwrap();
        let got = index.nearest_neighbors(&[1.0, 1.0], 2);
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|(_, p)| *p == "X" || *p == "Y"));
    }

    #[test]
    fn parallel_scan_agrees_with_sequential() {
        let points: Vec<Vec<f64>> = (0..500)
            .map(|i| vec![i as f64, (i * 7 % 13) as f64])
            .collect();
        let payloads: Vec<usize> = (0..500).collect();
        let index = Linear::build(points, payloads, MetricKind::L2).unwrap();
        let query = [250.0, 6.0];
        let seq = index.nearest_neighbors(&query, 10);
        let par = index.nearest_neighbors_parallel(&query, 10);
        let seq_ids: std::collections::HashSet<_> = seq.iter().map(|(_, id)| *id).collect();
        let par_ids: std::collections::HashSet<_> = par.iter().map(|(_, id)| *id).collect();
        assert_eq!(seq_ids, par_ids);
    }

    #[test]
    fn build_rejects_shape_mismatch() {
        let points = vec![vec![1.0, 2.0], vec![1.0]];
        let payloads = vec!["a", "b"];
        let err = Linear::build(points, payloads, MetricKind::L2).unwrap_err();
        matches!(err, BuildError::ShapeMismatch { .. });
    }

    #[test]
    fn build_rejects_empty_input() {
        let points: Vec<Vec<f64>> = vec![];
        let payloads: Vec<&str> = vec![];
        let err = Linear::build(points, payloads, MetricKind::L2).unwrap_err();
        assert_eq!(err, BuildError::EmptyInput);
    }
}
