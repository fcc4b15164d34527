//! Races several independent index backends against the same query (C9).
//!
//! Nearest-1 is a pure race: every member is exact, so whichever one
//! answers first is already correct and nothing needs to wait for the
//! others — each member runs on a detached `std::thread::spawn`, and the
//! first result to arrive on the channel wins. k-NN and radius queries
//! can't short-circuit that way since a complete answer needs every
//! member's output merged together, so those use `std::thread::scope`
//! instead: a blocking join that lets each spawned closure borrow `query`
//! directly instead of cloning it into a `'static` closure.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::coordinate::Coordinate;
use crate::metric::MetricKind;
use crate::search::SearchMethod;

/// A set of index backends built over the same points, queried
/// concurrently. `metric` must be the metric every member was itself built
/// with — members can be arbitrary `SearchMethod` implementors, so the
/// ensemble can't re-derive it, but it needs one shared yardstick to merge
/// and rank their pooled answers.
pub struct Ensemble<D, N> {
    dim: usize,
    count: usize,
    metric: MetricKind,
    members: Vec<Arc<dyn SearchMethod<D, N>>>,
}

impl<D, N> Ensemble<D, N>
where
    D: Coordinate,
    N: Clone + Send + Sync + PartialEq + 'static,
{
    pub fn new(metric: MetricKind, members: Vec<Arc<dyn SearchMethod<D, N>>>) -> Self {
        assert!(!members.is_empty(), "an ensemble needs at least one member index");
        let dim = members[0].dimensions();
        let count = members[0].count();
        for member in &members[1..] {
            debug_assert_eq!(
                member.dimensions(),
                dim,
                "ensemble members must share a dimension"
            );
        }
        Self {
            dim,
            count,
            metric,
            members,
        }
    }

    /// Pool candidates from every member, drop duplicates (the same point
    /// can legitimately surface from more than one backend — all members
    /// were built over the same data), re-rank by actual distance under
    /// the shared metric, and keep the closest `cap`.
    fn dedup_sort_truncate(
        &self,
        query: &[D],
        candidates: Vec<(Vec<D>, N)>,
        cap: usize,
    ) -> Vec<(Vec<D>, N)> {
        let mut deduped: Vec<(Vec<D>, N)> = Vec::with_capacity(candidates.len());
        'outer: for candidate in candidates {
            for existing in &deduped {
                if existing.0 == candidate.0 && existing.1 == candidate.1 {
                    continue 'outer;
                }
            }
            deduped.push(candidate);
        }
        deduped.sort_by(|a, b| {
            let da = self.metric.distance(&a.0, query);
            let db = self.metric.distance(&b.0, query);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
        deduped.truncate(cap);
        deduped
    }
}

impl<D, N> SearchMethod<D, N> for Ensemble<D, N>
where
    D: Coordinate,
    N: Clone + Send + Sync + PartialEq + 'static,
{
    fn dimensions(&self) -> usize {
        self.dim
    }

    fn count(&self) -> usize {
        self.count
    }

    fn all_data(&self) -> Vec<(Vec<D>, N)> {
        self.members[0].all_data()
    }

    fn nearest_neighbor(&self, query: &[D]) -> Option<(Vec<D>, N)> {
        let (tx, rx) = mpsc::channel();
        let query_owned: Vec<D> = query.to_vec();
        for member in &self.members {
            let member = Arc::clone(member);
            let tx = tx.clone();
            let query_owned = query_owned.clone();
            thread::spawn(move || {
                if let Some(found) = member.nearest_neighbor(&query_owned) {
                    let _ = tx.send(found);
                }
            });
        }
        drop(tx);
        rx.recv().ok()
    }

    fn nearest_neighbors(&self, query: &[D], k: usize) -> Vec<(Vec<D>, N)> {
        if k == 0 || k >= self.count {
            return self.all_data();
        }
        let pooled = self.query_all_members(|member| member.nearest_neighbors(query, k));
        self.dedup_sort_truncate(query, pooled, k)
    }

    fn neighbors_in_radius(
        &self,
        query: &[D],
        radius: f64,
        k: Option<usize>,
    ) -> Vec<(Vec<D>, N)> {
        let pooled = self.query_all_members(|member| member.neighbors_in_radius(query, radius, k));
        let cap = k.unwrap_or_else(|| pooled.len().max(1));
        self.dedup_sort_truncate(query, pooled, cap)
    }
}

impl<D, N> Ensemble<D, N>
where
    D: Coordinate,
    N: Clone + Send + Sync + PartialEq + 'static,
{
    fn query_all_members<F>(&self, run: F) -> Vec<(Vec<D>, N)>
    where
        F: Fn(&Arc<dyn SearchMethod<D, N>>) -> Vec<(Vec<D>, N)> + Sync,
    {
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .members
                .iter()
                .map(|member| scope.spawn(|| run(member)))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().expect("ensemble member search thread panicked"))
                .collect()
        })
    }
}
