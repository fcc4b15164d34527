//! A fixed-capacity, priority-sorted container used to collect the k best
//! (lowest-distance) matches seen during a traversal.
//!
//! Two parallel `Vec`s would work just as well as the single `Vec<(E,
//! f64)>` used here; either way a binary-heap is deliberately not used —
//! `K` is typically small (at most a few hundred) and a binary-searched
//! insert into a contiguous array is cache-friendlier than heap sift-ups.

/// Capacity-`K` container sorted ascending by priority (distance).
///
/// Ties are broken by stable insertion order: a newly inserted element
/// with a priority equal to an existing one is placed *before* the
/// existing equal entries, i.e. at the first position satisfying the
/// equality. This only matters for callers who inspect result order when
/// distances tie; the k-best *set* is unaffected.
#[derive(Debug, Clone)]
pub struct BoundedPriorityList<E> {
    capacity: usize,
    entries: Vec<(E, f64)>,
}

impl<E> BoundedPriorityList<E> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity.min(1024)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// The smallest priority currently held, if any.
    pub fn min_priority(&self) -> Option<f64> {
        self.entries.first().map(|(_, p)| *p)
    }

    /// The largest priority currently held, if any. Once the list is full
    /// this is the threshold a new candidate must beat to be admitted.
    pub fn max_priority(&self) -> Option<f64> {
        self.entries.last().map(|(_, p)| *p)
    }

    pub fn get(&self, index: usize) -> Option<&(E, f64)> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(E, f64)> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<(E, f64)> {
        self.entries
    }

    /// Attempt to add `(element, priority)`.
    ///
    /// - If there's room, insert in sorted position and return `true`.
    /// - If full and `priority` strictly beats the current maximum, evict
    ///   the maximum and insert in sorted position, returning `true`.
    /// - Otherwise this is a no-op and returns `false`.
    pub fn add(&mut self, element: E, priority: f64) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            let pos = self.insertion_point(priority);
            self.entries.insert(pos, (element, priority));
            return true;
        }
        if priority < self.entries[self.capacity - 1].1 {
            self.entries.pop();
            let pos = self.insertion_point(priority);
            self.entries.insert(pos, (element, priority));
            return true;
        }
        false
    }

    /// First index whose existing priority is `>= priority` — inserting
    /// here keeps the list sorted and places `priority` ahead of any
    /// existing ties.
    fn insertion_point(&self, priority: f64) -> usize {
        self.entries.partition_point(|(_, p)| *p < priority)
    }
}
