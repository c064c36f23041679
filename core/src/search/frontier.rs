//! Priority frontier: a binary-heap min-queue of search entries.
//!
//! There is no decrease-key. When the search finds a cheaper route to a node
//! it pushes the node again; the older entry stays queued until popped. The
//! engine's cost bookkeeping decides what is worth expanding, so duplicate
//! entries only cost extra pops.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A queued value paired with its priority. Lower priority pops first.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    priority: OrderedFloat<f64>,
    value: T,
}

impl<T> Entry<T> {
    pub fn new(value: T, priority: f64) -> Self {
        Entry {
            priority: OrderedFloat(priority),
            value,
        }
    }

    pub fn priority(&self) -> f64 {
        self.priority.into_inner()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

// Ordering looks at the priority only, reversed so `BinaryHeap` (a max-heap)
// yields the smallest priority first.
impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
    }
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// Min-priority queue. Ties pop in heap order, which is not insertion order.
#[derive(Debug, Clone)]
pub struct Frontier<T> {
    heap: BinaryHeap<Entry<T>>,
}

impl<T> Frontier<T> {
    pub fn new() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
        }
    }

    /// Insert `value` with `priority`. O(log n).
    pub fn push(&mut self, value: T, priority: f64) {
        self.heap.push(Entry::new(value, priority));
    }

    /// Remove and return the entry with the smallest priority. O(log n).
    pub fn pop_min(&mut self) -> Option<Entry<T>> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for Frontier<T> {
    fn default() -> Self {
        Frontier::new()
    }
}
