//! Binary-heap frontier with deterministic tie-breaking.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::models::NodeId;

/// A frontier entry: node, its tentative cost, and the priority key.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub node: NodeId,
    pub cost: f64,
    key: f64,
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    // Reversed so the max-heap pops the smallest key; equal keys pop in
    // insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of nodes keyed by `f64`.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeId, cost: f64, key: f64) {
        self.heap.push(Entry {
            node,
            cost,
            key,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<Entry> {
        self.heap.pop()
    }
}
