//! Event queue for the conquest phase
//!
//! A min-heap that stays open while it is drained: events generated by
//! popping another event go into the same queue and come out in global order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::core::types::{CivId, TileId};

/// Heap entry. Equal keys pop in insertion order.
#[derive(Debug)]
struct Queued<T> {
    value: T,
    sequence: u64,
}

impl<T: Ord> PartialEq for Queued<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Ord> Eq for Queued<T> {}

impl<T: Ord> Ord for Queued<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl<T: Ord> PartialOrd for Queued<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum priority queue ordered by `T`'s `Ord`
#[derive(Debug)]
pub struct EventQueue<T: Ord> {
    heap: BinaryHeap<Reverse<Queued<T>>>,
    pushed: u64,
}

impl<T: Ord> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            pushed: 0,
        }
    }
}

impl<T: Ord> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T) {
        let sequence = self.pushed;
        self.pushed += 1;
        self.heap.push(Reverse(Queued { value, sequence }));
    }

    /// Remove and return the smallest value
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|Reverse(queued)| queued.value)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|Reverse(queued)| &queued.value)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

/// A pending attempt by `invader` to take `end` from `start`.
///
/// Ordered by completion time first, so an [`EventQueue`] of invasions
/// drains chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Invasion {
    /// Years since the start of the step
    pub time: OrderedFloat<f64>,
    pub invader: CivId,
    pub start: TileId,
    pub end: TileId,
}

impl Invasion {
    pub fn new(time: f64, invader: CivId, start: TileId, end: TileId) -> Self {
        Self {
            time: OrderedFloat(time),
            invader,
            start,
            end,
        }
    }
}
