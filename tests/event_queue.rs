//! Integration tests for the conquest event queue

use civ_history::core::types::{CivId, TileId};
use civ_history::history::{EventQueue, Invasion};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push(u32),
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(0u32..1000).prop_map(Op::Push), Just(Op::Pop)]
}

#[test]
fn test_follow_ons_come_after_their_trigger() {
    let mut queue = EventQueue::new();
    queue.push(Invasion::new(40.0, CivId(0), TileId(0), TileId(1)));
    queue.push(Invasion::new(90.0, CivId(1), TileId(5), TileId(6)));

    let trigger = queue.pop().unwrap();
    // a follow-on always completes no earlier than its trigger
    queue.push(Invasion::new(trigger.time.into_inner() + 10.0, CivId(0), TileId(1), TileId(2)));

    let order: Vec<(CivId, TileId)> = std::iter::from_fn(|| queue.pop())
        .map(|invasion| (invasion.invader, invasion.end))
        .collect();
    assert_eq!(order, vec![(CivId(0), TileId(2)), (CivId(1), TileId(6))]);
}

#[test]
fn test_peek_matches_pop() {
    let mut queue = EventQueue::new();
    for t in [3.0, 1.0, 2.0] {
        queue.push(Invasion::new(t, CivId(0), TileId(0), TileId(1)));
    }
    let peeked = *queue.peek().unwrap();
    assert_eq!(queue.pop(), Some(peeked));
    assert_eq!(queue.len(), 2);
}

proptest! {
    /// Pops interleaved with pushes never go backwards past what remains
    #[test]
    fn prop_each_pop_is_the_current_minimum(ops in prop::collection::vec(op(), 1..200)) {
        let mut queue = EventQueue::new();
        let mut model: Vec<u32> = Vec::new();
        for op in ops {
            match op {
                Op::Push(value) => {
                    queue.push(value);
                    model.push(value);
                }
                Op::Pop => {
                    let expected = model.iter().copied().min();
                    if let Some(min) = expected {
                        let index = model.iter().position(|&v| v == min).unwrap();
                        model.swap_remove(index);
                    }
                    prop_assert_eq!(queue.pop(), expected);
                }
            }
            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.is_empty(), model.is_empty());
        }
    }

    /// Draining while pushing only values no smaller than the last pop
    /// yields a non-decreasing sequence
    #[test]
    fn prop_monotone_drain(
        initial in prop::collection::vec(0u32..1000, 1..50),
        offsets in prop::collection::vec(0u32..100, 0..50),
    ) {
        let mut queue = EventQueue::new();
        for value in initial {
            queue.push(value);
        }
        let mut offsets = offsets.into_iter();
        let mut last = 0;
        while let Some(value) = queue.pop() {
            prop_assert!(value >= last);
            last = value;
            if let Some(offset) = offsets.next() {
                queue.push(value + offset);
            }
        }
    }
}
