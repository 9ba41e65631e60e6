//! Deferred continuations on a virtual clock.
//!
//! The controller never sleeps. Each continuation is pushed with an
//! absolute due time and popped once the host has advanced the clock past
//! it. Tasks due at the same instant run in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// A continuation scheduled by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task<N> {
    /// Re-check the gate and show the modal.
    Activate,
    /// Move the style block to `<body>` if the head dropped it.
    StyleFallback { style: N },
    /// Detach the modal and its style block after the exit animation.
    Remove { modal: N, style: Option<N> },
}

impl<N> Task<N> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::StyleFallback { .. } => "style-fallback",
            Self::Remove { .. } => "remove",
        }
    }
}

#[derive(Debug)]
struct Deferred<N> {
    due: Duration,
    seq: u64,
    task: Task<N>,
}

// Earliest due first, then insertion order (BinaryHeap is max-heap)
impl<N> Ord for Deferred<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl<N> PartialOrd for Deferred<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<N> PartialEq for Deferred<N> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}
impl<N> Eq for Deferred<N> {}

/// Pending continuations ordered by due time.
#[derive(Debug)]
pub struct TaskQueue<N> {
    heap: BinaryHeap<Deferred<N>>,
    seq: u64,
}

impl<N> Default for TaskQueue<N> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl<N> TaskQueue<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, task: Task<N>) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Deferred { due, seq, task });
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|d| d.due)
    }

    /// Pop the earliest task if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, Task<N>)> {
        if self.next_due()? > now {
            return None;
        }
        self.heap.pop().map(|d| (d.due, d.task))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pops_in_due_order() {
        let mut queue = TaskQueue::<u8>::new();
        queue.schedule(ms(400), Task::Remove { modal: 1, style: None });
        queue.schedule(ms(100), Task::StyleFallback { style: 2 });
        queue.schedule(ms(5000), Task::Activate);

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(10_000)))
            .map(|(due, task)| (due, task.name()))
            .collect();
        assert_eq!(
            order,
            vec![
                (ms(100), "style-fallback"),
                (ms(400), "remove"),
                (ms(5000), "activate"),
            ]
        );
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut queue = TaskQueue::<u8>::new();
        queue.schedule(ms(50), Task::StyleFallback { style: 1 });
        queue.schedule(ms(50), Task::StyleFallback { style: 2 });
        queue.schedule(ms(50), Task::StyleFallback { style: 3 });

        let styles: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(50)))
            .map(|(_, task)| match task {
                Task::StyleFallback { style } => style,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(styles, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_stays_queued() {
        let mut queue = TaskQueue::<u8>::new();
        queue.schedule(ms(5000), Task::Activate);

        assert!(queue.pop_due(ms(4999)).is_none());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_due(), Some(ms(5000)));

        assert_eq!(queue.pop_due(ms(5000)), Some((ms(5000), Task::Activate)));
        assert!(queue.is_empty());
        assert_eq!(queue.next_due(), None);
    }
}
