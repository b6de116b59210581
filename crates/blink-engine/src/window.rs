//! Time-bounded sliding window

use std::collections::VecDeque;

/// Items that carry the time (seconds) they were recorded at
pub trait Timestamped {
    fn timestamp(&self) -> f64;
}

/// Append-only queue of time-ordered items, trimmed lazily by age
#[derive(Debug, Clone)]
pub struct TimeWindow<T> {
    data: VecDeque<T>,
    span_s: f64,
}

impl<T: Timestamped> TimeWindow<T> {
    /// Create a window retaining items no older than `span_s` seconds
    pub fn new(span_s: f64) -> Self {
        Self {
            data: VecDeque::new(),
            span_s,
        }
    }

    /// Append an item. Callers push in non-decreasing timestamp order.
    pub fn push(&mut self, item: T) {
        debug_assert!(
            self.data
                .back()
                .map_or(true, |last| last.timestamp() <= item.timestamp()),
            "time window items must be pushed in order"
        );
        self.data.push_back(item);
    }

    /// Drop every item older than `now - span`. Items exactly on the
    /// boundary are kept. Returns the number of evicted items.
    pub fn evict(&mut self, now: f64) -> usize {
        let cutoff = now - self.span_s;
        let mut evicted = 0;
        while self
            .data
            .front()
            .is_some_and(|item| item.timestamp() < cutoff)
        {
            self.data.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}
