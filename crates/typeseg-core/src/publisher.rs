//! Rune publisher
//!
//! The publisher holds the active recognizers of one breaker and fans each
//! rune event out to them. Its queue is a plain vector split by a `gap`
//! index: everything below the gap is still matching, everything at or
//! above it is done and waiting to be returned to the pool.
//!
//! ```text
//!  0            gap          len
//!  | not done... | done...    |
//! ```
//!
//! Not-done recognizers keep their insertion order, which is also the
//! order in which they see events.

use crate::penalty::{Penalty, PenaltyAggregator};
use crate::pool::RecognizerPool;
use crate::recognizer::{Recognizer, Step};

/// Gap-partitioned container of recognizers
pub struct RunePublisher<S: Step> {
    q: Vec<Recognizer<S>>,
    gap: usize,
    penalties: Vec<Penalty>,
    aggregator: PenaltyAggregator,
    pool: &'static RecognizerPool<S>,
}

impl<S: Step> RunePublisher<S> {
    pub fn new(pool: &'static RecognizerPool<S>) -> Self {
        Self {
            q: Vec::new(),
            gap: 0,
            penalties: Vec::new(),
            aggregator: PenaltyAggregator::default(),
            pool,
        }
    }

    /// Choose how penalties of recognizers accepting together combine
    pub fn set_aggregator(&mut self, aggregator: PenaltyAggregator) {
        self.aggregator = aggregator;
    }

    pub fn aggregator(&self) -> PenaltyAggregator {
        self.aggregator
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Boundary between matching and done recognizers
    pub fn gap(&self) -> usize {
        self.gap
    }

    /// Number of recognizers still matching
    pub fn active(&self) -> usize {
        self.gap
    }

    /// Insert a recognizer; a done one lands above the gap
    pub fn push(&mut self, rec: Recognizer<S>) {
        let done = rec.is_done();
        self.q.push(rec);
        if !done {
            let last = self.q.len() - 1;
            self.q.swap(self.gap, last);
            self.gap += 1;
        }
    }

    /// Borrow a recognizer from the pool and subscribe it
    pub fn start(&mut self, expect: S::Class, distance_to_go: usize, first: S) {
        let rec = self.pool.borrow(expect, distance_to_go, first);
        self.push(rec);
    }

    /// Restore the partition after the done flag of `q[i]` changed
    pub fn fix(&mut self, i: usize) {
        if i >= self.q.len() {
            return;
        }
        let done = self.q[i].is_done();
        if done && i < self.gap {
            self.q[i..self.gap].rotate_left(1);
            self.gap -= 1;
        } else if !done && i >= self.gap {
            self.q[self.gap..=i].rotate_right(1);
            self.gap += 1;
        }
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut Recognizer<S>> {
        self.q.get_mut(i)
    }

    /// A done recognizer, if there is one
    pub fn top(&self) -> Option<&Recognizer<S>> {
        if self.gap < self.q.len() {
            self.q.last()
        } else {
            None
        }
    }

    /// Remove and return a done recognizer, if there is one
    pub fn pop_done(&mut self) -> Option<Recognizer<S>> {
        if self.gap < self.q.len() {
            self.q.pop()
        } else {
            None
        }
    }

    /// Deliver one event to every matching recognizer
    ///
    /// Returns the longest match among recognizers that are still active
    /// afterwards, and the penalties of every recognizer that accepted on
    /// this event, combined element-wise by the aggregator. Finished recognizers are
    /// unsubscribed and go back to the pool.
    pub fn publish(&mut self, rune: Option<char>, class: S::Class) -> (usize, &[Penalty]) {
        self.penalties.clear();
        let mut longest = 0;
        for rec in &mut self.q[..self.gap] {
            if let Some(p) = rec.rune_event(rune, class) {
                self.aggregator.fold(&mut self.penalties, p);
            }
            if !rec.is_done() {
                longest = longest.max(rec.match_len);
            }
        }
        self.settle();
        while let Some(rec) = self.pop_done() {
            self.pool.give_back(rec);
        }
        (longest, &self.penalties)
    }

    /// Move recognizers that finished below the gap above it, keeping
    /// the matching ones in order
    fn settle(&mut self) {
        let mut w = 0;
        for r in 0..self.gap {
            if !self.q[r].is_done() {
                self.q.swap(w, r);
                w += 1;
            }
        }
        self.gap = w;
    }

    /// Longest match among recognizers still matching
    pub fn longest_active_match(&self) -> usize {
        self.q[..self.gap]
            .iter()
            .map(|r| r.match_len)
            .max()
            .unwrap_or(0)
    }

    /// Whether any matching recognizer satisfies `pred`
    pub fn any_active(&self, mut pred: impl FnMut(&Recognizer<S>) -> bool) -> bool {
        self.q[..self.gap].iter().any(&mut pred)
    }

    /// Return every recognizer to the pool
    pub fn clear(&mut self) {
        for rec in self.q.drain(..) {
            self.pool.give_back(rec);
        }
        self.gap = 0;
        self.penalties.clear();
    }

    /// Check the partition: `q[i]` is done exactly when `i >= gap`
    pub fn is_partitioned(&self) -> bool {
        self.q
            .iter()
            .enumerate()
            .all(|(i, r)| r.is_done() == (i >= self.gap))
    }
}

impl<S: Step> Drop for RunePublisher<S> {
    fn drop(&mut self) {
        self.clear();
    }
}
