//! Process-wide recognizer pool
//!
//! Recognizers start and finish at a high rate, one or more per rune. The
//! pool keeps finished ones around so their penalty buffers can be reused.
//! It is unbounded, LIFO, and never blocks on exhaustion: an empty pool
//! simply allocates.
//!
//! Each rule set keeps one pool in a `static`; the mutex here is the only
//! point where separate segmenters synchronize.

use crate::recognizer::{Recognizer, Step};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters describing pool traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Recognizers handed out
    pub borrowed: usize,
    /// Recognizers given back
    pub returned: usize,
    /// Recognizers created because the free list was empty
    pub allocated: usize,
    /// Recognizers currently waiting in the free list
    pub idle: usize,
}

impl PoolStats {
    /// Recognizers that are out and not yet returned
    ///
    /// The counters are sampled separately, so while other threads are
    /// segmenting a snapshot can show more returns than borrows; that
    /// reads as zero.
    pub fn outstanding(&self) -> usize {
        self.borrowed.saturating_sub(self.returned)
    }
}

/// Free list of recognizers for one rule set
pub struct RecognizerPool<S: Step> {
    free: Mutex<Vec<Recognizer<S>>>,
    borrowed: AtomicUsize,
    returned: AtomicUsize,
    allocated: AtomicUsize,
}

impl<S: Step> RecognizerPool<S> {
    pub const fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            borrowed: AtomicUsize::new(0),
            returned: AtomicUsize::new(0),
            allocated: AtomicUsize::new(0),
        }
    }

    /// Take a recognizer armed with `first` as its next step
    pub fn borrow(&self, expect: S::Class, distance_to_go: usize, first: S) -> Recognizer<S> {
        self.borrowed.fetch_add(1, Ordering::Relaxed);
        match self.free.lock().pop() {
            Some(mut rec) => {
                rec.rearm(expect, distance_to_go, first);
                rec
            }
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                Recognizer::new(expect, distance_to_go, first)
            }
        }
    }

    /// Return a recognizer; all of its fields are cleared
    pub fn give_back(&self, mut rec: Recognizer<S>) {
        rec.clear();
        self.returned.fetch_add(1, Ordering::Relaxed);
        self.free.lock().push(rec);
    }

    pub fn stats(&self) -> PoolStats {
        // returns trail their borrows, so sample them first
        let returned = self.returned.load(Ordering::Relaxed);
        PoolStats {
            borrowed: self.borrowed.load(Ordering::Relaxed),
            returned,
            allocated: self.allocated.load(Ordering::Relaxed),
            idle: self.free.lock().len(),
        }
    }
}

impl<S: Step> Default for RecognizerPool<S> {
    fn default() -> Self {
        Self::new()
    }
}
