//! Rule recognizers
//!
//! A recognizer is one running instance of a break rule: a small NFA
//! fragment that is fed one `(rune, class)` event at a time. Each rule set
//! describes its steps as a closed enum implementing [`Step`]; the enum
//! value stored in a recognizer is the state it will run on the next event.
//!
//! A recognizer is done once it has no next step. It has *accepted* when
//! it finished with a non-zero match length, and *aborted* when the match
//! length dropped back to zero. Only accepted recognizers hand their
//! penalties to the publisher.
//!
//! Penalty index 0 always refers to the position after the newest rune.
//! Every event shifts the recognizer's penalty vector by one, so a rule can
//! write penalties as it goes and they stay attached to the right runes.

use crate::penalty::{add_penalties, Penalty, NULL};
use std::fmt;

/// The steps of one rule set, as a tagged union
pub trait Step: Copy + fmt::Debug + Send + 'static {
    /// Class tag type the rule set works on
    type Class: Copy + Eq + Default + fmt::Debug + Send + 'static;

    /// Run this step for one event
    ///
    /// Returns the next step, or `None` once the recognizer is finished.
    /// Use [`Recognizer::accept`] and [`Recognizer::abort`] to finish.
    fn step(
        self,
        rec: &mut Recognizer<Self>,
        rune: Option<char>,
        class: Self::Class,
    ) -> Option<Self>;

    /// Whether a rune of `class` extends the match without reaching this
    /// step
    ///
    /// Used for runes that a rule set folds into their predecessor, such
    /// as combining marks under LB9 or WB4. Rules that apply before the
    /// folding return false for those steps.
    fn transparent(self, _class: Self::Class) -> bool {
        false
    }
}

/// An active rule instance
#[derive(Clone)]
pub struct Recognizer<S: Step> {
    /// The class this recognizer requires next
    pub expect: S::Class,
    /// Remaining steps before [`Recognizer::this_class`] accepts
    pub distance_to_go: usize,
    /// Runes seen so far, including the one that started the rule
    pub match_len: usize,
    /// A remembered `match_len`, see [`Recognizer::set_mark`]
    pub mark: usize,
    penalties: Vec<Penalty>,
    next_step: Option<S>,
}

impl<S: Step> Recognizer<S> {
    pub fn new(expect: S::Class, distance_to_go: usize, first: S) -> Self {
        Self {
            expect,
            distance_to_go,
            match_len: 0,
            mark: 0,
            penalties: Vec::new(),
            next_step: Some(first),
        }
    }

    /// Re-arm a recycled recognizer, keeping its penalty buffer allocation
    pub(crate) fn rearm(&mut self, expect: S::Class, distance_to_go: usize, first: S) {
        self.expect = expect;
        self.distance_to_go = distance_to_go;
        self.match_len = 0;
        self.mark = 0;
        self.penalties.clear();
        self.next_step = Some(first);
    }

    /// Clear every field before going back to the pool
    pub(crate) fn clear(&mut self) {
        self.expect = S::Class::default();
        self.distance_to_go = 0;
        self.match_len = 0;
        self.mark = 0;
        self.penalties.clear();
        self.next_step = None;
    }

    pub fn is_done(&self) -> bool {
        self.next_step.is_none()
    }

    pub fn accepted(&self) -> bool {
        self.is_done() && self.match_len > 0 && self.distance_to_go == 0
    }

    pub fn aborted(&self) -> bool {
        self.is_done() && self.match_len == 0
    }

    pub fn next_step(&self) -> Option<S> {
        self.next_step
    }

    pub fn penalties(&self) -> &[Penalty] {
        &self.penalties
    }

    pub(crate) fn penalty_capacity(&self) -> usize {
        self.penalties.capacity()
    }

    /// Deliver one rune event
    ///
    /// Returns the recognizer's penalties if this event made it accept.
    pub fn rune_event(&mut self, rune: Option<char>, class: S::Class) -> Option<&[Penalty]> {
        let step = self.next_step?;
        if !self.penalties.is_empty() {
            self.penalties.insert(0, NULL);
        }
        let extends = self.match_len > 0 && step.transparent(class);
        self.match_len += 1;
        if extends {
            return None;
        }
        self.next_step = step.step(self, rune, class);
        if self.next_step.is_none() && self.match_len > 0 {
            Some(&self.penalties)
        } else {
            None
        }
    }

    /// Finish successfully, adding `penalties` to whatever was collected
    pub fn accept(&mut self, penalties: &[Penalty]) -> Option<S> {
        add_penalties(&mut self.penalties, penalties);
        self.match_len = self.match_len.max(1);
        self.distance_to_go = 0;
        None
    }

    /// Finish without a match
    pub fn abort(&mut self) -> Option<S> {
        self.match_len = 0;
        self.distance_to_go = 0;
        self.penalties.clear();
        None
    }

    /// Default step: take one rune of the expected class
    ///
    /// Accepts with `penalties` once `distance_to_go` reaches zero,
    /// otherwise continues with `again`.
    pub fn this_class(&mut self, class: S::Class, again: S, penalties: &[Penalty]) -> Option<S> {
        if class != self.expect {
            return self.abort();
        }
        self.distance_to_go = self.distance_to_go.saturating_sub(1);
        if self.distance_to_go == 0 {
            self.accept(penalties)
        } else {
            Some(again)
        }
    }

    /// Skip any number of `space` runes, then hand the expected class on
    ///
    /// Space runes keep the recognizer on `repeat`. A rune of the
    /// expected class runs `on_expected`; anything else aborts.
    pub fn opt_spaces(
        &mut self,
        class: S::Class,
        space: S::Class,
        repeat: S,
        on_expected: impl FnOnce(&mut Self) -> Option<S>,
    ) -> Option<S> {
        if class == space {
            Some(repeat)
        } else if class == self.expect {
            on_expected(self)
        } else {
            self.abort()
        }
    }

    /// Add `p` at queue index `i` relative to the newest rune
    pub fn penalize(&mut self, i: usize, p: Penalty) {
        if self.penalties.len() <= i {
            self.penalties.resize(i + 1, NULL);
        }
        self.penalties[i] = self.penalties[i].saturating_add(p);
    }

    /// Add `p` at the position just before the newest rune
    pub fn penalize_before(&mut self, p: Penalty) {
        self.penalize(1, p);
    }

    /// Remember the newest rune
    pub fn set_mark(&mut self) {
        self.mark = self.match_len;
    }

    /// Queue index of the position just before the marked rune
    pub fn before_mark(&self) -> usize {
        self.match_len - self.mark + 1
    }
}

impl<S: Step> fmt::Debug for Recognizer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("expect", &self.expect)
            .field("distance_to_go", &self.distance_to_go)
            .field("match_len", &self.match_len)
            .field("penalties", &self.penalties)
            .field("next_step", &self.next_step)
            .finish()
    }
}
