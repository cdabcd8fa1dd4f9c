//! The contract between breakers and the segmenter
//!
//! A breaker owns one rule set. The segmenter hands it every rune and asks
//! two questions back: how far the longest still-running rule reaches, and
//! which penalties the rune settled.
//!
//! - [`UnicodeBreaker`] - the capability set a rule set implements
//! - [`RuneBreaker`] - the object-safe form the segmenter stores

use crate::penalty::Penalty;
use std::fmt;

/// A rule set driven one rune at a time
///
/// The segmenter calls the methods in a fixed order for each rune:
/// `classify`, `start_rules`, `proceed`, then reads `longest_match` and
/// `penalties`. End of text is delivered as `None`.
pub trait UnicodeBreaker {
    /// Closed class enumeration for this rule set
    type Class: Copy + Eq + fmt::Debug;

    /// Used in logs
    fn name(&self) -> &'static str;

    /// Map a rune to its class, resolving context-dependent classes
    fn classify(&mut self, rune: Option<char>) -> Self::Class;

    /// Subscribe every rule that can begin with this rune
    fn start_rules(&mut self, rune: Option<char>, class: Self::Class);

    /// Deliver the rune to all running rules
    fn proceed(&mut self, rune: Option<char>, class: Self::Class);

    /// Runes the longest still-running rule has consumed
    fn longest_match(&self) -> usize;

    /// Penalties settled by the last rune, index 0 being that rune
    fn penalties(&self) -> &[Penalty];

    /// Forget all running rules and context
    fn reset(&mut self);
}

/// Object-safe view of a breaker, as stored by the segmenter
pub trait RuneBreaker: Send {
    fn name(&self) -> &'static str;

    /// Run one rune through the breaker
    fn feed(&mut self, rune: Option<char>) -> (usize, &[Penalty]);

    fn reset(&mut self);
}

impl<B> RuneBreaker for B
where
    B: UnicodeBreaker + Send,
{
    fn name(&self) -> &'static str {
        UnicodeBreaker::name(self)
    }

    fn feed(&mut self, rune: Option<char>) -> (usize, &[Penalty]) {
        let class = self.classify(rune);
        self.start_rules(rune, class);
        self.proceed(rune, class);
        (self.longest_match(), self.penalties())
    }

    fn reset(&mut self) {
        UnicodeBreaker::reset(self)
    }
}
