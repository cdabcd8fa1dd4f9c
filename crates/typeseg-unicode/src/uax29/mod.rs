//! UAX #29 grapheme cluster and word boundaries
//!
//! Both rule sets use the core penalty vocabulary: `JOIN` for `×`, `BANG`
//! for the hard breaks around line ends and at end of text, `BREAK` for the
//! catch-all rule. `CR × LF` outranks the hard breaks next to it and gets
//! [`JOIN_CRLF`] of its own.

pub mod grapheme;
pub mod word;

pub use grapheme::{GraphemeBreaker, GraphemeClass, GraphemePair, GraphemeStep};
pub use word::{WordBreaker, WordClass, WordPair, WordStep};

use typeseg_core::Penalty;

/// GB3, WB3: CR × LF, strong enough to cancel both hard breaks
pub const JOIN_CRLF: Penalty = 100_000;
