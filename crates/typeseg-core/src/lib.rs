//! Typeseg Core: rules in, segments out
//!
//! Text segmentation as a stream. Runes arrive one at a time, every break
//! rule that can start on a rune starts, and the rules that finish leave
//! penalties behind on the runes they matched. The segmenter cuts a segment
//! as soon as no running rule can change its mind about it.
//!
//! ## The Moving Parts
//!
//! 1. **Penalties** - [`penalty`] holds the signed break costs rules emit
//! 2. **Recognizers** - [`Recognizer`] runs one rule as a small state machine
//! 3. **Pool** - [`RecognizerPool`] recycles finished recognizers process-wide
//! 4. **Publisher** - [`RunePublisher`] fans rune events out to active recognizers
//! 5. **Breakers** - [`UnicodeBreaker`] bundles a rule set behind one interface
//! 6. **Segmenter** - [`Segmenter`] drives breakers over a [`RuneReader`]
//!
//! ## Cutting Your First Segments
//!
//! ```rust,ignore
//! use typeseg_core::{Segmenter, RuneBreaker};
//!
//! let breakers: Vec<Box<dyn RuneBreaker>> = vec![Box::new(my_breaker)];
//! let mut segmenter = Segmenter::new(breakers);
//! segmenter.init_str("Hello World");
//!
//! for segment in segmenter {
//!     let segment = segment?;
//!     println!("{:?} ends with penalty {}", segment.text(), segment.penalty());
//! }
//! ```
//!
//! The Unicode rule sets live in `typeseg-unicode`; this crate only knows
//! how to run them.

// this_file: crates/typeseg-core/src/lib.rs

pub mod error;
pub mod penalty;
pub mod pool;
pub mod publisher;
pub mod reader;
pub mod recognizer;
pub mod segmenter;
pub mod traits;

pub use error::{Result, SegmentError, SetupError};
pub use penalty::{Penalty, PenaltyAggregator};
pub use pool::{PoolStats, RecognizerPool};
pub use publisher::RunePublisher;
pub use reader::{RuneReader, StrReader, Utf8Reader};
pub use recognizer::{Recognizer, Step};
pub use segmenter::{NullPenalty, Segment, Segmenter, SegmenterOptions, MAX_SEGMENT_LEN};
pub use traits::{RuneBreaker, UnicodeBreaker};

#[cfg(test)]
mod proptests;
