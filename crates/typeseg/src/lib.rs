//! Typeseg - streaming Unicode text segmentation
//!
//! Typeseg cuts text into segments one rune at a time, with every break
//! rule running as a small recognizer:
//! 1. Runes are read from a string or any `Read` source
//! 2. Each breaker classifies the rune and starts the rules it can begin
//! 3. Finished rules leave penalties on the runes they matched
//! 4. A segment is emitted once no running rule can still change it
//!
//! # Breakers
//!
//! - **Grapheme**: UAX #29 extended grapheme clusters
//! - **Word**: UAX #29 word boundaries
//! - **Line**: UAX #14 line break opportunities
//!
//! Several breakers can run side by side; their penalties add up.
//!
//! # Example
//!
//! ```ignore
//! use typeseg::{segmenter_for, BreakerKind};
//!
//! let mut segmenter = segmenter_for(BreakerKind::Line)?;
//! segmenter.init_str("The quick brown fox");
//! for segment in segmenter {
//!     let segment = segment?;
//!     println!("{:?} {}", segment.text(), segment.penalty());
//! }
//! ```

pub use typeseg_core::{
    error, penalty, NullPenalty, Penalty, Result, RuneBreaker, RuneReader, Segment, SegmentError,
    Segmenter, SegmenterOptions, SetupError, StrReader, Utf8Reader,
};
pub use typeseg_unicode as unicode;
pub use typeseg_unicode::{GraphemeBreaker, LineBreaker, WordBreaker};

/// The rule sets this crate ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakerKind {
    Grapheme,
    Word,
    Line,
}

impl BreakerKind {
    pub const ALL: [BreakerKind; 3] = [BreakerKind::Grapheme, BreakerKind::Word, BreakerKind::Line];

    /// A fresh breaker of this kind
    pub fn breaker(self) -> Result<Box<dyn RuneBreaker>> {
        Ok(match self {
            BreakerKind::Grapheme => Box::new(GraphemeBreaker::new()?),
            BreakerKind::Word => Box::new(WordBreaker::new()?),
            BreakerKind::Line => Box::new(LineBreaker::new()?),
        })
    }
}

/// A segmenter running one breaker of `kind`
pub fn segmenter_for<'r>(kind: BreakerKind) -> Result<Segmenter<'r>> {
    log::debug!("Building {kind:?} segmenter");
    Ok(Segmenter::new(vec![kind.breaker()?]))
}

/// Segment `text` completely with one breaker
pub fn segment_str(kind: BreakerKind, text: &str) -> Result<Vec<Segment>> {
    let mut segmenter = segmenter_for(kind)?;
    segmenter.init_str(text);
    segmenter.collect()
}

/// Extended grapheme clusters of `text`
pub fn graphemes(text: &str) -> Result<Vec<Segment>> {
    segment_str(BreakerKind::Grapheme, text)
}

/// Word boundary segments of `text`, spaces and punctuation included
pub fn words(text: &str) -> Result<Vec<Segment>> {
    segment_str(BreakerKind::Word, text)
}

/// Text between line break opportunities; each segment keeps its
/// trailing spaces
pub fn line_segments(text: &str) -> Result<Vec<Segment>> {
    segment_str(BreakerKind::Line, text)
}
