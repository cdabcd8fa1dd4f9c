// this_file: crates/typeseg-unicode/src/lib.rs

//! Unicode rule sets for the typeseg segmenter.
//!
//! Three breakers plug into [`typeseg_core::Segmenter`]:
//!
//! - [`LineBreaker`] - UAX #14 line break opportunities
//! - [`GraphemeBreaker`] - UAX #29 extended grapheme clusters
//! - [`WordBreaker`] - UAX #29 word boundaries
//!
//! Their class tables come from UCD files, bundled or read from a
//! directory (see [`ucd_config`]), and are built once per process.
//!
//! ```rust,ignore
//! use typeseg_core::{RuneBreaker, Segmenter};
//! use typeseg_unicode::GraphemeBreaker;
//!
//! let breakers: Vec<Box<dyn RuneBreaker>> = vec![Box::new(GraphemeBreaker::new()?)];
//! let mut segmenter = Segmenter::new(breakers);
//! segmenter.init_str("e\u{301}a");
//! let clusters: Vec<String> = segmenter.map(|s| s.map(|s| s.into_string())).collect::<Result<_, _>>()?;
//! assert_eq!(clusters, ["e\u{301}", "a"]);
//! ```

pub mod emoji;
pub mod tables;
pub mod uax14;
pub mod uax29;
pub mod ucd;
pub mod ucd_config;

pub use emoji::{EmojiProperty, EmojiTables};
pub use tables::{
    setup_emoji_classes, setup_grapheme_classes, setup_line_break_classes, setup_word_classes,
};
pub use uax14::{LineBreaker, LineClass};
pub use uax29::{GraphemeBreaker, GraphemeClass, WordBreaker, WordClass};
pub use ucd::RangeTable;

/// Recognizer pool counters, one per rule set
pub fn pool_stats() -> [(&'static str, typeseg_core::PoolStats); 3] {
    [
        ("uax14", uax14::pool_stats()),
        ("uax29-grapheme", uax29::grapheme::pool_stats()),
        ("uax29-word", uax29::word::pool_stats()),
    ]
}


#[cfg(test)]
mod proptests;
