//! Process-wide class tables
//!
//! Each table is built once, on first use, from the directory set in
//! [`crate::ucd_config`] or from the bundled UCD files. A failed build is
//! remembered as well, so every later setup call reports the same error.

use crate::emoji::EmojiTables;
use crate::ucd::RangeTable;
use crate::ucd_config;
use crate::uax14::LineClass;
use crate::uax29::{GraphemeClass, WordClass};
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;
use typeseg_core::SetupError;

pub const LINE_BREAK_FILE: &str = "LineBreak.txt";
pub const GRAPHEME_BREAK_FILE: &str = "GraphemeBreakProperty.txt";
pub const WORD_BREAK_FILE: &str = "WordBreakProperty.txt";
pub const EMOJI_DATA_FILE: &str = "emoji-data.txt";

type Cached<T> = OnceLock<Result<T, SetupError>>;

static LINE_BREAK: Cached<RangeTable<LineClass>> = OnceLock::new();
static GRAPHEME_BREAK: Cached<RangeTable<GraphemeClass>> = OnceLock::new();
static WORD_BREAK: Cached<RangeTable<WordClass>> = OnceLock::new();
static EMOJI: Cached<EmojiTables> = OnceLock::new();

/// Line break classes (UAX #14); unlisted code points are `XX`
pub fn setup_line_break_classes() -> Result<&'static RangeTable<LineClass>, SetupError> {
    LINE_BREAK
        .get_or_init(|| build_range_table(LINE_BREAK_FILE, LineClass::XX, LineClass::from_ucd_name))
        .as_ref()
        .map_err(Clone::clone)
}

/// Grapheme cluster break classes (UAX #29); unlisted code points are `Other`
pub fn setup_grapheme_classes() -> Result<&'static RangeTable<GraphemeClass>, SetupError> {
    GRAPHEME_BREAK
        .get_or_init(|| {
            build_range_table(GRAPHEME_BREAK_FILE, GraphemeClass::Other, GraphemeClass::from_ucd_name)
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Word break classes (UAX #29); unlisted code points are `Other`
pub fn setup_word_classes() -> Result<&'static RangeTable<WordClass>, SetupError> {
    WORD_BREAK
        .get_or_init(|| build_range_table(WORD_BREAK_FILE, WordClass::Other, WordClass::from_ucd_name))
        .as_ref()
        .map_err(Clone::clone)
}

/// Emoji properties, needed for `Extended_Pictographic`
pub fn setup_emoji_classes() -> Result<&'static EmojiTables, SetupError> {
    EMOJI
        .get_or_init(|| {
            let text = source_text(ucd_config::ucd_dir().as_deref(), EMOJI_DATA_FILE)?;
            let tables = EmojiTables::parse(EMOJI_DATA_FILE, &text);
            log_outcome(EMOJI_DATA_FILE, tables.as_ref().map(|_| 0));
            tables
        })
        .as_ref()
        .map_err(Clone::clone)
}

fn build_range_table<C: Copy + PartialEq>(
    file: &'static str,
    default: C,
    resolve: fn(&str) -> Option<C>,
) -> Result<RangeTable<C>, SetupError> {
    let text = source_text(ucd_config::ucd_dir().as_deref(), file)?;
    let table = RangeTable::parse(file, &text, default, resolve);
    log_outcome(file, table.as_ref().map(RangeTable::len));
    table
}

fn log_outcome(file: &str, outcome: Result<usize, &SetupError>) {
    match outcome {
        Ok(0) => log::info!("Typeseg set up classes from {file}"),
        Ok(ranges) => log::info!("Typeseg set up classes from {file}: {ranges} ranges"),
        Err(e) => log::error!("Typeseg could not set up classes: {e}"),
    }
}

/// Text of `file`, read from `dir` or taken from the bundled copy
pub fn source_text(dir: Option<&Path>, file: &'static str) -> Result<Cow<'static, str>, SetupError> {
    match dir {
        Some(dir) => {
            let path = dir.join(file);
            log::debug!("Reading {}", path.display());
            std::fs::read_to_string(&path)
                .map(Cow::Owned)
                .map_err(|e| SetupError::Missing {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                })
        }
        None => bundled(file).map(Cow::Borrowed).ok_or_else(|| SetupError::Missing {
            file: file.to_string(),
            reason: "not a bundled UCD file".to_string(),
        }),
    }
}

fn bundled(file: &str) -> Option<&'static str> {
    Some(match file {
        LINE_BREAK_FILE => include_str!("../data/LineBreak.txt"),
        GRAPHEME_BREAK_FILE => include_str!("../data/GraphemeBreakProperty.txt"),
        WORD_BREAK_FILE => include_str!("../data/WordBreakProperty.txt"),
        EMOJI_DATA_FILE => include_str!("../data/emoji-data.txt"),
        _ => return None,
    })
}
