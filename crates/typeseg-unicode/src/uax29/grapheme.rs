//! Extended grapheme clusters
//!
//! GB1 needs nothing, GB2 is a hard break on end of text, GB999 is the
//! default break every rune leaves before itself. The rest are recognizers.

use super::JOIN_CRLF;
use crate::emoji::EmojiTables;
use crate::tables::{setup_emoji_classes, setup_grapheme_classes};
use crate::ucd::RangeTable;
use typeseg_core::penalty::{BANG, BREAK, JOIN, NULL};
use typeseg_core::{
    Penalty, PoolStats, Recognizer, RecognizerPool, RunePublisher, SetupError, Step, UnicodeBreaker,
};

/// Grapheme cluster break classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GraphemeClass {
    CR,
    LF,
    Control,
    Extend,
    ZWJ,
    RegionalIndicator,
    Prepend,
    SpacingMark,
    L,
    V,
    T,
    LV,
    LVT,
    #[default]
    Other,
    /// `Other` with the emoji property `Extended_Pictographic`
    ExtendedPictographic,
    Eot,
}

impl GraphemeClass {
    pub fn from_ucd_name(name: &str) -> Option<Self> {
        use GraphemeClass::*;
        Some(match name {
            "CR" => CR,
            "LF" => LF,
            "Control" => Control,
            "Extend" => Extend,
            "ZWJ" => ZWJ,
            "Regional_Indicator" => RegionalIndicator,
            "Prepend" => Prepend,
            "SpacingMark" => SpacingMark,
            "L" => L,
            "V" => V,
            "T" => T,
            "LV" => LV,
            "LVT" => LVT,
            "Other" => Other,
            _ => return None,
        })
    }
}

/// Rules settled by the rune right after their first one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphemePair {
    /// GB3: CR × LF
    CrLf,
    /// GB4: (Control | CR | LF) ÷
    Control,
    /// GB6: L × (L | V | LV | LVT)
    HangulL,
    /// GB7: (LV | V) × (V | T)
    HangulV,
    /// GB8: (LVT | T) × T
    HangulT,
    /// GB9b: Prepend ×
    Prepend,
    /// GB12, GB13: RI × RI, started on odd runs only
    RegionalPair,
}

impl GraphemePair {
    fn settle(self, class: GraphemeClass) -> Option<Penalty> {
        use GraphemeClass::*;
        match self {
            GraphemePair::CrLf => (class == LF).then_some(JOIN_CRLF),
            GraphemePair::Control => Some(BANG),
            GraphemePair::HangulL => matches!(class, L | V | LV | LVT).then_some(JOIN),
            GraphemePair::HangulV => matches!(class, V | T).then_some(JOIN),
            GraphemePair::HangulT => (class == T).then_some(JOIN),
            GraphemePair::Prepend => (class != Eot).then_some(JOIN),
            GraphemePair::RegionalPair => (class == RegionalIndicator).then_some(JOIN),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphemeStep {
    /// Settles the position before the starting rune
    Before(Penalty),
    PairStart(GraphemePair),
    PairNext(GraphemePair),
    /// GB11: ExtPict Extend* ZWJ × ExtPict
    EmojiStart,
    EmojiExtend,
    EmojiZwj,
}

impl Step for GraphemeStep {
    type Class = GraphemeClass;

    fn step(self, rec: &mut Recognizer<Self>, _rune: Option<char>, class: GraphemeClass) -> Option<Self> {
        match self {
            GraphemeStep::Before(p) => rec.accept(&[0, p]),
            GraphemeStep::PairStart(pair) => Some(GraphemeStep::PairNext(pair)),
            GraphemeStep::PairNext(pair) => match pair.settle(class) {
                Some(p) => rec.accept(&[0, p]),
                None => rec.abort(),
            },
            GraphemeStep::EmojiStart => Some(GraphemeStep::EmojiExtend),
            GraphemeStep::EmojiExtend => match class {
                GraphemeClass::Extend => Some(GraphemeStep::EmojiExtend),
                GraphemeClass::ZWJ => Some(GraphemeStep::EmojiZwj),
                _ => rec.abort(),
            },
            GraphemeStep::EmojiZwj => match class {
                GraphemeClass::ExtendedPictographic => rec.accept(&[0, JOIN]),
                _ => rec.abort(),
            },
        }
    }
}

static POOL: RecognizerPool<GraphemeStep> = RecognizerPool::new();

/// Counters of the recognizer pool shared by all grapheme breakers
pub fn pool_stats() -> PoolStats {
    POOL.stats()
}

/// UAX #29 grapheme cluster rule set
pub struct GraphemeBreaker {
    classes: &'static RangeTable<GraphemeClass>,
    emoji: &'static EmojiTables,
    publisher: RunePublisher<GraphemeStep>,
    penalties: Vec<Penalty>,
    longest: usize,
    regional_run: usize,
}

impl GraphemeBreaker {
    pub fn new() -> Result<Self, SetupError> {
        Ok(Self {
            classes: setup_grapheme_classes()?,
            emoji: setup_emoji_classes()?,
            publisher: RunePublisher::new(&POOL),
            penalties: Vec::new(),
            longest: 0,
            regional_run: 0,
        })
    }

    fn start(&mut self, step: GraphemeStep) {
        self.publisher.start(GraphemeClass::Other, 0, step);
    }

    fn start_pair(&mut self, pair: GraphemePair) {
        self.start(GraphemeStep::PairStart(pair));
    }
}

impl UnicodeBreaker for GraphemeBreaker {
    type Class = GraphemeClass;

    fn name(&self) -> &'static str {
        "uax29-grapheme"
    }

    fn classify(&mut self, rune: Option<char>) -> GraphemeClass {
        let Some(c) = rune else {
            return GraphemeClass::Eot;
        };
        match self.classes.lookup(c) {
            GraphemeClass::Other if self.emoji.is_extended_pictographic(c) => {
                GraphemeClass::ExtendedPictographic
            }
            class => class,
        }
    }

    fn start_rules(&mut self, _rune: Option<char>, class: GraphemeClass) {
        use GraphemeClass::*;
        match class {
            Eot => self.start(GraphemeStep::Before(BANG)),
            CR => {
                self.start(GraphemeStep::Before(BANG));
                self.start_pair(GraphemePair::CrLf);
                self.start_pair(GraphemePair::Control);
            }
            LF | Control => {
                self.start(GraphemeStep::Before(BANG));
                self.start_pair(GraphemePair::Control);
            }
            // GB9, GB9a
            Extend | ZWJ | SpacingMark => self.start(GraphemeStep::Before(JOIN)),
            Prepend => self.start_pair(GraphemePair::Prepend),
            L => self.start_pair(GraphemePair::HangulL),
            LV | V => self.start_pair(GraphemePair::HangulV),
            LVT | T => self.start_pair(GraphemePair::HangulT),
            ExtendedPictographic => self.start(GraphemeStep::EmojiStart),
            RegionalIndicator => {
                if self.regional_run % 2 == 0 {
                    self.start_pair(GraphemePair::RegionalPair);
                }
            }
            Other => {}
        }
    }

    fn proceed(&mut self, rune: Option<char>, class: GraphemeClass) {
        let (longest, penalties) = self.publisher.publish(rune, class);
        self.longest = longest;
        self.penalties.clear();
        self.penalties.extend_from_slice(penalties);
        if self.penalties.len() < 2 {
            self.penalties.resize(2, NULL);
        }
        // GB999
        self.penalties[1] = self.penalties[1].saturating_add(BREAK);
        self.regional_run = if class == GraphemeClass::RegionalIndicator {
            self.regional_run + 1
        } else {
            0
        };
    }

    fn longest_match(&self) -> usize {
        self.longest
    }

    fn penalties(&self) -> &[Penalty] {
        &self.penalties
    }

    fn reset(&mut self) {
        self.publisher.clear();
        self.penalties.clear();
        self.longest = 0;
        self.regional_run = 0;
    }
}
