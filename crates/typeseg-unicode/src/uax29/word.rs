//! Word boundaries
//!
//! WB4 is handled before the rules run: `Extend`, `Format` and `ZWJ` after
//! anything but a line end become [`WordClass::Absorbed`], which running
//! recognizers step over. The position in front of an absorbed rune is
//! joined.

use super::JOIN_CRLF;
use crate::emoji::EmojiTables;
use crate::tables::{setup_emoji_classes, setup_word_classes};
use crate::ucd::RangeTable;
use typeseg_core::penalty::{BANG, BREAK, JOIN, NULL};
use typeseg_core::{
    Penalty, PoolStats, Recognizer, RecognizerPool, RunePublisher, SetupError, Step, UnicodeBreaker,
};

/// Word break classes, plus the pseudo classes the breaker works with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WordClass {
    CR,
    LF,
    Newline,
    Extend,
    ZWJ,
    RegionalIndicator,
    Format,
    Katakana,
    HebrewLetter,
    ALetter,
    SingleQuote,
    DoubleQuote,
    MidNumLet,
    MidLetter,
    MidNum,
    Numeric,
    ExtendNumLet,
    WSegSpace,
    #[default]
    Other,
    Sot,
    Eot,
    /// Extend, Format or ZWJ folded into its predecessor
    Absorbed,
}

impl WordClass {
    pub fn from_ucd_name(name: &str) -> Option<Self> {
        use WordClass::*;
        Some(match name {
            "CR" => CR,
            "LF" => LF,
            "Newline" => Newline,
            "Extend" => Extend,
            "ZWJ" => ZWJ,
            "Regional_Indicator" => RegionalIndicator,
            "Format" => Format,
            "Katakana" => Katakana,
            "Hebrew_Letter" => HebrewLetter,
            "ALetter" => ALetter,
            "Single_Quote" => SingleQuote,
            "Double_Quote" => DoubleQuote,
            "MidNumLet" => MidNumLet,
            "MidLetter" => MidLetter,
            "MidNum" => MidNum,
            "Numeric" => Numeric,
            "ExtendNumLet" => ExtendNumLet,
            "WSegSpace" => WSegSpace,
            "Other" => Other,
            _ => return None,
        })
    }

    /// AHLetter
    pub fn is_letter(self) -> bool {
        matches!(self, WordClass::ALetter | WordClass::HebrewLetter)
    }

    /// MidNumLetQ
    fn is_mid_num_let_q(self) -> bool {
        matches!(self, WordClass::MidNumLet | WordClass::SingleQuote)
    }

    fn is_line_end(self) -> bool {
        matches!(self, WordClass::CR | WordClass::LF | WordClass::Newline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordPair {
    /// WB3: CR × LF
    CrLf,
    /// WB3a: (Newline | CR | LF) ÷
    LineEnd,
    /// WB3d: WSegSpace × WSegSpace
    Spaces,
    /// WB5: AHLetter × AHLetter
    LetterLetter,
    /// WB7a: Hebrew_Letter × Single_Quote
    HebrewQuote,
    /// WB8: Numeric × Numeric
    NumberNumber,
    /// WB9: AHLetter × Numeric
    LetterNumber,
    /// WB10: Numeric × AHLetter
    NumberLetter,
    /// WB13: Katakana × Katakana
    KatakanaKatakana,
    /// WB13a: (AHLetter | Numeric | Katakana | ExtendNumLet) × ExtendNumLet
    ToExtendNumLet,
    /// WB13b: ExtendNumLet × (AHLetter | Numeric | Katakana)
    FromExtendNumLet,
    /// WB15, WB16: RI × RI, started on odd runs only
    RegionalPair,
}

impl WordPair {
    fn settle(self, class: WordClass) -> Option<Penalty> {
        use WordClass::*;
        match self {
            WordPair::CrLf => (class == LF).then_some(JOIN_CRLF),
            WordPair::LineEnd => Some(BANG),
            WordPair::Spaces => (class == WSegSpace).then_some(JOIN),
            WordPair::LetterLetter | WordPair::NumberLetter => class.is_letter().then_some(JOIN),
            WordPair::HebrewQuote => (class == SingleQuote).then_some(JOIN),
            WordPair::NumberNumber | WordPair::LetterNumber => (class == Numeric).then_some(JOIN),
            WordPair::KatakanaKatakana => (class == Katakana).then_some(JOIN),
            WordPair::ToExtendNumLet => (class == ExtendNumLet).then_some(JOIN),
            WordPair::FromExtendNumLet => {
                (class.is_letter() || matches!(class, Numeric | Katakana)).then_some(JOIN)
            }
            WordPair::RegionalPair => (class == RegionalIndicator).then_some(JOIN),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordStep {
    /// Settles the position before the starting rune
    Before(Penalty),
    PairStart(WordPair),
    PairNext(WordPair),
    /// WB6, WB7: AHLetter × (MidLetter | MidNumLetQ) × AHLetter
    LetterStart,
    LetterMid,
    LetterMidNext,
    /// WB7b, WB7c: Hebrew_Letter × Double_Quote × Hebrew_Letter
    HebrewStart,
    HebrewMid,
    HebrewMidNext,
    /// WB11, WB12: Numeric × (MidNum | MidNumLetQ) × Numeric
    NumberStart,
    NumberMid,
    NumberMidNext,
}

/// Join both sides of the marked middle rune
fn join_around_mark(rec: &mut Recognizer<WordStep>) -> Option<WordStep> {
    let before_mid = rec.before_mark();
    rec.penalize(before_mid, JOIN);
    rec.accept(&[0, JOIN])
}

fn mark_middle(rec: &mut Recognizer<WordStep>, is_middle: bool, next: WordStep) -> Option<WordStep> {
    if is_middle {
        rec.set_mark();
        Some(next)
    } else {
        rec.abort()
    }
}

impl Step for WordStep {
    type Class = WordClass;

    fn step(self, rec: &mut Recognizer<Self>, _rune: Option<char>, class: WordClass) -> Option<Self> {
        match self {
            WordStep::Before(p) => rec.accept(&[0, p]),
            WordStep::PairStart(pair) => Some(WordStep::PairNext(pair)),
            WordStep::PairNext(pair) => match pair.settle(class) {
                Some(p) => rec.accept(&[0, p]),
                None => rec.abort(),
            },
            WordStep::LetterStart => Some(WordStep::LetterMid),
            WordStep::LetterMid => {
                let middle = class == WordClass::MidLetter || class.is_mid_num_let_q();
                mark_middle(rec, middle, WordStep::LetterMidNext)
            }
            WordStep::LetterMidNext if class.is_letter() => join_around_mark(rec),
            WordStep::HebrewStart => Some(WordStep::HebrewMid),
            WordStep::HebrewMid => {
                mark_middle(rec, class == WordClass::DoubleQuote, WordStep::HebrewMidNext)
            }
            WordStep::HebrewMidNext if class == WordClass::HebrewLetter => join_around_mark(rec),
            WordStep::NumberStart => Some(WordStep::NumberMid),
            WordStep::NumberMid => {
                let middle = class == WordClass::MidNum || class.is_mid_num_let_q();
                mark_middle(rec, middle, WordStep::NumberMidNext)
            }
            WordStep::NumberMidNext if class == WordClass::Numeric => join_around_mark(rec),
            WordStep::LetterMidNext | WordStep::HebrewMidNext | WordStep::NumberMidNext => rec.abort(),
        }
    }

    /// WB3d sits above WB4, so two spaces only join when adjacent
    fn transparent(self, class: WordClass) -> bool {
        class == WordClass::Absorbed && self != WordStep::PairNext(WordPair::Spaces)
    }
}

static POOL: RecognizerPool<WordStep> = RecognizerPool::new();

/// Counters of the recognizer pool shared by all word breakers
pub fn pool_stats() -> PoolStats {
    POOL.stats()
}

/// UAX #29 word boundary rule set
pub struct WordBreaker {
    classes: &'static RangeTable<WordClass>,
    emoji: &'static EmojiTables,
    publisher: RunePublisher<WordStep>,
    penalties: Vec<Penalty>,
    longest: usize,
    last: WordClass,
    raw: WordClass,
    after_zwj: bool,
    regional_run: usize,
}

impl WordBreaker {
    pub fn new() -> Result<Self, SetupError> {
        Ok(Self {
            classes: setup_word_classes()?,
            emoji: setup_emoji_classes()?,
            publisher: RunePublisher::new(&POOL),
            penalties: Vec::new(),
            longest: 0,
            last: WordClass::Sot,
            raw: WordClass::Sot,
            after_zwj: false,
            regional_run: 0,
        })
    }

    fn start(&mut self, step: WordStep) {
        self.publisher.start(WordClass::Other, 0, step);
    }

    fn start_pair(&mut self, pair: WordPair) {
        self.start(WordStep::PairStart(pair));
    }
}

impl UnicodeBreaker for WordBreaker {
    type Class = WordClass;

    fn name(&self) -> &'static str {
        "uax29-word"
    }

    fn classify(&mut self, rune: Option<char>) -> WordClass {
        let Some(c) = rune else {
            self.raw = WordClass::Eot;
            return WordClass::Eot;
        };
        self.raw = self.classes.lookup(c);
        match self.raw {
            WordClass::Extend | WordClass::Format | WordClass::ZWJ
                if !self.last.is_line_end() && self.last != WordClass::Sot =>
            {
                WordClass::Absorbed
            }
            class => class,
        }
    }

    fn start_rules(&mut self, rune: Option<char>, class: WordClass) {
        use WordClass::*;
        // WB3c
        if self.after_zwj && rune.is_some_and(|c| self.emoji.is_extended_pictographic(c)) {
            self.start(WordStep::Before(JOIN));
        }
        match class {
            Eot => self.start(WordStep::Before(BANG)),
            Absorbed => self.start(WordStep::Before(JOIN)),
            CR => {
                self.start(WordStep::Before(BANG));
                self.start_pair(WordPair::CrLf);
                self.start_pair(WordPair::LineEnd);
            }
            LF | Newline => {
                self.start(WordStep::Before(BANG));
                self.start_pair(WordPair::LineEnd);
            }
            WSegSpace => self.start_pair(WordPair::Spaces),
            ALetter | HebrewLetter => {
                self.start_pair(WordPair::LetterLetter);
                self.start_pair(WordPair::LetterNumber);
                self.start_pair(WordPair::ToExtendNumLet);
                self.start(WordStep::LetterStart);
                if class == HebrewLetter {
                    self.start_pair(WordPair::HebrewQuote);
                    self.start(WordStep::HebrewStart);
                }
            }
            Numeric => {
                self.start_pair(WordPair::NumberNumber);
                self.start_pair(WordPair::NumberLetter);
                self.start_pair(WordPair::ToExtendNumLet);
                self.start(WordStep::NumberStart);
            }
            Katakana => {
                self.start_pair(WordPair::KatakanaKatakana);
                self.start_pair(WordPair::ToExtendNumLet);
            }
            ExtendNumLet => {
                self.start_pair(WordPair::ToExtendNumLet);
                self.start_pair(WordPair::FromExtendNumLet);
            }
            RegionalIndicator => {
                if self.regional_run % 2 == 0 {
                    self.start_pair(WordPair::RegionalPair);
                }
            }
            Extend | ZWJ | Format | SingleQuote | DoubleQuote | MidNumLet | MidLetter | MidNum
            | Other | Sot => {}
        }
    }

    fn proceed(&mut self, rune: Option<char>, class: WordClass) {
        let (longest, penalties) = self.publisher.publish(rune, class);
        self.longest = longest;
        self.penalties.clear();
        self.penalties.extend_from_slice(penalties);
        if self.penalties.len() < 2 {
            self.penalties.resize(2, NULL);
        }
        // WB999
        self.penalties[1] = self.penalties[1].saturating_add(BREAK);

        if class != WordClass::Absorbed {
            self.last = class;
        }
        self.regional_run = match class {
            WordClass::RegionalIndicator => self.regional_run + 1,
            WordClass::Absorbed => self.regional_run,
            _ => 0,
        };
        self.after_zwj = self.raw == WordClass::ZWJ;
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
        self.last = WordClass::Sot;
        self.raw = WordClass::Sot;
        self.after_zwj = false;
        self.regional_run = 0;
    }
}
