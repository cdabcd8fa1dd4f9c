//! UAX #14 line breaking
//!
//! Every rule of the annex runs as a recognizer. Rules that only look at
//! a pair of runes start on the left rune and finish on the right one;
//! rules with `SP*` in the middle or with number sequences run longer.
//!
//! The annex orders its rules, earlier ones winning. Here every rule group
//! gets a penalty tier eight times stronger than the next group down, so
//! adding up everything that fired at a position gives the same answer as
//! walking the rules in order.
//!
//! | Rules          | Constant        |
//! |----------------|-----------------|
//! | LB3, LB4, LB5  | [`BANG`]        |
//! | LB5 CR×LF, LB6, LB7 | [`JOIN_HARD`] |
//! | LB8            | [`BREAK_ZW`]    |
//! | LB8a to LB17   | [`JOIN_EARLY`]  |
//! | LB18           | [`BREAK_SPACE`] |
//! | LB19           | [`JOIN_QUOTE`]  |
//! | LB20           | [`BREAK_CB`]    |
//! | LB21 to LB30b  | [`JOIN_LATE`]   |
//! | LB31           | [`BREAK_DEFAULT`] |
//!
//! Context-dependent classes are resolved in [`LineBreaker`] before any
//! rule sees them: LB1 through `General_Category` for `SA`, LB9 and LB10
//! for combining marks.

mod rules;

pub use rules::{LineStep, Pair};

use crate::tables::setup_line_break_classes;
use crate::ucd::RangeTable;
use icu_properties::props::GeneralCategory;
use icu_properties::{CodePointMapData, CodePointMapDataBorrowed};
use typeseg_core::{Penalty, PoolStats, RecognizerPool, RunePublisher, SegmentError, UnicodeBreaker};

pub const BREAK_DEFAULT: Penalty = -1;
pub const JOIN_LATE: Penalty = 8;
pub const BREAK_CB: Penalty = -64;
pub const JOIN_QUOTE: Penalty = 512;
pub const BREAK_SPACE: Penalty = -4_096;
pub const JOIN_EARLY: Penalty = 32_768;
pub const BREAK_ZW: Penalty = -262_144;
pub const JOIN_HARD: Penalty = 2_097_152;
pub const BANG: Penalty = -16_777_216;

/// Line break classes, plus the pseudo classes the breaker works with
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineClass {
    AI,
    AL,
    B2,
    BA,
    BB,
    BK,
    CB,
    CJ,
    CL,
    CM,
    CP,
    CR,
    EB,
    EM,
    EX,
    GL,
    H2,
    H3,
    HL,
    HY,
    ID,
    IN,
    IS,
    JL,
    JT,
    JV,
    LF,
    NL,
    NS,
    NU,
    OP,
    PO,
    PR,
    QU,
    RI,
    SA,
    SG,
    SP,
    SY,
    WJ,
    #[default]
    XX,
    ZW,
    ZWJ,
    /// Start of text, never produced by a rune
    Sot,
    /// End of text
    Eot,
    /// A mark folded into its base by LB9
    Absorbed,
}

impl LineClass {
    /// Class for a short property value name as spelled in `LineBreak.txt`
    pub fn from_ucd_name(name: &str) -> Option<Self> {
        use LineClass::*;
        Some(match name {
            "AI" => AI,
            "AL" => AL,
            "B2" => B2,
            "BA" => BA,
            "BB" => BB,
            "BK" => BK,
            "CB" => CB,
            "CJ" => CJ,
            "CL" => CL,
            "CM" => CM,
            "CP" => CP,
            "CR" => CR,
            "EB" => EB,
            "EM" => EM,
            "EX" => EX,
            "GL" => GL,
            "H2" => H2,
            "H3" => H3,
            "HL" => HL,
            "HY" => HY,
            "ID" => ID,
            "IN" => IN,
            "IS" => IS,
            "JL" => JL,
            "JT" => JT,
            "JV" => JV,
            "LF" => LF,
            "NL" => NL,
            "NS" => NS,
            "NU" => NU,
            "OP" => OP,
            "PO" => PO,
            "PR" => PR,
            "QU" => QU,
            "RI" => RI,
            "SA" => SA,
            "SG" => SG,
            "SP" => SP,
            "SY" => SY,
            "WJ" => WJ,
            "XX" => XX,
            "ZW" => ZW,
            "ZWJ" => ZWJ,
            _ => return None,
        })
    }

    pub fn is_korean(self) -> bool {
        matches!(self, LineClass::JL | LineClass::JV | LineClass::JT | LineClass::H2 | LineClass::H3)
    }

    /// Whether a following CM or ZWJ folds into this class (LB9)
    /// Sot, Eot and Absorbed never come from the class table
    pub fn is_pseudo(self) -> bool {
        matches!(self, LineClass::Sot | LineClass::Eot | LineClass::Absorbed)
    }

    fn takes_marks(self) -> bool {
        !matches!(
            self,
            LineClass::Sot
                | LineClass::Eot
                | LineClass::BK
                | LineClass::CR
                | LineClass::LF
                | LineClass::NL
                | LineClass::SP
                | LineClass::ZW
        )
    }
}

/// LB15 to LB17: `X SP* × Y`, as `(X, Y)`
const SPACES_THEN: [(LineClass, LineClass); 4] = [
    (LineClass::QU, LineClass::OP),
    (LineClass::CL, LineClass::NS),
    (LineClass::CP, LineClass::NS),
    (LineClass::B2, LineClass::B2),
];

/// Reject `X SP* × Y` rules that could never fire
///
/// The spaces step swallows `SP`, and pseudo classes are never delivered
/// as the rune after the spaces.
fn check_spaces_rules(rules: &[(LineClass, LineClass)]) -> typeseg_core::Result<()> {
    for &(left, right) in rules {
        if left == LineClass::SP || right == LineClass::SP || left.is_pseudo() || right.is_pseudo() {
            return Err(SegmentError::InvalidRule(format!(
                "{left:?} SP* × {right:?} can never match"
            )));
        }
    }
    Ok(())
}

static POOL: RecognizerPool<LineStep> = RecognizerPool::new();

/// Counters of the recognizer pool shared by all line breakers
pub fn pool_stats() -> PoolStats {
    POOL.stats()
}

/// UAX #14 rule set
pub struct LineBreaker {
    classes: &'static RangeTable<LineClass>,
    general_category: CodePointMapDataBorrowed<'static, GeneralCategory>,
    publisher: RunePublisher<LineStep>,
    penalties: Vec<Penalty>,
    longest: usize,
    /// Resolved class of the previous rune, skipping absorbed marks
    last: LineClass,
    /// Table class of the current rune
    raw: LineClass,
    after_zwj: bool,
    regional_run: usize,
}

impl LineBreaker {
    pub fn new() -> typeseg_core::Result<Self> {
        check_spaces_rules(&SPACES_THEN)?;
        Ok(Self {
            classes: setup_line_break_classes()?,
            general_category: CodePointMapData::<GeneralCategory>::new(),
            publisher: RunePublisher::new(&POOL),
            penalties: Vec::new(),
            longest: 0,
            last: LineClass::Sot,
            raw: LineClass::Sot,
            after_zwj: false,
            regional_run: 0,
        })
    }

    /// LB1
    fn resolve(&self, c: char, class: LineClass) -> LineClass {
        match class {
            LineClass::AI | LineClass::SG | LineClass::XX => LineClass::AL,
            LineClass::SA => {
                let gc = self.general_category.get(c);
                if gc == GeneralCategory::NonspacingMark || gc == GeneralCategory::SpacingMark {
                    LineClass::CM
                } else {
                    LineClass::AL
                }
            }
            LineClass::CJ => LineClass::NS,
            other => other,
        }
    }

    fn start(&mut self, step: LineStep) {
        self.publisher.start(LineClass::XX, 0, step);
    }

    fn start_pair(&mut self, pair: Pair) {
        self.start(LineStep::PairStart(pair));
    }

    /// LB15 to LB17 rules whose left side is `class`
    fn start_spaces_rules(&mut self, class: LineClass) {
        for &(left, right) in &SPACES_THEN {
            if left == class {
                self.publisher.start(right, 0, LineStep::SpacesStart);
            }
        }
    }

    fn number_running(&self) -> bool {
        self.publisher
            .any_active(|r| matches!(r.next_step(), Some(LineStep::Number)))
    }
}

impl UnicodeBreaker for LineBreaker {
    type Class = LineClass;

    fn name(&self) -> &'static str {
        "uax14"
    }

    fn classify(&mut self, rune: Option<char>) -> LineClass {
        let Some(c) = rune else {
            self.raw = LineClass::Eot;
            return LineClass::Eot;
        };
        self.raw = self.classes.lookup(c);
        match self.resolve(c, self.raw) {
            // LB9, LB10
            LineClass::CM | LineClass::ZWJ if self.last.takes_marks() => LineClass::Absorbed,
            LineClass::CM | LineClass::ZWJ => LineClass::AL,
            class => class,
        }
    }

    fn start_rules(&mut self, _rune: Option<char>, class: LineClass) {
        use LineClass::*;
        let before = self.last;
        if self.after_zwj && class != Eot {
            self.start(LineStep::Before(JOIN_EARLY)); // LB8a
        }
        self.start_spaces_rules(class);
        match class {
            Eot => self.start(LineStep::Before(BANG)), // LB3
            Absorbed => self.start(LineStep::Before(JOIN_EARLY)),
            BK | LF | NL => {
                self.start(LineStep::Before(JOIN_HARD));
                self.start_pair(Pair::Mandatory);
            }
            CR => {
                self.start(LineStep::Before(JOIN_HARD));
                self.start(LineStep::CrStart);
            }
            SP => {
                self.start(LineStep::Before(JOIN_HARD));
                self.start_pair(Pair::Space);
            }
            ZW => {
                self.start(LineStep::Before(JOIN_HARD));
                self.start(LineStep::ZwStart);
            }
            WJ => {
                self.start(LineStep::Before(JOIN_EARLY));
                self.start_pair(Pair::WordJoiner);
            }
            GL => {
                if !matches!(before, SP | BA | HY) {
                    self.start(LineStep::Before(JOIN_EARLY)); // LB12a
                }
                self.start_pair(Pair::Glue);
            }
            CL => self.start(LineStep::Before(JOIN_EARLY)),
            CP => {
                self.start(LineStep::Before(JOIN_EARLY));
                self.start_pair(Pair::CloseAlpha);
            }
            EX => self.start(LineStep::Before(JOIN_EARLY)),
            IS => {
                self.start(LineStep::Before(JOIN_EARLY));
                self.start_pair(Pair::InfixAlpha);
            }
            SY => {
                self.start(LineStep::Before(JOIN_EARLY));
                self.start_pair(Pair::SymbolHebrew);
            }
            OP => {
                self.start(LineStep::OpenStart);
                self.start_pair(Pair::SignNumber);
            }
            QU => {
                self.start(LineStep::Before(JOIN_QUOTE));
                self.start_pair(Pair::Quote);
            }
            CB => {
                self.start(LineStep::Before(BREAK_CB));
                self.start_pair(Pair::Contingent);
            }
            BA | NS | IN => self.start(LineStep::Before(JOIN_LATE)),
            HY => {
                self.start(LineStep::Before(JOIN_LATE));
                self.start_pair(Pair::SignNumber);
            }
            BB => self.start_pair(Pair::BreakBefore),
            AL | HL => {
                self.start_pair(Pair::AlphaNumber);
                self.start_pair(Pair::AlphaAffix);
                self.start_pair(Pair::AlphaAlpha);
                self.start_pair(Pair::AlphaOpen);
                if class == HL {
                    self.start(LineStep::HebrewStart);
                }
            }
            NU => {
                self.start_pair(Pair::NumberAlpha);
                self.start_pair(Pair::AlphaOpen);
                if !self.number_running() {
                    self.start(LineStep::NumberStart);
                }
            }
            PR => {
                self.start_pair(Pair::PrefixIdeographic);
                self.start_pair(Pair::AffixAlpha);
                self.start_pair(Pair::PrefixKorean);
                self.start(LineStep::AffixStart);
            }
            PO => {
                self.start_pair(Pair::AffixAlpha);
                self.start(LineStep::AffixStart);
            }
            ID | EM => self.start_pair(Pair::IdeographicPostfix),
            EB => {
                self.start_pair(Pair::IdeographicPostfix);
                self.start_pair(Pair::BaseModifier);
            }
            JL => {
                self.start_pair(Pair::JamoLeading);
                self.start_pair(Pair::KoreanPostfix);
            }
            JV | H2 => {
                self.start_pair(Pair::JamoVowel);
                self.start_pair(Pair::KoreanPostfix);
            }
            JT | H3 => {
                self.start_pair(Pair::JamoTrailing);
                self.start_pair(Pair::KoreanPostfix);
            }
            RI => {
                if self.regional_run % 2 == 0 {
                    self.start_pair(Pair::RegionalPair);
                }
            }
            // resolved away by classify
            AI | CJ | CM | SA | SG | XX | ZWJ | Sot => {}
            // LB17 only
            B2 => {}
        }
    }

    fn proceed(&mut self, rune: Option<char>, class: LineClass) {
        let (longest, penalties) = self.publisher.publish(rune, class);
        self.longest = longest;
        self.penalties.clear();
        self.penalties.extend_from_slice(penalties);
        if self.penalties.len() < 2 {
            self.penalties.resize(2, 0);
        }
        // LB31
        self.penalties[1] = self.penalties[1].saturating_add(BREAK_DEFAULT);

        if class != LineClass::Absorbed {
            self.last = class;
        }
        self.regional_run = match class {
            LineClass::RI => self.regional_run + 1,
            LineClass::Absorbed => self.regional_run,
            _ => 0,
        };
        self.after_zwj = self.raw == LineClass::ZWJ;
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
        self.last = LineClass::Sot;
        self.raw = LineClass::Sot;
        self.after_zwj = false;
        self.regional_run = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeseg_core::RuneBreaker;

    fn breaker() -> LineBreaker {
        LineBreaker::new().unwrap()
    }

    /// Penalty settled at each position after a rune, in text order
    fn positions(text: &str) -> Vec<Penalty> {
        let mut b = breaker();
        let mut totals: Vec<Penalty> = Vec::new();
        for rune in text.chars().map(Some).chain([None]) {
            if rune.is_some() {
                totals.push(0);
            }
            // end of text has no position of its own
            let shift = usize::from(rune.is_none());
            let (_, p) = b.feed(rune);
            for (i, v) in p.iter().enumerate().skip(shift) {
                let slot = (totals.len() + shift).checked_sub(i + 1);
                if let Some(total) = slot.and_then(|k| totals.get_mut(k)) {
                    *total += v;
                }
            }
        }
        totals
    }

    #[test]
    fn test_spaces_rules_are_checked() {
        assert!(check_spaces_rules(&SPACES_THEN).is_ok());
        for bad in [
            [(LineClass::QU, LineClass::SP)],
            [(LineClass::SP, LineClass::OP)],
            [(LineClass::CL, LineClass::Absorbed)],
            [(LineClass::Sot, LineClass::NS)],
        ] {
            let err = check_spaces_rules(&bad).unwrap_err();
            assert!(matches!(err, SegmentError::InvalidRule(_)), "{bad:?}");
        }
        let err = check_spaces_rules(&[(LineClass::B2, LineClass::SP)]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid rule: B2 SP* × SP can never match");
    }

    #[test]
    fn test_spaces_then_rules_join() {
        // LB16 and LB17, with the spaces kept
        let p = positions(") \u{3005}");
        assert!(p[1] > 0, "{p:?}");
        let p = positions("\u{2014}  \u{2014}");
        assert!(p[2] > 0, "{p:?}");
    }

    #[test]
    fn test_classify_resolves_lb1() {
        let mut b = breaker();
        assert_eq!(b.classify(Some('\u{FFFF}')), LineClass::AL); // XX
        assert_eq!(b.classify(Some('\u{3041}')), LineClass::NS); // CJ
        assert_eq!(b.classify(Some('\u{0E01}')), LineClass::AL); // Thai letter, SA
        assert_eq!(b.classify(None), LineClass::Eot);
    }

    #[test]
    fn test_marks_fold_into_base() {
        let mut b = breaker();
        let class = b.classify(Some('a'));
        b.start_rules(Some('a'), class);
        b.proceed(Some('a'), class);
        assert_eq!(b.classify(Some('\u{0301}')), LineClass::Absorbed);

        // at start of text a mark stands alone as AL
        let mut b = breaker();
        assert_eq!(b.classify(Some('\u{0301}')), LineClass::AL);
    }

    #[test]
    fn test_space_then_letter_breaks() {
        let p = positions("ab cd");
        assert!(p[0] > 0, "a|b {p:?}");
        assert!(p[1] > 0, "b|SP {p:?}");
        assert!(p[2] < 0, "SP|c {p:?}");
        assert!(p[4] <= BANG, "eot {p:?}");
    }

    #[test]
    fn test_mandatory_break_after_newline() {
        let p = positions("a\nb");
        assert!(p[0] > 0);
        assert!(p[1] <= BANG / 2);
    }

    #[test]
    fn test_cr_lf_is_joined() {
        let p = positions("\r\n");
        assert!(p[0] >= JOIN_HARD, "{p:?}");
        assert!(p[1] <= BANG / 2, "{p:?}");
    }

    #[test]
    fn test_zero_width_space_breaks_after_spaces() {
        let p = positions("a\u{200B}  b");
        assert!(p[0] > 0, "× ZW");
        assert!(p[1] > 0, "ZW × SP");
        assert!(p[2] > 0, "SP × SP");
        assert!(p[3] < 0, "ZW SP* ÷");
    }

    #[test]
    fn test_quote_spaces_open() {
        // QU SP* × OP
        let p = positions("\" (x");
        assert!(p[1] > 0, "{p:?}");
        // without the quote the space allows a break
        let p = positions("a (x");
        assert!(p[1] < 0, "{p:?}");
    }

    #[test]
    fn test_numbers_hold_together() {
        let p = positions("$(12.50)%");
        for (i, v) in p.iter().enumerate().take(p.len() - 1) {
            assert!(*v > 0, "break inside number at {i}: {p:?}");
        }
    }

    #[test]
    fn test_regional_indicators_pair_up() {
        let flags = "\u{1F1E6}\u{1F1E8}\u{1F1E6}\u{1F1E8}\u{1F1E6}";
        let p = positions(flags);
        assert!(p[0] > 0);
        assert!(p[1] < 0);
        assert!(p[2] > 0);
        assert!(p[3] < 0);
    }

    #[test]
    fn test_reset_clears_context() {
        let mut b = breaker();
        for c in "12".chars() {
            b.feed(Some(c));
        }
        assert!(b.longest_match() > 0);
        UnicodeBreaker::reset(&mut b);
        assert_eq!(b.longest_match(), 0);
        assert_eq!(b.classify(Some('\u{0301}')), LineClass::AL);
    }
}
