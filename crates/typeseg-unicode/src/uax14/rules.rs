//! UAX #14 rule steps

use super::{
    LineClass, BANG, BREAK_CB, BREAK_SPACE, BREAK_ZW, JOIN_EARLY, JOIN_HARD, JOIN_LATE, JOIN_QUOTE,
};
use icu_properties::props::EastAsianWidth;
use icu_properties::CodePointMapData;
use typeseg_core::{Penalty, Recognizer, Step};

/// Rules that decide the position between two runes
///
/// A pair rule starts on the left rune and settles on the next one that
/// is not folded away by LB9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pair {
    /// LB4, LB5: (BK | LF | NL) !
    Mandatory,
    /// LB11: WJ ×
    WordJoiner,
    /// LB12: GL ×
    Glue,
    /// LB18: SP ÷
    Space,
    /// LB19: QU ×
    Quote,
    /// LB20: CB ÷
    Contingent,
    /// LB21: BB ×
    BreakBefore,
    /// LB21b: SY × HL
    SymbolHebrew,
    /// LB23: (AL | HL) × NU
    AlphaNumber,
    /// LB23: NU × (AL | HL)
    NumberAlpha,
    /// LB23a: PR × (ID | EB | EM)
    PrefixIdeographic,
    /// LB23a: (ID | EB | EM) × PO
    IdeographicPostfix,
    /// LB24: (PR | PO) × (AL | HL)
    AffixAlpha,
    /// LB24: (AL | HL) × (PR | PO)
    AlphaAffix,
    /// LB25: (OP | HY) × NU
    SignNumber,
    /// LB26: JL × (JL | JV | H2 | H3)
    JamoLeading,
    /// LB26: (JV | H2) × (JV | JT)
    JamoVowel,
    /// LB26: (JT | H3) × JT
    JamoTrailing,
    /// LB27: (JL | JV | JT | H2 | H3) × PO
    KoreanPostfix,
    /// LB27: PR × (JL | JV | JT | H2 | H3)
    PrefixKorean,
    /// LB28: (AL | HL) × (AL | HL)
    AlphaAlpha,
    /// LB29: IS × (AL | HL)
    InfixAlpha,
    /// LB30: (AL | HL | NU) × OP, narrow OP only
    AlphaOpen,
    /// LB30: CP × (AL | HL | NU)
    CloseAlpha,
    /// LB30a: RI × RI, started on odd runs only
    RegionalPair,
    /// LB30b: EB × EM
    BaseModifier,
}

impl Pair {
    pub fn penalty(self) -> Penalty {
        match self {
            Pair::Mandatory => BANG,
            Pair::WordJoiner | Pair::Glue => JOIN_EARLY,
            Pair::Space => BREAK_SPACE,
            Pair::Quote => JOIN_QUOTE,
            Pair::Contingent => BREAK_CB,
            _ => JOIN_LATE,
        }
    }

    /// Whether the right-hand rune completes the pair
    pub fn matches(self, rune: Option<char>, class: LineClass) -> bool {
        use LineClass::*;
        match self {
            Pair::Mandatory => true,
            Pair::WordJoiner
            | Pair::Glue
            | Pair::Space
            | Pair::Quote
            | Pair::Contingent
            | Pair::BreakBefore => class != Eot,
            Pair::SymbolHebrew => class == HL,
            Pair::AlphaNumber | Pair::SignNumber => class == NU,
            Pair::NumberAlpha | Pair::AffixAlpha | Pair::AlphaAlpha | Pair::InfixAlpha => {
                matches!(class, AL | HL)
            }
            Pair::PrefixIdeographic => matches!(class, ID | EB | EM),
            Pair::IdeographicPostfix | Pair::KoreanPostfix => class == PO,
            Pair::AlphaAffix => matches!(class, PR | PO),
            Pair::JamoLeading => matches!(class, JL | JV | H2 | H3),
            Pair::JamoVowel => matches!(class, JV | JT),
            Pair::JamoTrailing => class == JT,
            Pair::PrefixKorean => class.is_korean(),
            Pair::AlphaOpen => class == OP && rune.is_some_and(|c| !is_wide(c)),
            Pair::CloseAlpha => matches!(class, AL | HL | NU),
            Pair::RegionalPair => class == RI,
            Pair::BaseModifier => class == EM,
        }
    }
}

/// East Asian Width F, W or H, which LB30 leaves breakable
fn is_wide(c: char) -> bool {
    let width = CodePointMapData::<EastAsianWidth>::new().get(c);
    width == EastAsianWidth::Fullwidth
        || width == EastAsianWidth::Wide
        || width == EastAsianWidth::Halfwidth
}

/// Steps of the UAX #14 rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStep {
    /// Settles the position before the starting rune
    Before(Penalty),
    PairStart(Pair),
    PairNext(Pair),
    /// LB5: CR × LF, CR !
    CrStart,
    CrNext,
    /// LB8: ZW SP* ÷
    ZwStart,
    ZwSpaces,
    /// LB14: OP SP* ×
    OpenStart,
    OpenSpaces,
    /// LB15 to LB17: X SP* × `expect`
    SpacesStart,
    Spaces,
    /// LB21a: HL (HY | BA) ×
    HebrewStart,
    HebrewHyphen,
    HebrewAfterHyphen,
    /// LB25: (PR | PO) × (OP | HY)? NU
    AffixStart,
    AffixNext,
    AffixSign,
    /// LB25: NU (NU | SY | IS)* × (NU | SY | IS | CL | CP), then × (PO | PR)
    NumberStart,
    Number,
    NumberClose,
}

impl Step for LineStep {
    type Class = LineClass;

    fn step(self, rec: &mut Recognizer<Self>, rune: Option<char>, class: LineClass) -> Option<Self> {
        use LineClass::*;
        match self {
            LineStep::Before(p) => rec.accept(&[0, p]),
            LineStep::PairStart(pair) => Some(LineStep::PairNext(pair)),
            LineStep::PairNext(pair) => {
                if pair.matches(rune, class) {
                    rec.accept(&[0, pair.penalty()])
                } else {
                    rec.abort()
                }
            }
            LineStep::CrStart => Some(LineStep::CrNext),
            LineStep::CrNext if class == LF => rec.accept(&[0, JOIN_HARD]),
            LineStep::CrNext => rec.accept(&[0, BANG]),
            LineStep::ZwStart => Some(LineStep::ZwSpaces),
            LineStep::ZwSpaces => match class {
                SP => Some(LineStep::ZwSpaces),
                Eot => rec.abort(),
                _ => rec.accept(&[0, BREAK_ZW]),
            },
            LineStep::OpenStart => Some(LineStep::OpenSpaces),
            LineStep::OpenSpaces => match class {
                SP => Some(LineStep::OpenSpaces),
                Eot => rec.abort(),
                _ => rec.accept(&[0, JOIN_EARLY]),
            },
            LineStep::SpacesStart => Some(LineStep::Spaces),
            LineStep::Spaces => {
                rec.opt_spaces(class, SP, LineStep::Spaces, |rec| rec.accept(&[0, JOIN_EARLY]))
            }
            LineStep::HebrewStart => Some(LineStep::HebrewHyphen),
            LineStep::HebrewHyphen => match class {
                HY | BA => Some(LineStep::HebrewAfterHyphen),
                _ => rec.abort(),
            },
            LineStep::HebrewAfterHyphen => match class {
                Eot => rec.abort(),
                _ => rec.accept(&[0, JOIN_LATE]),
            },
            LineStep::AffixStart => Some(LineStep::AffixNext),
            LineStep::AffixNext => match class {
                NU => rec.accept(&[0, JOIN_LATE]),
                OP | HY => {
                    rec.set_mark();
                    Some(LineStep::AffixSign)
                }
                _ => rec.abort(),
            },
            LineStep::AffixSign => match class {
                NU => {
                    let before_sign = rec.before_mark();
                    rec.penalize(before_sign, JOIN_LATE);
                    rec.accept(&[0, JOIN_LATE])
                }
                _ => rec.abort(),
            },
            LineStep::NumberStart => Some(LineStep::Number),
            LineStep::Number => match class {
                NU | SY | IS => {
                    rec.penalize_before(JOIN_LATE);
                    Some(LineStep::Number)
                }
                CL | CP => {
                    rec.penalize_before(JOIN_LATE);
                    Some(LineStep::NumberClose)
                }
                PO | PR => {
                    rec.penalize_before(JOIN_LATE);
                    rec.accept(&[])
                }
                _ => rec.accept(&[]),
            },
            LineStep::NumberClose => {
                if matches!(class, PO | PR) {
                    rec.penalize_before(JOIN_LATE);
                }
                rec.accept(&[])
            }
        }
    }

    fn transparent(self, class: LineClass) -> bool {
        class == LineClass::Absorbed
    }
}
