//! Emoji properties from `emoji-data.txt`
//!
//! Unlike the break property files, one code point can carry several
//! emoji properties, so every property gets a table of its own.

use crate::ucd::{parse_property_file, RangeTable};
use typeseg_core::SetupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmojiProperty {
    Emoji,
    EmojiPresentation,
    EmojiModifier,
    EmojiModifierBase,
    EmojiComponent,
    ExtendedPictographic,
}

impl EmojiProperty {
    pub const ALL: [EmojiProperty; 6] = [
        EmojiProperty::Emoji,
        EmojiProperty::EmojiPresentation,
        EmojiProperty::EmojiModifier,
        EmojiProperty::EmojiModifierBase,
        EmojiProperty::EmojiComponent,
        EmojiProperty::ExtendedPictographic,
    ];

    /// Property for a long name as spelled in `emoji-data.txt`
    pub fn from_ucd_name(name: &str) -> Option<Self> {
        Some(match name {
            "Emoji" => EmojiProperty::Emoji,
            "Emoji_Presentation" => EmojiProperty::EmojiPresentation,
            "Emoji_Modifier" => EmojiProperty::EmojiModifier,
            "Emoji_Modifier_Base" => EmojiProperty::EmojiModifierBase,
            "Emoji_Component" => EmojiProperty::EmojiComponent,
            "Extended_Pictographic" => EmojiProperty::ExtendedPictographic,
            _ => return None,
        })
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One membership table per emoji property
#[derive(Debug, Clone)]
pub struct EmojiTables {
    tables: Vec<RangeTable<bool>>,
}

impl EmojiTables {
    pub fn parse(file: &str, text: &str) -> Result<Self, SetupError> {
        let entries = parse_property_file(file, text, EmojiProperty::from_ucd_name)?;
        let mut split: Vec<Vec<(u32, u32, bool)>> = vec![Vec::new(); EmojiProperty::ALL.len()];
        for (lo, hi, prop) in entries {
            split[prop.index()].push((lo, hi, true));
        }
        let tables = split
            .into_iter()
            .map(|ranges| RangeTable::from_ranges(file, ranges, false))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tables })
    }

    pub fn has(&self, c: char, prop: EmojiProperty) -> bool {
        self.tables[prop.index()].lookup(c)
    }

    pub fn is_extended_pictographic(&self, c: char) -> bool {
        self.has(c, EmojiProperty::ExtendedPictographic)
    }

    /// Ranges stored for `prop`
    pub fn ranges(&self, prop: EmojiProperty) -> usize {
        self.tables[prop.index()].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# emoji-data sample
0023          ; Emoji                # E0.0   [1] (#️)
1F600..1F64F  ; Emoji                # E1.0  [80]
1F600..1F64F  ; Emoji_Presentation   # E1.0  [80]
1F3FB..1F3FF  ; Emoji_Modifier       # E1.0   [5]
261D          ; Emoji_Modifier_Base  # E0.6   [1]
0023          ; Emoji_Component      # E0.0   [1]
00A9          ; Extended_Pictographic# E0.6   [1]
1F600..1F64F  ; Extended_Pictographic# E1.0  [80]
";

    #[test]
    fn test_properties_overlap_across_tables() {
        let tables = EmojiTables::parse("emoji-data.txt", SAMPLE).unwrap();
        let grin = '\u{1F600}';
        assert!(tables.has(grin, EmojiProperty::Emoji));
        assert!(tables.has(grin, EmojiProperty::EmojiPresentation));
        assert!(tables.is_extended_pictographic(grin));
        assert!(!tables.has(grin, EmojiProperty::EmojiModifier));
        assert!(tables.has('#', EmojiProperty::Emoji));
        assert!(tables.has('#', EmojiProperty::EmojiComponent));
        assert!(!tables.is_extended_pictographic('#'));
        assert!(tables.is_extended_pictographic('\u{A9}'));
        assert!(!tables.is_extended_pictographic('A'));
    }

    #[test]
    fn test_unknown_property_fails() {
        let err = EmojiTables::parse("emoji-data.txt", "0023 ; Emoji_Sparkle\n").unwrap_err();
        assert!(matches!(err, SetupError::UnknownClass { .. }));
    }
}
