use super::*;
use icu_segmenter::GraphemeClusterSegmenter;
use proptest::prelude::*;
use typeseg_core::penalty::NULL;
use typeseg_core::{NullPenalty, RuneBreaker, Segmenter};

fn breaker(kind: usize) -> Box<dyn RuneBreaker> {
    match kind {
        0 => Box::new(LineBreaker::new().unwrap()),
        1 => Box::new(GraphemeBreaker::new().unwrap()),
        _ => Box::new(WordBreaker::new().unwrap()),
    }
}

fn segment(kind: usize, text: &str, null: NullPenalty) -> Vec<String> {
    let mut segmenter = Segmenter::new(vec![breaker(kind)]);
    segmenter.set_null_penalty(null);
    segmenter.init_str(text);
    segmenter.map(|s| s.unwrap().into_string()).collect()
}

/// Runes whose grapheme behavior has not changed since Unicode 14
const STABLE_RUNES: &[char] = &[
    'a', 'Z', '1', ' ', '.', '\r', '\n', '\t',
    '\u{0300}', '\u{0301}', '\u{036F}', '\u{200D}',
    '\u{1100}', '\u{1161}', '\u{11A8}', '\u{AC00}', '\u{AC01}',
    '\u{1F1E6}', '\u{1F1E9}', '\u{1F1EA}',
    '\u{1F468}', '\u{1F469}', '\u{1F600}', '\u{2764}',
];

fn stable_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(STABLE_RUNES), 1..24)
        .prop_map(|runes| runes.into_iter().collect())
}

// Property: grapheme clusters agree with ICU4X on stable runes
proptest! {
    #[test]
    fn prop_graphemes_match_icu(s in stable_text()) {
        let ours: Vec<usize> = std::iter::once(0)
            .chain(segment(1, &s, NullPenalty::default()).iter().scan(0, |end, seg| {
                *end += seg.len();
                Some(*end)
            }))
            .collect();
        let icu: Vec<usize> = GraphemeClusterSegmenter::new().segment_str(&s).collect();
        prop_assert_eq!(ours, icu, "text {:?}", s);
    }
}

// Property: every breaker partitions its input
proptest! {
    #[test]
    fn prop_segments_partition_input(s in "\\PC{0,40}", kind in 0usize..3) {
        for null in [NullPenalty::AtLeast(NULL), NullPenalty::Exactly(NULL)] {
            let segments = segment(kind, &s, null);
            prop_assert_eq!(segments.concat(), s.clone());
            prop_assert!(segments.iter().all(|seg| !seg.is_empty()));
        }
    }
}

// Property: segmenting the emitted segments again gives the same segments
proptest! {
    #[test]
    fn prop_resegmenting_is_stable(s in "\\PC{0,40}", kind in 0usize..3) {
        let first = segment(kind, &s, NullPenalty::default());
        let second = segment(kind, &first.concat(), NullPenalty::default());
        prop_assert_eq!(first, second);
    }
}

// Property: a line feed always ends its line segment
proptest! {
    #[test]
    fn prop_line_feed_forces_break(s in "[a-z \n(),.0-9\"-]{0,40}") {
        for seg in segment(0, &s, NullPenalty::default()) {
            if let Some(i) = seg.find('\n') {
                prop_assert_eq!(i, seg.len() - 1, "segment {:?}", seg);
            }
        }
    }
}

// Property: combining marks never start a grapheme cluster after a letter
proptest! {
    #[test]
    fn prop_marks_stay_with_letters(s in "[a-z][a-z\u{0300}-\u{036F}]{0,20}") {
        for seg in segment(1, &s, NullPenalty::default()) {
            let first = seg.chars().next().unwrap_or('a');
            prop_assert!(first.is_ascii_lowercase(), "cluster {:?} in {:?}", seg, s);
        }
    }
}
