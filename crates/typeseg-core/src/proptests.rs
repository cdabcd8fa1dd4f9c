use crate::penalty::{Penalty, BREAK, NULL};
use crate::pool::RecognizerPool;
use crate::publisher::RunePublisher;
use crate::recognizer::testing::{tiny_class, Tiny, TinyStep};
use crate::recognizer::Recognizer;
use crate::segmenter::{NullPenalty, Segmenter};
use crate::traits::{RuneBreaker, UnicodeBreaker};
use proptest::prelude::*;

static POOL: RecognizerPool<TinyStep> = RecognizerPool::new();

/// Letters join, stops force a break after trailing spaces, everything
/// else may break
struct TinyBreaker {
    publisher: RunePublisher<TinyStep>,
    penalties: Vec<Penalty>,
}

impl TinyBreaker {
    fn boxed() -> Box<dyn RuneBreaker> {
        Box::new(TinyBreaker {
            publisher: RunePublisher::new(&POOL),
            penalties: Vec::new(),
        })
    }
}

impl UnicodeBreaker for TinyBreaker {
    type Class = Tiny;

    fn name(&self) -> &'static str {
        "tiny"
    }

    fn classify(&mut self, rune: Option<char>) -> Tiny {
        tiny_class(rune)
    }

    fn start_rules(&mut self, _rune: Option<char>, class: Tiny) {
        match class {
            Tiny::Letter => {
                self.publisher.start(Tiny::Letter, 1, TinyStep::LetterStart);
                self.publisher.start(Tiny::Letter, 0, TinyStep::AbbrevStart);
            }
            Tiny::Stop => self.publisher.start(Tiny::Letter, 0, TinyStep::StopStart),
            _ => {}
        }
    }

    fn proceed(&mut self, rune: Option<char>, class: Tiny) {
        let (_, penalties) = self.publisher.publish(rune, class);
        self.penalties.clear();
        self.penalties.extend_from_slice(penalties);
        if self.penalties.len() < 2 {
            self.penalties.resize(2, NULL);
        }
        self.penalties[1] += BREAK;
    }

    fn longest_match(&self) -> usize {
        self.publisher.longest_active_match()
    }

    fn penalties(&self) -> &[Penalty] {
        &self.penalties
    }

    fn reset(&mut self) {
        self.publisher.clear();
        self.penalties.clear();
    }
}

fn segment_all(text: &str, null: NullPenalty) -> Vec<String> {
    let mut segmenter = Segmenter::new(vec![TinyBreaker::boxed()]);
    segmenter.set_null_penalty(null);
    segmenter.init_str(text);
    segmenter
        .map(|s| s.map(|s| s.into_string()))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
enum Op {
    Push(bool),
    Finish(usize),
    PopDone,
    Publish(char),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Push),
        (0usize..8).prop_map(Op::Finish),
        Just(Op::PopDone),
        prop::sample::select(vec!['a', '.', ' ', 'x']).prop_map(Op::Publish),
    ]
}

// Property: every publisher operation keeps done recognizers above the gap
proptest! {
    #[test]
    fn prop_publisher_partition(ops in prop::collection::vec(op(), 0..64)) {
        let mut publisher = RunePublisher::new(&POOL);
        for op in ops {
            match op {
                Op::Push(done) => {
                    let mut rec = Recognizer::new(Tiny::Letter, 1, TinyStep::LetterStart);
                    if done {
                        rec.rune_event(Some(' '), Tiny::Space);
                        rec.rune_event(Some(' '), Tiny::Space);
                    }
                    publisher.push(rec);
                }
                Op::Finish(i) => {
                    if let Some(rec) = publisher.get_mut(i) {
                        rec.rune_event(Some(' '), Tiny::Space);
                        rec.rune_event(Some(' '), Tiny::Space);
                    }
                    publisher.fix(i);
                }
                Op::PopDone => {
                    if let Some(rec) = publisher.pop_done() {
                        prop_assert!(rec.is_done());
                    }
                }
                Op::Publish(c) => {
                    publisher.publish(Some(c), tiny_class(Some(c)));
                    prop_assert!(publisher.top().is_none());
                }
            }
            prop_assert!(publisher.is_partitioned());
        }
    }
}

// Property: segmentation is a partition of the input
proptest! {
    #[test]
    fn prop_segments_partition_input(s in "[a-c. \u{0301}]{0,40}") {
        for null in [NullPenalty::AtLeast(NULL), NullPenalty::Exactly(NULL)] {
            let segments = segment_all(&s, null);
            prop_assert_eq!(segments.concat(), s.clone());
            prop_assert!(segments.iter().all(|seg| !seg.is_empty()));
        }
    }
}

// Property: re-segmenting emitted segments reproduces them
proptest! {
    #[test]
    fn prop_resegmenting_is_stable(s in "[a-c. ]{0,40}") {
        let first = segment_all(&s, NullPenalty::AtLeast(NULL));
        let second = segment_all(&first.concat(), NullPenalty::AtLeast(NULL));
        prop_assert_eq!(first, second);
    }
}

// Property: letters are never split from each other
proptest! {
    #[test]
    fn prop_joined_letters_stay_together(s in "[ab ]{0,40}") {
        for segment in segment_all(&s, NullPenalty::AtLeast(NULL)) {
            let trimmed = segment.trim_end_matches(' ');
            prop_assert!(!trimmed.contains(' '), "segment {:?} spans a space", segment);
        }
    }
}
