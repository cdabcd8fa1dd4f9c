//! The segmenter: runes in, segments out
//!
//! The segmenter pulls runes from a [`RuneReader`], pushes each one onto
//! the front of a queue of atoms, and lets every breaker settle penalties
//! on the atoms it has seen. A segment is cut at the oldest atom whose
//! penalty counts as a break, but only once no running rule can still
//! reach that atom:
//!
//! ```text
//!  front (newest)                          back (oldest)
//!  | 0 | 1 | ... | j | ... | len-1 |
//!                  ^ oldest break, distance = len - j
//!  emit when distance + longest_active_match < len
//! ```
//!
//! Which penalties count as "no break here" is set with
//! [`Segmenter::set_null_penalty`].

use crate::error::{Result, SegmentError};
use crate::penalty::{Penalty, PenaltyAggregator, NULL};
use crate::reader::{RuneReader, StrReader};
use crate::traits::RuneBreaker;
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io;

/// Default upper bound for a single segment, in bytes
pub const MAX_SEGMENT_LEN: usize = 64 * 1024;

/// Which aggregated penalties mean "no break here"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPenalty {
    /// Only this exact value is null; every other position is a segment
    /// boundary and its penalty is passed downstream
    Exactly(Penalty),
    /// Values at or above the threshold are null; only break
    /// opportunities become segment boundaries
    AtLeast(Penalty),
}

impl NullPenalty {
    pub fn is_null(self, p: Penalty) -> bool {
        match self {
            NullPenalty::Exactly(n) => p == n,
            NullPenalty::AtLeast(n) => p >= n,
        }
    }
}

impl Default for NullPenalty {
    fn default() -> Self {
        NullPenalty::AtLeast(NULL)
    }
}

/// Segmenter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterOptions {
    pub null_penalty: NullPenalty,
    /// How penalties from different breakers combine at one position
    pub aggregator: PenaltyAggregator,
    /// Bytes a pending segment may grow to before segmentation fails
    ///
    /// Exceeding it ends segmentation: the pending atoms and the rest of
    /// the input are dropped, so the segments emitted before the error no
    /// longer cover the whole input.
    pub max_segment_len: usize,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            null_penalty: NullPenalty::default(),
            aggregator: PenaltyAggregator::default(),
            max_segment_len: MAX_SEGMENT_LEN,
        }
    }
}

/// One emitted segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    text: String,
    offset: usize,
    penalty: Penalty,
    penalties: Vec<Penalty>,
}

impl Segment {
    /// Encoded bytes of the segment's runes, in text order
    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    /// Byte offset of the segment within the whole input
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Aggregated penalty at the end of the segment
    pub fn penalty(&self) -> Penalty {
        self.penalty
    }

    /// Share of the penalty contributed by each breaker, in registration order
    pub fn penalties(&self) -> &[Penalty] {
        &self.penalties
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[derive(Debug)]
struct Atom {
    /// `None` is the end-of-text sentinel
    rune: Option<char>,
    byte_len: usize,
    penalty: Penalty,
    slots: Vec<Penalty>,
}

/// Atoms not yet emitted, newest at the front
#[derive(Debug)]
struct AtomQueue {
    atoms: VecDeque<Atom>,
    /// Atoms from the back up to and including the oldest break
    distance: Option<usize>,
    null: NullPenalty,
    aggregator: PenaltyAggregator,
    bytes: usize,
    spare: Vec<Vec<Penalty>>,
}

impl AtomQueue {
    fn new(null: NullPenalty, aggregator: PenaltyAggregator) -> Self {
        Self {
            atoms: VecDeque::new(),
            distance: None,
            null,
            aggregator,
            bytes: 0,
            spare: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.atoms.len()
    }

    fn clear(&mut self) {
        while let Some(atom) = self.atoms.pop_back() {
            self.spare.push(atom.slots);
        }
        self.distance = None;
        self.bytes = 0;
    }

    fn push_front(&mut self, rune: Option<char>, byte_len: usize, breakers: usize) {
        let mut slots = self.spare.pop().unwrap_or_default();
        slots.clear();
        slots.resize(breakers, NULL);
        self.atoms.push_front(Atom {
            rune,
            byte_len,
            penalty: NULL,
            slots,
        });
        self.bytes += byte_len;
    }

    fn is_break(&self, atom: &Atom) -> bool {
        atom.rune.is_some() && !self.null.is_null(atom.penalty)
    }

    /// Fold one breaker's penalties into the queue
    ///
    /// Index `i` is the atom `i` places behind the newest one.
    fn insert_penalties(&mut self, slot: usize, penalties: &[Penalty]) {
        let len = self.atoms.len();
        for (i, &p) in penalties.iter().enumerate().take(len) {
            if p == NULL {
                continue;
            }
            let aggregator = self.aggregator;
            let atom = &mut self.atoms[i];
            atom.penalty = aggregator.combine(atom.penalty, p);
            if let Some(s) = atom.slots.get_mut(slot) {
                *s = aggregator.combine(*s, p);
            }
            let d = len - i;
            let is_break = self.is_break(&self.atoms[i]);
            match self.distance {
                Some(cur) if is_break && d < cur => self.distance = Some(d),
                None if is_break => self.distance = Some(d),
                Some(cur) if !is_break && d == cur => self.distance = self.oldest_break_before(i),
                _ => {}
            }
        }
    }

    /// Oldest break among the atoms newer than index `i`
    fn oldest_break_before(&self, i: usize) -> Option<usize> {
        let len = self.atoms.len();
        (0..i)
            .rev()
            .find(|&k| self.is_break(&self.atoms[k]))
            .map(|k| len - k)
    }

    fn rescan(&mut self) {
        self.distance = self.oldest_break_before(self.atoms.len());
    }

    /// Take `count` atoms off the back
    fn pop_back(&mut self, count: usize) -> (String, Penalty, Vec<Penalty>) {
        let mut text = String::new();
        let mut penalty = NULL;
        let mut slots = Vec::new();
        for _ in 0..count {
            let Some(atom) = self.atoms.pop_back() else {
                break;
            };
            self.bytes -= atom.byte_len;
            if let Some(c) = atom.rune {
                text.push(c);
                penalty = atom.penalty;
                self.spare.push(std::mem::replace(&mut slots, atom.slots));
            } else {
                self.spare.push(atom.slots);
            }
        }
        self.rescan();
        (text, penalty, slots)
    }

    fn dump(&self) -> String {
        let mut out = String::new();
        for atom in self.atoms.iter().rev() {
            let _ = match atom.rune {
                Some(c) => write!(out, "[{:?} {}]", c, atom.penalty),
                None => write!(out, "[eot {}]", atom.penalty),
            };
        }
        out
    }
}

/// Drives breakers over a rune source and cuts segments
///
/// ```ignore
/// let mut segmenter = Segmenter::new(vec![Box::new(GraphemeBreaker::new()?)]);
/// segmenter.init_str("Hello");
/// while let Some(segment) = segmenter.next_segment()? {
///     println!("{:?} {}", segment.text(), segment.penalty());
/// }
/// ```
pub struct Segmenter<'r> {
    breakers: Vec<Box<dyn RuneBreaker>>,
    reader: Option<Box<dyn RuneReader + 'r>>,
    queue: AtomQueue,
    longest_active_match: usize,
    at_eof: bool,
    pending_error: Option<io::Error>,
    offset: usize,
    max_segment_len: usize,
    current: Option<Segment>,
    last_error: Option<SegmentError>,
}

impl<'r> Segmenter<'r> {
    /// Create a segmenter over the given breakers, visited in this order
    pub fn new(breakers: Vec<Box<dyn RuneBreaker>>) -> Self {
        Self::with_options(breakers, SegmenterOptions::default())
    }

    pub fn with_options(breakers: Vec<Box<dyn RuneBreaker>>, options: SegmenterOptions) -> Self {
        log::debug!(
            "New segmenter with breakers [{}]",
            breakers.iter().map(|b| b.name()).collect::<Vec<_>>().join(", ")
        );
        Self {
            breakers,
            reader: None,
            queue: AtomQueue::new(options.null_penalty, options.aggregator),
            longest_active_match: 0,
            at_eof: false,
            pending_error: None,
            offset: 0,
            max_segment_len: options.max_segment_len,
            current: None,
            last_error: None,
        }
    }

    /// Attach an input, resetting all state
    pub fn init(&mut self, reader: impl RuneReader + 'r) {
        for breaker in &mut self.breakers {
            breaker.reset();
        }
        self.queue.clear();
        self.reader = Some(Box::new(reader));
        self.longest_active_match = 0;
        self.at_eof = false;
        self.pending_error = None;
        self.offset = 0;
        self.current = None;
        self.last_error = None;
        log::debug!("Segmenter initialized");
    }

    /// Attach a string as input
    pub fn init_str(&mut self, text: &'r str) {
        self.init(StrReader::new(text));
    }

    /// Set which penalties mean "no break here"
    pub fn set_null_penalty(&mut self, null: NullPenalty) {
        self.queue.null = null;
        self.queue.rescan();
    }

    pub fn null_penalty(&self) -> NullPenalty {
        self.queue.null
    }

    /// Set how penalties from different breakers combine; takes effect
    /// for runes read from now on
    pub fn set_aggregator(&mut self, aggregator: PenaltyAggregator) {
        self.queue.aggregator = aggregator;
    }

    pub fn aggregator(&self) -> PenaltyAggregator {
        self.queue.aggregator
    }

    /// Produce the next segment
    ///
    /// Returns `Ok(None)` at end of input. If the rune source fails, the
    /// atoms read so far come back as a final segment first, the error on
    /// the following call, and `Ok(None)` after that.
    ///
    /// A run without a break opportunity longer than
    /// [`SegmenterOptions::max_segment_len`] fails with
    /// [`SegmentError::SegmentTooLong`]. That run and everything after it
    /// are discarded and later calls return `Ok(None)` until the next
    /// [`Segmenter::init`].
    pub fn next_segment(&mut self) -> Result<Option<Segment>> {
        if self.reader.is_none() {
            return Err(SegmentError::NotInitialized);
        }
        loop {
            if let Some(d) = self.queue.distance {
                if d + self.longest_active_match < self.queue.len() {
                    return Ok(Some(self.emit(d)));
                }
            }
            if self.at_eof {
                let rest = self.queue.len();
                let segment = self.emit(rest);
                if !segment.text.is_empty() {
                    return Ok(Some(segment));
                }
                return match self.pending_error.take() {
                    Some(e) => Err(SegmentError::Input(e)),
                    None => Ok(None),
                };
            }
            if self.queue.bytes > self.max_segment_len {
                let limit = self.max_segment_len;
                log::debug!("Pending segment exceeds {} bytes, stopping", limit);
                self.stop();
                return Err(SegmentError::SegmentTooLong { limit });
            }
            if let Err(e) = self.read_one() {
                log::debug!("Rune source failed after {} bytes: {}", self.offset, e);
                self.at_eof = true;
                self.pending_error = Some(e);
            }
        }
    }

    /// Advance to the next segment, keeping it for [`Segmenter::bytes`],
    /// [`Segmenter::text`] and [`Segmenter::penalty`]
    ///
    /// Returns false at end of input or on error; see [`Segmenter::err`].
    pub fn scan(&mut self) -> bool {
        match self.next_segment() {
            Ok(Some(segment)) => {
                self.current = Some(segment);
                true
            }
            Ok(None) => {
                self.current = None;
                false
            }
            Err(e) => {
                self.current = None;
                self.last_error = Some(e);
                false
            }
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.current.as_ref().map_or(&[], |s| s.bytes())
    }

    pub fn text(&self) -> &str {
        self.current.as_ref().map_or("", |s| s.text())
    }

    pub fn penalty(&self) -> Penalty {
        self.current.as_ref().map_or(NULL, |s| s.penalty())
    }

    /// The error that ended the last [`Segmenter::scan`], if any
    pub fn err(&self) -> Option<&SegmentError> {
        self.last_error.as_ref()
    }

    fn read_one(&mut self) -> io::Result<()> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(());
        };
        let rune = match reader.read_rune()? {
            Some((c, len)) => {
                self.queue.push_front(Some(c), len, self.breakers.len());
                Some(c)
            }
            None => {
                self.queue.push_front(None, 0, self.breakers.len());
                self.at_eof = true;
                None
            }
        };
        let mut longest = 0;
        for (slot, breaker) in self.breakers.iter_mut().enumerate() {
            let (reach, penalties) = breaker.feed(rune);
            longest = longest.max(reach);
            self.queue.insert_penalties(slot, penalties);
        }
        self.longest_active_match = longest;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "Q: {} distance={:?} longest={}",
                self.queue.dump(),
                self.queue.distance,
                longest
            );
        }
        Ok(())
    }

    fn emit(&mut self, count: usize) -> Segment {
        let (text, penalty, penalties) = self.queue.pop_back(count);
        let segment = Segment {
            offset: self.offset,
            text,
            penalty,
            penalties,
        };
        self.offset += segment.byte_len();
        log::trace!(
            "Segment {:?} at {} penalty {}",
            segment.text,
            segment.offset,
            segment.penalty
        );
        segment
    }

    fn stop(&mut self) {
        self.queue.clear();
        for breaker in &mut self.breakers {
            breaker.reset();
        }
        self.at_eof = true;
    }
}

impl Iterator for Segmenter<'_> {
    type Item = Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_segment().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::penalty::{BANG, BREAK, JOIN};

    /// Breaks after spaces, forces a break after '!', and joins "ab"
    struct SpaceBreaker {
        penalties: Vec<Penalty>,
        last: Option<char>,
    }

    impl SpaceBreaker {
        fn boxed() -> Box<dyn RuneBreaker> {
            Box::new(SpaceBreaker {
                penalties: Vec::new(),
                last: None,
            })
        }
    }

    impl crate::traits::UnicodeBreaker for SpaceBreaker {
        type Class = Option<char>;

        fn name(&self) -> &'static str {
            "space"
        }

        fn classify(&mut self, rune: Option<char>) -> Option<char> {
            rune
        }

        fn start_rules(&mut self, _rune: Option<char>, _class: Option<char>) {}

        fn proceed(&mut self, rune: Option<char>, _class: Option<char>) {
            self.penalties.clear();
            match (self.last, rune) {
                (Some(' '), _) => self.penalties.extend([NULL, BREAK]),
                (Some('!'), _) | (Some(_), None) => self.penalties.extend([NULL, BANG]),
                (Some('a'), Some('b')) => self.penalties.extend([NULL, JOIN]),
                _ => {}
            }
            self.last = rune;
        }

        fn longest_match(&self) -> usize {
            0
        }

        fn penalties(&self) -> &[Penalty] {
            &self.penalties
        }

        fn reset(&mut self) {
            self.penalties.clear();
            self.last = None;
        }
    }

    fn texts(segmenter: &mut Segmenter<'_>) -> Vec<(String, Penalty)> {
        let mut out = Vec::new();
        while let Some(s) = segmenter.next_segment().unwrap() {
            out.push((s.text().to_string(), s.penalty()));
        }
        out
    }

    #[test]
    fn test_not_initialized() {
        let mut segmenter = Segmenter::new(vec![SpaceBreaker::boxed()]);
        assert!(matches!(
            segmenter.next_segment(),
            Err(SegmentError::NotInitialized)
        ));
        // no state was touched; attaching input afterwards works normally
        segmenter.init_str("a b");
        assert_eq!(texts(&mut segmenter).len(), 2);
    }

    #[test]
    fn test_breaks_after_spaces() {
        let mut segmenter = Segmenter::new(vec![SpaceBreaker::boxed()]);
        segmenter.init_str("to be!");
        assert_eq!(
            texts(&mut segmenter),
            vec![
                ("to ".to_string(), BREAK),
                ("be!".to_string(), BANG),
            ]
        );
    }

    #[test]
    fn test_aggregator_combines_breakers() {
        let run = |aggregator: PenaltyAggregator| {
            let options = SegmenterOptions {
                aggregator,
                ..Default::default()
            };
            let breakers = vec![SpaceBreaker::boxed(), SpaceBreaker::boxed()];
            let mut segmenter = Segmenter::with_options(breakers, options);
            segmenter.init_str("to be!");
            texts(&mut segmenter)
        };
        assert_eq!(
            run(PenaltyAggregator::Add),
            vec![
                ("to ".to_string(), 2 * BREAK),
                ("be!".to_string(), 2 * BANG),
            ]
        );
        assert_eq!(
            run(PenaltyAggregator::Max),
            vec![("to ".to_string(), BREAK), ("be!".to_string(), BANG)]
        );
    }

    #[test]
    fn test_exact_null_exports_every_penalty() {
        let mut segmenter = Segmenter::new(vec![SpaceBreaker::boxed()]);
        segmenter.set_null_penalty(NullPenalty::Exactly(NULL));
        segmenter.init_str("abc");
        assert_eq!(
            texts(&mut segmenter),
            vec![("a".to_string(), JOIN), ("bc".to_string(), BANG)]
        );
    }

    #[test]
    fn test_empty_input() {
        let mut segmenter = Segmenter::new(vec![SpaceBreaker::boxed()]);
        segmenter.init_str("");
        assert_eq!(segmenter.next_segment().unwrap(), None);
        assert_eq!(segmenter.next_segment().unwrap(), None);
    }

    #[test]
    fn test_no_breakers_yields_whole_input() {
        let mut segmenter = Segmenter::new(Vec::new());
        segmenter.init_str("one two");
        assert_eq!(texts(&mut segmenter), vec![("one two".to_string(), NULL)]);
    }

    #[test]
    fn test_offsets_and_breaker_shares() {
        let mut segmenter = Segmenter::new(vec![SpaceBreaker::boxed(), SpaceBreaker::boxed()]);
        segmenter.init_str("x yz");
        let segments: Vec<Segment> = segmenter.by_ref().collect::<Result<_>>().unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].offset(), 0);
        assert_eq!(segments[1].offset(), 2);
        assert_eq!(segments[0].penalty(), 2 * BREAK);
        assert_eq!(segments[0].penalties(), &[BREAK, BREAK]);
        assert_eq!(segments[1].penalties(), &[BANG, BANG]);
    }

    #[test]
    fn test_input_error_after_data() {
        let mut segmenter = Segmenter::new(vec![SpaceBreaker::boxed()]);
        segmenter.init(crate::reader::Utf8Reader::new(&b"ok go\xFF"[..]));
        assert_eq!(segmenter.next_segment().unwrap().map(Segment::into_string), Some("ok ".into()));
        assert_eq!(segmenter.next_segment().unwrap().map(Segment::into_string), Some("go".into()));
        let err = segmenter.next_segment().unwrap_err();
        assert!(err.is_input());
        assert_eq!(segmenter.next_segment().unwrap(), None);
    }

    #[test]
    fn test_segment_too_long() {
        let options = SegmenterOptions {
            max_segment_len: 4,
            ..SegmenterOptions::default()
        };
        let mut segmenter = Segmenter::with_options(vec![SpaceBreaker::boxed()], options);
        segmenter.init_str("abcdefgh ij");
        assert!(matches!(
            segmenter.next_segment(),
            Err(SegmentError::SegmentTooLong { limit: 4 })
        ));
        // the rest of the input is gone, " ij" included
        assert_eq!(segmenter.next_segment().unwrap(), None);

        segmenter.init_str("ab cd");
        assert_eq!(
            texts(&mut segmenter),
            vec![("ab ".to_string(), BREAK), ("cd".to_string(), BANG)]
        );
    }

    #[test]
    fn test_scan_accessors() {
        let mut segmenter = Segmenter::new(vec![SpaceBreaker::boxed()]);
        segmenter.init_str("hi there");
        assert!(Segmenter::scan(&mut segmenter));
        assert_eq!(segmenter.text(), "hi ");
        assert_eq!(segmenter.bytes(), b"hi ");
        assert_eq!(segmenter.penalty(), BREAK);
        assert!(Segmenter::scan(&mut segmenter));
        assert_eq!(segmenter.text(), "there");
        assert!(!Segmenter::scan(&mut segmenter));
        assert!(segmenter.err().is_none());
        assert_eq!(segmenter.text(), "");
    }

    #[test]
    fn test_init_resets_state() {
        let mut segmenter = Segmenter::new(vec![SpaceBreaker::boxed()]);
        segmenter.init_str("first input");
        assert!(Segmenter::scan(&mut segmenter));
        segmenter.init_str("again");
        assert_eq!(texts(&mut segmenter), vec![("again".to_string(), BANG)]);
    }
}
