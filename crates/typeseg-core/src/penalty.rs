//! Break penalties
//!
//! A penalty is a signed break cost attached to the position after a rune.
//! Negative values invite a break, positive values inhibit one, and zero
//! means no rule had an opinion. Penalties from different rules at the same
//! position are summed by default; see [`PenaltyAggregator`].
//!
//! Rule sets express precedence through magnitude: a rule that must win
//! over another carries a weight larger than everything the losing rules
//! can add up to at one position.

/// Signed break cost after a position
pub type Penalty = i32;

/// No opinion
pub const NULL: Penalty = 0;

/// Inhibit a break
pub const JOIN: Penalty = 1_000;

/// Prefer a break
pub const BREAK: Penalty = -100;

/// Force a break
pub const BANG: Penalty = -10_000;

/// Add `add` into `total` element-wise, growing `total` as needed
///
/// Index 0 is the most recent rune; higher indices reach back into the
/// queue. Sums saturate instead of wrapping.
pub fn add_penalties(total: &mut Vec<Penalty>, add: &[Penalty]) {
    if total.len() < add.len() {
        total.resize(add.len(), NULL);
    }
    for (t, &a) in total.iter_mut().zip(add) {
        *t = t.saturating_add(a);
    }
}

/// How penalties that meet at one position are combined
///
/// Used both inside a breaker, where several of its rules settle the same
/// position, and by the segmenter, where several breakers do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PenaltyAggregator {
    /// Saturating sum
    #[default]
    Add,
    /// The largest penalty wins. [`NULL`] is no opinion and never replaces
    /// another penalty.
    Max,
}

impl PenaltyAggregator {
    pub fn combine(self, total: Penalty, p: Penalty) -> Penalty {
        match self {
            PenaltyAggregator::Add => total.saturating_add(p),
            PenaltyAggregator::Max if p == NULL => total,
            PenaltyAggregator::Max if total == NULL => p,
            PenaltyAggregator::Max => total.max(p),
        }
    }

    /// Combine `add` into `total` element-wise, growing `total` as needed
    pub fn fold(self, total: &mut Vec<Penalty>, add: &[Penalty]) {
        if total.len() < add.len() {
            total.resize(add.len(), NULL);
        }
        for (t, &a) in total.iter_mut().zip(add) {
            *t = self.combine(*t, a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_grows_and_sums() {
        let mut total = vec![0, JOIN];
        add_penalties(&mut total, &[0, BREAK, BANG]);
        assert_eq!(total, vec![0, JOIN + BREAK, BANG]);
    }

    #[test]
    fn test_add_shorter_vector_keeps_tail() {
        let mut total = vec![1, 2, 3];
        add_penalties(&mut total, &[10]);
        assert_eq!(total, vec![11, 2, 3]);
    }

    #[test]
    fn test_add_saturates() {
        let mut total = vec![Penalty::MIN + 1];
        add_penalties(&mut total, &[BANG]);
        assert_eq!(total, vec![Penalty::MIN]);
    }

    #[test]
    fn test_max_keeps_strongest_join() {
        let mut total = vec![0, JOIN, BREAK];
        PenaltyAggregator::Max.fold(&mut total, &[0, JOIN, BANG, BREAK]);
        assert_eq!(total, vec![0, JOIN, BREAK, BREAK]);

        let mut summed = vec![0, JOIN, BREAK];
        PenaltyAggregator::Add.fold(&mut summed, &[0, JOIN, BANG, BREAK]);
        assert_eq!(summed, vec![0, 2 * JOIN, BREAK + BANG, BREAK]);
    }

    #[test]
    fn test_max_ignores_null() {
        assert_eq!(PenaltyAggregator::Max.combine(BREAK, NULL), BREAK);
        assert_eq!(PenaltyAggregator::Max.combine(NULL, BANG), BANG);
        assert_eq!(PenaltyAggregator::default(), PenaltyAggregator::Add);
    }

    #[test]
    fn test_vocabulary_ordering() {
        assert!(BANG < BREAK && BREAK < NULL && NULL < JOIN);
        assert!(JOIN + BANG < NULL);
        assert!(JOIN + BREAK > NULL);
    }
}
