//! Error types for typeseg

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SegmentError>;

/// Main error type for segmentation
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("Class table setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("Segmenter has no input attached")]
    NotInitialized,

    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Segment exceeds {limit} bytes without a break opportunity")]
    SegmentTooLong { limit: usize },
}

/// Unicode data file errors
///
/// Cloneable so that a failed one-shot setup can be reported to every
/// caller that asks for the same tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("{file}: cannot read data file: {reason}")]
    Missing { file: String, reason: String },

    #[error("{file}:{line}: {reason}")]
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: unknown class name {name:?}")]
    UnknownClass {
        file: String,
        line: usize,
        name: String,
    },
}

impl SegmentError {
    /// True for errors that came from the upstream rune source
    pub fn is_input(&self) -> bool {
        matches!(self, SegmentError::Input(_))
    }
}
