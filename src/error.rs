//! Error types shared by the priority queue and the puzzle model.
//!
//! An unsolvable puzzle is deliberately *not* represented here: it is a
//! regular search outcome (see [`crate::solver::SolveOutcome`]).

use thiserror::Error;

/// Errors raised by the fallible operations of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// `peek` or `extract` was called on a queue holding no entries.
    #[error("priority queue is empty")]
    EmptyQueue,
    /// The board handed to a constructor is not a valid permutation.
    #[error("invalid board: {reason}")]
    InvalidBoard {
        /// What exactly was wrong with the input.
        reason: InvalidBoardReason,
    },
}

/// Detailed cause of a [`PuzzleError::InvalidBoard`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBoardReason {
    /// Number of extracted tokens does not match `width * width`.
    #[error("expected {expected} tokens, found {found}")]
    WrongTokenCount { expected: usize, found: usize },
    /// A numeric label appears more than once.
    #[error("label {label} appears more than once")]
    DuplicateLabel { label: u16 },
    /// A numeric label lies outside `1..=max`.
    #[error("label {label} is outside 1..={max}")]
    LabelOutOfRange { label: u64, max: usize },
    /// No cell holds the empty marker.
    #[error("board has no empty cell")]
    MissingEmpty,
    /// More than one cell holds the empty marker.
    #[error("board has more than one empty cell")]
    MultipleEmpty,
    /// A token could not be read as a label or the empty marker.
    #[error("unparsable token '{token}'")]
    UnparsableToken { token: String },
    /// The configured board width cannot form a puzzle (must be 2..=256).
    #[error("unsupported board width {width}")]
    InvalidWidth { width: usize },
}

impl From<InvalidBoardReason> for PuzzleError {
    fn from(reason: InvalidBoardReason) -> Self {
        PuzzleError::InvalidBoard { reason }
    }
}
