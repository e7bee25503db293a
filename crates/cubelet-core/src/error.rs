//! Error types for cubelet-core.

use thiserror::Error;

use crate::validate::InvalidState;

/// Result type for cubelet-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the puzzle engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A candidate state broke the nine-per-color invariant.
    #[error(transparent)]
    InvalidState(#[from] InvalidState),

    /// A move token could not be parsed.
    #[error("invalid move notation: {0:?}")]
    ParseMove(String),

    /// A facelet address fell outside the 3×3 grid.
    #[error("facelet ({row}, {col}) is outside the 3x3 grid")]
    InvalidCell { row: usize, col: usize },
}
