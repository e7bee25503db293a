//! Error types for the puzzle session and view server.

use std::time::Duration;

use cubelet_core::InvalidState;
use thiserror::Error;

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a session.
#[derive(Debug, Error)]
pub enum Error {
    /// A candidate state failed the color-count check and was discarded
    #[error(transparent)]
    InvalidState(#[from] InvalidState),

    /// Core engine error (bad notation, out-of-range cell)
    #[error(transparent)]
    Core(cubelet_core::Error),

    /// The solution provider failed
    #[error("Solution unavailable: {0}")]
    SolutionUnavailable(String),

    /// The solution provider did not answer in time
    #[error("Solution provider timed out after {0:?}")]
    Timeout(Duration),

    /// The request was overtaken by a newer user action
    #[error("Stale request: the puzzle changed since it was issued")]
    Stale,

    /// Playback hit an invalid state earlier; a full reset is required
    #[error("Playback is corrupted; reset the puzzle to continue")]
    Corrupted,

    /// No playable solution is loaded
    #[error("No solution loaded")]
    NoSolution,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cubelet_core::Error> for Error {
    fn from(e: cubelet_core::Error) -> Self {
        match e {
            cubelet_core::Error::InvalidState(invalid) => Error::InvalidState(invalid),
            other => Error::Core(other),
        }
    }
}
