//! Error types.
//!
//! Invalid intents are not errors: they are ignored. Errors here abort the
//! current action and leave the last published snapshot in place.

use derive_more::{Display, Error, From};

use crate::topology::LineId;

/// Failure inside a game action.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// `needed_numbers` returned more than one value where exactly one is required.
    #[display("needed numbers on {line} returned {count} candidates, expected one")]
    AmbiguousNeededNumbers {
        /// Line being inspected.
        line: LineId,
        /// Number of candidates returned.
        count: usize,
    },

    /// Board cannot be evaluated (incomplete, or too many stars).
    #[display("structurally impossible board: {reason}")]
    Structural {
        /// What was wrong.
        reason: String,
    },

    /// The dealer had nothing left to draw.
    #[display("number pool exhausted")]
    PoolExhausted,

    /// A saved game could not be restored.
    #[display("invalid saved state: {_0}")]
    InvalidSave(#[error(not(source))] String),

    /// A background computation panicked or was cancelled.
    #[display("background task failed: {_0}")]
    Task(#[error(not(source))] String),
}

impl EngineError {
    pub(crate) fn structural(reason: impl Into<String>) -> Self {
        Self::Structural { reason: reason.into() }
    }
}

/// Failure in a persistence backend.
#[derive(Debug, Display, Error, From)]
pub enum StoreError {
    /// Filesystem error.
    #[display("store io error: {_0}")]
    Io(std::io::Error),

    /// Encoding or decoding error.
    #[display("store encoding error: {_0}")]
    Encode(bincode::Error),
}
