//! Error types for the rules layer.

use gambit_protocol::Square;

/// Errors reported by a [`RulesEngine`](crate::RulesEngine).
///
/// `IllegalMove` is an expected, everyday answer. `Internal` means the
/// engine failed while committing something it had already declared legal,
/// and callers must treat its position as suspect.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// A FEN string that does not describe a valid position.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// The move is not legal in the current position.
    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    /// The engine could not apply a move it previously validated.
    #[error("engine failure: {0}")]
    Internal(String),
}
