//! Rules engine capability for Gambit.
//!
//! The room never reasons about chess itself. It talks to a
//! [`RulesEngine`]: a narrow capability that owns one canonical position and
//! answers the handful of questions authorization and broadcasting need.
//! [`ShakmatyEngine`] is the production implementation; tests of the
//! authorization gate substitute a scripted fake.

mod engine;
mod error;

pub use engine::ShakmatyEngine;
pub use error::RulesError;

use gambit_protocol::{Color, Outcome, Piece, PieceKind, Square};

/// FEN of the standard initial position.
pub const STANDARD_START: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A move that the engine has declared legal, with every choice the client
/// did not make filled in.
///
/// Promotion is always resolved to a queen; the protocol does not let the
/// client pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

/// The capability set a game room needs from a chess rules engine.
///
/// Implementations own exactly one position. `validate_move` never
/// mutates; `apply_move` is only ever called with a move that
/// `validate_move` just returned for the same position.
pub trait RulesEngine: Send + 'static {
    /// Whose move it is.
    fn side_to_move(&self) -> Color;

    /// The piece standing on `square`, if any.
    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// Checks full legality (check evasion, castling, en passant,
    /// promotion) without changing the position.
    ///
    /// # Errors
    /// [`RulesError::IllegalMove`] if the move cannot be played.
    fn validate_move(
        &self,
        from: Square,
        to: Square,
    ) -> Result<ResolvedMove, RulesError>;

    /// Commits a validated move.
    ///
    /// # Errors
    /// [`RulesError::Internal`] if the engine cannot apply it. The
    /// position may then be inconsistent and should be reloaded.
    fn apply_move(&mut self, mv: &ResolvedMove) -> Result<(), RulesError>;

    /// Checkmate, stalemate, or insufficient material, if the game is over.
    fn terminal(&self) -> Option<Outcome>;

    /// Serializes the position as FEN.
    fn dump(&self) -> String;

    /// Replaces the position with the one described by `fen`.
    ///
    /// # Errors
    /// [`RulesError::InvalidPosition`] if `fen` does not parse or describes
    /// an impossible position. The current position is left untouched.
    fn load(&mut self, fen: &str) -> Result<(), RulesError>;

    /// Returns to the engine's start position.
    fn reset(&mut self);
}
