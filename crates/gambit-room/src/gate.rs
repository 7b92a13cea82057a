//! The move authorization gate.
//!
//! Runs before anything touches the position. The first four checks are
//! cheap and local: they keep a spectator, an impatient player, or a buggy
//! client from reaching the engine with a move they have no right to make.
//! The fifth hands legality to the rules engine, the only place chess
//! rules live.

use gambit_protocol::{RejectReason, Square};
use gambit_rules::{ResolvedMove, RulesEngine};
use gambit_session::SessionRegistry;
use gambit_transport::ConnectionId;

/// An unauthorized, client-submitted move. Consumed by [`authorize`].
///
/// The squares are kept exactly as the client sent them; parsing is part
/// of authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub requester: ConnectionId,
    pub from: String,
    pub to: String,
}

/// The gate's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Legal, and the requester is entitled to play it.
    Accepted(ResolvedMove),
    /// Refused for the given reason. Nothing changed.
    Rejected(RejectReason),
}

/// Decides whether `intent` may be applied.
///
/// Checks run in order and stop at the first failure:
///
/// 1. the requester holds a role slot, else `NOT_A_PLAYER`;
/// 2. the side to move is the slot's bound color, else `NOT_YOUR_TURN`;
/// 3. the source square names a square holding a piece, else
///    `ILLEGAL_MOVE` (malformed) or `EMPTY_SOURCE`;
/// 4. that piece is the requester's color, else `WRONG_OWNER`;
/// 5. the engine accepts the move, else `ILLEGAL_MOVE` (this also covers a
///    malformed destination).
///
/// Never mutates the registry or the engine.
pub fn authorize<E: RulesEngine>(
    registry: &SessionRegistry,
    engine: &E,
    intent: &MoveIntent,
) -> Decision {
    use Decision::Rejected;

    let Some(color) = registry.role_of(intent.requester).color() else {
        return Rejected(RejectReason::NotAPlayer);
    };

    if engine.side_to_move() != color {
        return Rejected(RejectReason::NotYourTurn);
    }

    let Ok(from) = intent.from.parse::<Square>() else {
        return Rejected(RejectReason::IllegalMove);
    };
    let Some(piece) = engine.piece_at(from) else {
        return Rejected(RejectReason::EmptySource);
    };

    if piece.color != color {
        return Rejected(RejectReason::WrongOwner);
    }

    let Ok(to) = intent.to.parse::<Square>() else {
        return Rejected(RejectReason::IllegalMove);
    };
    match engine.validate_move(from, to) {
        Ok(mv) => Decision::Accepted(mv),
        Err(_) => Rejected(RejectReason::IllegalMove),
    }
}
