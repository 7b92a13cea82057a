//! Core protocol types for Gambit's wire format.
//!
//! Every type here either travels on the wire or names something that
//! does. The shapes are chosen for a browser client: internally tagged
//! JSON objects, lowercase enum names, and squares as plain `"e4"` strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Board vocabulary
// ---------------------------------------------------------------------------

/// A side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

/// A board square, `a1` through `h8`.
///
/// Stored as zero-based file and rank indices. On the wire it is the usual
/// two-character name, so `Square` serializes through `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Builds a square from zero-based indices, or `None` if either is
    /// off the board.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    /// Zero-based file index (`a` = 0).
    pub fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank index (`1` = 0).
    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Returns `true` if this square is on the far rank for `color`, where
    /// that side's pawns promote.
    pub fn is_promotion_rank_for(self, color: Color) -> bool {
        match color {
            Color::White => self.rank == 7,
            Color::Black => self.rank == 0,
        }
    }
}

impl FromStr for Square {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidSquare(s.to_string());
        match s.as_bytes() {
            [f @ b'a'..=b'h', r @ b'1'..=b'8'] => {
                Self::new(f - b'a', r - b'1').ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

/// The kind of a chess piece, independent of color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// A colored piece standing on some square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The side to move is mated; `winner` delivered the mate.
    Checkmate { winner: Color },
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// Neither side can possibly mate.
    InsufficientMaterial,
    /// A hundred half-moves without a capture or a pawn move.
    FiftyMoveRule,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Self::Stalemate => write!(f, "stalemate"),
            Self::InsufficientMaterial => write!(f, "insufficient material"),
            Self::FiftyMoveRule => write!(f, "fifty-move rule"),
        }
    }
}

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

/// One of the two role slots a connection may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    FirstMover,
    SecondMover,
}

impl Role {
    /// Both roles, in allocation order.
    pub const ALL: [Role; 2] = [Role::FirstMover, Role::SecondMover];

    /// The color a slot is bound to when the session is created.
    ///
    /// This is a fixed 1:1 mapping. The session registry copies it into
    /// each slot once, and every later check reads the slot's stored
    /// color rather than calling this again.
    pub const fn bound_color(self) -> Color {
        match self {
            Self::FirstMover => Color::White,
            Self::SecondMover => Color::Black,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMover => write!(f, "first-mover"),
            Self::SecondMover => write!(f, "second-mover"),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Why a move request was refused.
///
/// Serialized in SCREAMING_SNAKE_CASE (`"NOT_YOUR_TURN"`), which is what
/// clients switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// The requester holds no role slot.
    NotAPlayer,
    /// It is the other side's move.
    NotYourTurn,
    /// Nothing stands on the source square.
    EmptySource,
    /// The piece on the source square belongs to the opponent.
    WrongOwner,
    /// The rules engine refused the move, or the request was malformed.
    IllegalMove,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotAPlayer => "not a player",
            Self::NotYourTurn => "not your turn",
            Self::EmptySource => "no piece at source square",
            Self::WrongOwner => "not your piece",
            Self::IllegalMove => "illegal move",
        };
        f.write_str(text)
    }
}

/// Messages a client sends to the server.
///
/// `#[serde(tag = "type")]` produces `{ "type": "MoveRequest", "from": "e2",
/// "to": "e4" }`. The square fields are raw strings and default to empty
/// when absent: a malformed request still decodes and is rejected by the
/// authorization gate in its usual order instead of failing here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// One attempt to move the piece on `from` to `to`.
    MoveRequest {
        #[serde(default)]
        from: String,
        #[serde(default)]
        to: String,
    },

    /// Ask for a fresh `StateSnapshot`.
    RequestResync,

    /// Ask to restart the game. Only honored for role holders.
    RequestReset,
}

/// Messages the server sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent once on join: you hold this role slot and play this color.
    RoleAssigned { role: Role, color: Color },

    /// Sent once on join when both slots are taken.
    SpectatorAssigned,

    /// The complete canonical position as FEN.
    StateSnapshot { fen: String },

    /// Broadcast to every connection after each accepted move.
    MoveApplied {
        from: Square,
        to: Square,
        fen: String,
        turn: Color,
    },

    /// Sent only to the requester of a refused move.
    MoveRejected { reason: RejectReason },

    /// Broadcast after a reset so clients drop local move history.
    GameReset,

    /// Broadcast right after the `MoveApplied` that ended the game.
    GameOver { outcome: Outcome },
}

// =========================================================================
// Tests
// =========================================================================
