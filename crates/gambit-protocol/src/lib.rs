//! Wire protocol for Gambit.
//!
//! This crate defines the vocabulary clients and the server share:
//!
//! - **Board vocabulary** ([`Color`], [`Square`], [`Piece`], [`Outcome`]) —
//!   engine-neutral names for the things a chess position talks about.
//! - **Seats** ([`Role`]) — the two role slots a connection may hold.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`], [`RejectReason`]) —
//!   one closed enum per direction.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages become frames.
//!
//! ```text
//! Transport (frames) → Protocol (ClientMessage) → Room (authorize/apply)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, Color, Outcome, Piece, PieceKind, RejectReason, Role,
    ServerMessage, Square,
};
