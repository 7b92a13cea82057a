//! The authoritative game room for Gambit.
//!
//! One room owns one game: the role slots, the rules engine, and an outbox
//! per connected client. It runs as an isolated Tokio task (actor model),
//! so joins, leaves, moves, and resets are processed strictly one at a
//! time in arrival order.
//!
//! # Key types
//!
//! - [`authorize`] — the move authorization gate
//! - [`Table`] — the session state and every operation on it
//! - [`Broadcaster`] — fan-out to connected clients
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomConfig`] — room settings (channel size, start position)

mod broadcast;
mod config;
mod error;
mod gate;
mod room;
mod table;

pub use broadcast::{Broadcaster, Outbox};
pub use config::RoomConfig;
pub use error::RoomError;
pub use gate::{Decision, MoveIntent, authorize};
pub use room::{RoomHandle, RoomInfo, spawn_chess_room, spawn_room};
pub use table::Table;
