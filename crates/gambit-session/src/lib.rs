//! Role slot management for Gambit.
//!
//! A game session has exactly two seats, one per [`Role`]. This crate
//! tracks which connection, if any, sits in each:
//!
//! 1. **Assignment** — first come, first served: the first-mover seat, then
//!    the second-mover seat, then spectator status.
//! 2. **Release** — a departing connection frees its seat for the next
//!    joiner.
//! 3. **Lookup** — which seat, and therefore which color, a connection
//!    plays.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← asks the registry who may move
//!     ↕
//! Session Layer (this crate)  ← seats ↔ connection ids
//!     ↕
//! Protocol / Transport (below)  ← Role, Color, ConnectionId
//! ```
//!
//! The registry has no notion of the network: it only ever sees
//! [`ConnectionId`](gambit_transport::ConnectionId)s.
//!
//! [`Role`]: gambit_protocol::Role

mod registry;
mod seat;

pub use registry::SessionRegistry;
pub use seat::{Assignment, Seat};
