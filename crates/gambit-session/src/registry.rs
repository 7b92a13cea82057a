//! The session registry: which connection sits in which role slot.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself. It is owned by the room
//! actor, which already serializes every join, leave, and move; adding a
//! lock here would only hide that single point of serialization.

use gambit_protocol::Role;
use gambit_transport::ConnectionId;

use crate::{Assignment, Seat};

/// Maps the two role slots to connection identities.
///
/// Invariants, upheld by every method:
/// - each seat has at most one holder;
/// - a connection holds at most one seat;
/// - anyone not holding a seat is a spectator (spectators are not stored).
///
/// ```text
/// assign_role(A) → FirstMover   assign_role(B) → SecondMover
/// assign_role(C) → Spectator    release_role(A)
/// assign_role(D) → FirstMover   (A's freed seat)
/// ```
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    /// Indexed in allocation order: `Role::ALL`.
    seats: [Seat; 2],
}

impl SessionRegistry {
    /// Creates a registry with both seats open.
    pub fn new() -> Self {
        Self {
            seats: Role::ALL.map(Seat::open),
        }
    }

    /// Seats `conn` in the first open slot, or makes it a spectator.
    ///
    /// Deterministic: first-mover before second-mover, arrival order
    /// decides. A connection that already holds a seat keeps it.
    pub fn assign_role(&mut self, conn: ConnectionId) -> Assignment {
        if let Some(seat) = self.seat_of(conn) {
            return Assignment::from(seat);
        }

        match self.seats.iter_mut().find(|s| s.is_open()) {
            Some(seat) => {
                seat.set_holder(Some(conn));
                tracing::info!(
                    %conn,
                    role = %seat.role(),
                    color = %seat.color(),
                    "role assigned"
                );
                Assignment::from(&*seat)
            }
            None => {
                tracing::info!(%conn, "both seats taken, spectator");
                Assignment::Spectator
            }
        }
    }

    /// Frees the seat `conn` holds, if any, and returns its role.
    ///
    /// No-op for spectators and unknown ids; calling it again after the
    /// first release changes nothing.
    pub fn release_role(&mut self, conn: ConnectionId) -> Option<Role> {
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.holder() == Some(conn))?;
        seat.set_holder(None);
        tracing::info!(%conn, role = %seat.role(), "role released");
        Some(seat.role())
    }

    /// What `conn` currently is. Pure lookup.
    pub fn role_of(&self, conn: ConnectionId) -> Assignment {
        self.seat_of(conn)
            .map_or(Assignment::Spectator, Assignment::from)
    }

    /// The connection holding `role`, if any.
    pub fn holder(&self, role: Role) -> Option<ConnectionId> {
        self.seats
            .iter()
            .find(|s| s.role() == role)
            .and_then(Seat::holder)
    }

    /// Both seats, first-mover first.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    fn seat_of(&self, conn: ConnectionId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.holder() == Some(conn))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
