//! Seat types: what a connection holds after joining.

use gambit_protocol::{Color, Role};
use gambit_transport::ConnectionId;

/// One role slot.
///
/// `role` and `color` are fixed when the registry is built; only `holder`
/// ever changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    role: Role,
    color: Color,
    holder: Option<ConnectionId>,
}

impl Seat {
    pub(crate) fn open(role: Role) -> Self {
        Self {
            role,
            color: role.bound_color(),
            holder: None,
        }
    }

    /// The role this seat grants.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The color this seat plays for the whole game.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The connection currently sitting here, or `None` if open.
    pub fn holder(&self) -> Option<ConnectionId> {
        self.holder
    }

    /// Returns `true` if nobody holds this seat.
    pub fn is_open(&self) -> bool {
        self.holder.is_none()
    }

    pub(crate) fn set_holder(&mut self, holder: Option<ConnectionId>) {
        self.holder = holder;
    }
}

/// What a connection is, from the game's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Holds a role slot and may move pieces of `color`.
    Player { role: Role, color: Color },
    /// Holds no slot. Read-only.
    Spectator,
}

impl Assignment {
    /// The bound color, or `None` for spectators.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Player { color, .. } => Some(color),
            Self::Spectator => None,
        }
    }

    /// Returns `true` for role holders.
    pub fn is_player(self) -> bool {
        matches!(self, Self::Player { .. })
    }
}

impl From<&Seat> for Assignment {
    fn from(seat: &Seat) -> Self {
        Self::Player {
            role: seat.role,
            color: seat.color,
        }
    }
}
