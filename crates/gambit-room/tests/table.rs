//! Synchronous tests of [`Table`] without the actor, including an engine
//! that breaks while committing moves.

use gambit_protocol::{
    ClientMessage, Color, Outcome, Piece, RejectReason, ServerMessage, Square,
};
use gambit_room::{Decision, MoveIntent, Table};
use gambit_rules::{
    ResolvedMove, RulesEngine, RulesError, STANDARD_START, ShakmatyEngine,
};
use gambit_transport::ConnectionId;
use tokio::sync::mpsc;

/// How [`FaultyEngine::apply_move`] misbehaves.
#[derive(Clone, Copy)]
enum Fault {
    None,
    /// Half-applies the move, then reports failure.
    Error,
    /// Half-applies the move, then panics.
    Panic,
}

/// Real chess, except that committing a move can go wrong after the
/// position has already been touched.
struct FaultyEngine {
    inner: ShakmatyEngine,
    fault: Fault,
}

impl FaultyEngine {
    fn new(fault: Fault) -> Self {
        Self {
            inner: ShakmatyEngine::new(),
            fault,
        }
    }
}

impl RulesEngine for FaultyEngine {
    fn side_to_move(&self) -> Color {
        self.inner.side_to_move()
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.inner.piece_at(square)
    }

    fn validate_move(&self, from: Square, to: Square) -> Result<ResolvedMove, RulesError> {
        self.inner.validate_move(from, to)
    }

    fn apply_move(&mut self, mv: &ResolvedMove) -> Result<(), RulesError> {
        self.inner.apply_move(mv)?;
        match self.fault {
            Fault::None => Ok(()),
            Fault::Error => Err(RulesError::Internal("lost the board".into())),
            Fault::Panic => panic!("engine blew up"),
        }
    }

    fn terminal(&self) -> Option<Outcome> {
        self.inner.terminal()
    }

    fn dump(&self) -> String {
        self.inner.dump()
    }

    fn load(&mut self, fen: &str) -> Result<(), RulesError> {
        self.inner.load(fen)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

type Inbox = mpsc::UnboundedReceiver<ServerMessage>;

fn conn(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn drain(rx: &mut Inbox) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

/// White (1), black (2), and a spectator (3), with greetings drained.
fn seated<E: RulesEngine>(engine: E) -> (Table<E>, [Inbox; 3]) {
    let mut table = Table::new(engine);
    let mut inboxes = [1, 2, 3].map(|id| {
        let (tx, rx) = mpsc::unbounded_channel();
        table.on_connect(conn(id), tx);
        rx
    });
    for rx in &mut inboxes {
        drain(rx);
    }
    (table, inboxes)
}

fn intent(requester: u64, from: &str, to: &str) -> MoveIntent {
    MoveIntent {
        requester: conn(requester),
        from: from.into(),
        to: to.into(),
    }
}

// =========================================================================
// Defensive apply
// =========================================================================

#[test]
fn test_apply_error_restores_position_and_tells_only_requester() {
    let (mut table, mut inboxes) = seated(FaultyEngine::new(Fault::Error));

    let decision = table.submit_move(intent(1, "e2", "e4"));
    assert!(matches!(decision, Decision::Accepted(_)));

    assert_eq!(table.engine().dump(), STANDARD_START);
    assert_eq!(
        drain(&mut inboxes[0]),
        vec![
            ServerMessage::MoveRejected {
                reason: RejectReason::IllegalMove
            },
            ServerMessage::StateSnapshot {
                fen: STANDARD_START.into()
            },
        ]
    );
    assert!(drain(&mut inboxes[1]).is_empty());
    assert!(drain(&mut inboxes[2]).is_empty());
}

#[test]
fn test_apply_panic_restores_position() {
    let (mut table, mut inboxes) = seated(FaultyEngine::new(Fault::Panic));

    table.submit_move(intent(1, "e2", "e4"));

    assert_eq!(table.engine().dump(), STANDARD_START);
    assert_eq!(table.engine().side_to_move(), Color::White);
    let requester = drain(&mut inboxes[0]);
    assert_eq!(requester.len(), 2);
    assert!(drain(&mut inboxes[1]).is_empty());
}

#[test]
fn test_table_keeps_working_after_engine_fault() {
    let (mut table, mut inboxes) = seated(FaultyEngine::new(Fault::Error));
    table.submit_move(intent(1, "e2", "e4"));
    drain(&mut inboxes[0]);

    // White is still to move; a spectator is still not a player.
    assert_eq!(
        table.submit_move(intent(3, "d2", "d4")),
        Decision::Rejected(RejectReason::NotAPlayer)
    );
    assert_eq!(
        table.submit_move(intent(2, "e7", "e5")),
        Decision::Rejected(RejectReason::NotYourTurn)
    );
}

// =========================================================================
// Ordinary flow
// =========================================================================

#[test]
fn test_greeting_precedes_snapshot() {
    let mut table = Table::new(ShakmatyEngine::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    table.on_connect(conn(7), tx);

    let messages = drain(&mut rx);
    assert!(matches!(messages[0], ServerMessage::RoleAssigned { .. }));
    assert!(matches!(messages[1], ServerMessage::StateSnapshot { .. }));
    assert_eq!(messages.len(), 2);
}

#[test]
fn test_applied_move_is_broadcast_once_to_each() {
    let (mut table, mut inboxes) = seated(FaultyEngine::new(Fault::None));

    table.submit_move(intent(1, "g1", "f3"));

    for rx in &mut inboxes {
        let got = drain(rx);
        assert_eq!(got.len(), 1);
        assert!(matches!(
            got[0],
            ServerMessage::MoveApplied {
                turn: Color::Black,
                ..
            }
        ));
    }
}

#[test]
fn test_closed_outbox_does_not_block_others() {
    let (mut table, mut inboxes) = seated(ShakmatyEngine::new());

    // The spectator's socket task has gone away but the disconnect has
    // not arrived yet.
    let [a, b, c] = &mut inboxes;
    c.close();

    table.submit_move(intent(1, "e2", "e4"));
    assert_eq!(drain(a).len(), 1);
    assert_eq!(drain(b).len(), 1);
}

#[test]
fn test_disconnected_connection_receives_nothing_more() {
    let (mut table, mut inboxes) = seated(ShakmatyEngine::new());
    table.on_disconnect(conn(3));

    table.submit_move(intent(1, "e2", "e4"));
    assert!(drain(&mut inboxes[2]).is_empty());
    assert_eq!(table.connection_count(), 2);
}

#[test]
fn test_handle_dispatches_each_message_kind() {
    let (mut table, mut inboxes) = seated(ShakmatyEngine::new());

    table.handle(
        conn(1),
        ClientMessage::MoveRequest {
            from: "e2".into(),
            to: "e4".into(),
        },
    );
    for rx in &mut inboxes {
        assert_eq!(drain(rx).len(), 1);
    }

    table.handle(conn(3), ClientMessage::RequestResync);
    assert!(matches!(
        drain(&mut inboxes[2]).as_slice(),
        [ServerMessage::StateSnapshot { .. }]
    ));

    table.handle(conn(2), ClientMessage::RequestReset);
    assert_eq!(
        drain(&mut inboxes[0]),
        vec![
            ServerMessage::StateSnapshot {
                fen: STANDARD_START.into()
            },
            ServerMessage::GameReset,
        ]
    );
}

#[test]
fn test_reject_reaches_only_that_connection() {
    let (table, mut inboxes) = seated(ShakmatyEngine::new());

    table.reject(conn(3), RejectReason::IllegalMove);
    assert_eq!(
        drain(&mut inboxes[2]),
        vec![ServerMessage::MoveRejected {
            reason: RejectReason::IllegalMove
        }]
    );
    assert!(drain(&mut inboxes[0]).is_empty());
    assert!(drain(&mut inboxes[1]).is_empty());
    assert_eq!(table.engine().dump(), STANDARD_START);
}
