//! [`RulesEngine`] implementation backed by `shakmaty`.

use gambit_protocol::{Color, Outcome, Piece, PieceKind, Square};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Position, Rank};

use crate::{ResolvedMove, RulesEngine, RulesError};

/// Standard chess over a `shakmaty::Chess` position.
#[derive(Debug, Clone)]
pub struct ShakmatyEngine {
    position: Chess,
    start: Chess,
}

impl ShakmatyEngine {
    /// An engine at the standard initial position.
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            start: Chess::default(),
        }
    }

    /// An engine whose start position (used now and on every reset) is
    /// `fen`.
    pub fn with_start(fen: &str) -> Result<Self, RulesError> {
        let start = parse_fen(fen)?;
        Ok(Self {
            position: start.clone(),
            start,
        })
    }

    /// Every legal move in the current position, castling expressed as the
    /// king's two-square step. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<ResolvedMove> {
        if self.terminal().is_some() {
            return Vec::new();
        }
        self.position
            .legal_moves()
            .iter()
            .filter_map(|m| {
                match UciMove::from_move(m, CastlingMode::Standard) {
                    UciMove::Normal {
                        from,
                        to,
                        promotion,
                    } => Some(ResolvedMove {
                        from: square_from(from),
                        to: square_from(to),
                        promotion: promotion.map(kind_from),
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    fn to_uci(mv: &ResolvedMove) -> UciMove {
        UciMove::Normal {
            from: square_to(mv.from),
            to: square_to(mv.to),
            promotion: mv.promotion.map(kind_to),
        }
    }
}

impl Default for ShakmatyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine for ShakmatyEngine {
    fn side_to_move(&self) -> Color {
        color_from(self.position.turn())
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position
            .board()
            .piece_at(square_to(square))
            .map(|p| Piece {
                color: color_from(p.color),
                kind: kind_from(p.role),
            })
    }

    fn validate_move(
        &self,
        from: Square,
        to: Square,
    ) -> Result<ResolvedMove, RulesError> {
        let illegal = || RulesError::IllegalMove { from, to };

        // Pawns reaching the last rank always become queens.
        let promotion = match self.piece_at(from) {
            Some(Piece {
                kind: PieceKind::Pawn,
                color,
            }) if to.is_promotion_rank_for(color) => Some(PieceKind::Queen),
            _ => None,
        };
        let resolved = ResolvedMove {
            from,
            to,
            promotion,
        };

        if self.terminal().is_some() {
            return Err(illegal());
        }

        let uci = Self::to_uci(&resolved);
        let m = uci.to_move(&self.position).map_err(|_| illegal())?;
        if !self.position.is_legal(&m) {
            return Err(illegal());
        }
        // shakmaty also reads king-takes-own-rook as castling; only the
        // king's two-square step is accepted here.
        if UciMove::from_move(&m, CastlingMode::Standard) != uci {
            return Err(illegal());
        }
        Ok(resolved)
    }

    fn apply_move(&mut self, mv: &ResolvedMove) -> Result<(), RulesError> {
        let m = Self::to_uci(mv).to_move(&self.position).map_err(|e| {
            RulesError::Internal(format!("{}{}: {e}", mv.from, mv.to))
        })?;
        self.position = self.position.clone().play(&m).map_err(|e| {
            RulesError::Internal(format!("{}{}: {e}", mv.from, mv.to))
        })?;
        Ok(())
    }

    fn terminal(&self) -> Option<Outcome> {
        if self.position.is_checkmate() {
            Some(Outcome::Checkmate {
                winner: color_from(self.position.turn()).opposite(),
            })
        } else if self.position.is_stalemate() {
            Some(Outcome::Stalemate)
        } else if self.position.is_insufficient_material() {
            Some(Outcome::InsufficientMaterial)
        } else if self.position.halfmoves() >= 100 {
            Some(Outcome::FiftyMoveRule)
        } else {
            None
        }
    }

    fn dump(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal)
            .to_string()
    }

    fn load(&mut self, fen: &str) -> Result<(), RulesError> {
        self.position = parse_fen(fen)?;
        tracing::debug!(fen, "position loaded");
        Ok(())
    }

    fn reset(&mut self) {
        self.position = self.start.clone();
    }
}

fn parse_fen(fen: &str) -> Result<Chess, RulesError> {
    let parsed: Fen = fen
        .parse()
        .map_err(|e| RulesError::InvalidPosition(format!("{e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| RulesError::InvalidPosition(format!("{e}")))
}

// ---------------------------------------------------------------------------
// Vocabulary conversions
// ---------------------------------------------------------------------------

fn color_from(c: shakmaty::Color) -> Color {
    match c {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

fn kind_from(role: shakmaty::Role) -> PieceKind {
    match role {
        shakmaty::Role::Pawn => PieceKind::Pawn,
        shakmaty::Role::Knight => PieceKind::Knight,
        shakmaty::Role::Bishop => PieceKind::Bishop,
        shakmaty::Role::Rook => PieceKind::Rook,
        shakmaty::Role::Queen => PieceKind::Queen,
        shakmaty::Role::King => PieceKind::King,
    }
}

fn kind_to(kind: PieceKind) -> shakmaty::Role {
    match kind {
        PieceKind::Pawn => shakmaty::Role::Pawn,
        PieceKind::Knight => shakmaty::Role::Knight,
        PieceKind::Bishop => shakmaty::Role::Bishop,
        PieceKind::Rook => shakmaty::Role::Rook,
        PieceKind::Queen => shakmaty::Role::Queen,
        PieceKind::King => shakmaty::Role::King,
    }
}

fn square_to(sq: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        File::new(u32::from(sq.file())),
        Rank::new(u32::from(sq.rank())),
    )
}

fn square_from(sq: shakmaty::Square) -> Square {
    // shakmaty squares are always on the board.
    Square::new(u32::from(sq.file()) as u8, u32::from(sq.rank()) as u8)
        .expect("shakmaty square within 8x8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    /// Plays a sequence of `(from, to)` moves, panicking on any refusal.
    fn play(engine: &mut ShakmatyEngine, moves: &[(&str, &str)]) {
        for (from, to) in moves {
            let mv = engine.validate_move(sq(from), sq(to)).unwrap();
            engine.apply_move(&mv).unwrap();
        }
    }

    #[test]
    fn test_starting_position() {
        let engine = ShakmatyEngine::new();
        assert_eq!(engine.side_to_move(), Color::White);
        assert_eq!(engine.dump(), crate::STANDARD_START);
        assert_eq!(engine.legal_moves().len(), 20);
        assert!(engine.terminal().is_none());
    }

    #[test]
    fn test_piece_at_reports_color_and_kind() {
        let engine = ShakmatyEngine::new();
        assert_eq!(
            engine.piece_at(sq("e1")),
            Some(Piece {
                color: Color::White,
                kind: PieceKind::King
            })
        );
        assert_eq!(
            engine.piece_at(sq("d8")),
            Some(Piece {
                color: Color::Black,
                kind: PieceKind::Queen
            })
        );
        assert_eq!(engine.piece_at(sq("e4")), None);
    }

    #[test]
    fn test_validate_does_not_mutate() {
        let engine = ShakmatyEngine::new();
        let before = engine.dump();
        engine.validate_move(sq("e2"), sq("e4")).unwrap();
        assert_eq!(engine.dump(), before);
    }

    #[test]
    fn test_apply_switches_side_to_move() {
        let mut engine = ShakmatyEngine::new();
        play(&mut engine, &[("e2", "e4")]);
        assert_eq!(engine.side_to_move(), Color::Black);
        assert_eq!(
            engine.dump(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_illegal_moves_are_refused() {
        let engine = ShakmatyEngine::new();
        // Three squares forward.
        assert!(matches!(
            engine.validate_move(sq("e2"), sq("e5")),
            Err(RulesError::IllegalMove { .. })
        ));
        // Black pawn while white is to move.
        assert!(engine.validate_move(sq("e7"), sq("e5")).is_err());
        // Empty source square.
        assert!(engine.validate_move(sq("e4"), sq("e5")).is_err());
    }

    #[test]
    fn test_castling_from_king_step() {
        let mut engine = ShakmatyEngine::with_start(
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        play(&mut engine, &[("e1", "g1")]);
        assert_eq!(
            engine.piece_at(sq("f1")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
        assert_eq!(
            engine.piece_at(sq("g1")).map(|p| p.kind),
            Some(PieceKind::King)
        );
    }

    #[test]
    fn test_king_onto_own_rook_is_not_castling() {
        let engine = ShakmatyEngine::with_start(
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        for to in ["h1", "a1"] {
            assert!(
                matches!(
                    engine.validate_move(sq("e1"), sq(to)),
                    Err(RulesError::IllegalMove { .. })
                ),
                "e1{to}"
            );
        }
        assert!(engine.validate_move(sq("e1"), sq("g1")).is_ok());
        assert!(engine.validate_move(sq("e1"), sq("c1")).is_ok());

        let listed = engine.legal_moves();
        assert!(listed.iter().all(|m| m.to != sq("h1") && m.to != sq("a1")));
    }

    #[test]
    fn test_castling_out_of_check_is_refused() {
        let engine = ShakmatyEngine::with_start(
            "4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1",
        )
        .unwrap();
        assert!(engine.validate_move(sq("e1"), sq("g1")).is_err());
    }

    #[test]
    fn test_en_passant() {
        let mut engine = ShakmatyEngine::new();
        play(
            &mut engine,
            &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
        );
        play(&mut engine, &[("e5", "d6")]);
        assert_eq!(engine.piece_at(sq("d5")), None);
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let mut engine =
            ShakmatyEngine::with_start("8/P7/8/8/8/8/8/4K2k w - - 0 1")
                .unwrap();
        let mv = engine.validate_move(sq("a7"), sq("a8")).unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
        engine.apply_move(&mv).unwrap();
        assert_eq!(
            engine.piece_at(sq("a8")),
            Some(Piece {
                color: Color::White,
                kind: PieceKind::Queen
            })
        );
    }

    #[test]
    fn test_fools_mate_is_terminal() {
        let mut engine = ShakmatyEngine::new();
        play(
            &mut engine,
            &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
        );
        assert_eq!(
            engine.terminal(),
            Some(Outcome::Checkmate {
                winner: Color::Black
            })
        );
        assert!(engine.legal_moves().is_empty());
    }

    #[test]
    fn test_stalemate_and_insufficient_material() {
        let engine =
            ShakmatyEngine::with_start("8/8/8/8/8/6q1/5k2/7K w - - 0 1")
                .unwrap();
        assert_eq!(engine.terminal(), Some(Outcome::Stalemate));

        let engine =
            ShakmatyEngine::with_start("8/8/8/4k3/8/8/8/4K3 w - - 0 1")
                .unwrap();
        assert_eq!(engine.terminal(), Some(Outcome::InsufficientMaterial));
    }

    #[test]
    fn test_fifty_move_rule_ends_the_game() {
        let mut engine =
            ShakmatyEngine::with_start("4k3/8/8/8/8/8/8/R3K3 w - - 99 80")
                .unwrap();
        assert_eq!(engine.terminal(), None);

        play(&mut engine, &[("a1", "a2")]);
        assert_eq!(engine.terminal(), Some(Outcome::FiftyMoveRule));
        assert!(engine.legal_moves().is_empty());
        assert!(engine.validate_move(sq("e8"), sq("d8")).is_err());
    }

    #[test]
    fn test_no_moves_after_insufficient_material() {
        let engine =
            ShakmatyEngine::with_start("8/8/8/4k3/8/8/8/4K3 w - - 0 1")
                .unwrap();
        assert!(engine.validate_move(sq("e1"), sq("e2")).is_err());
    }

    #[test]
    fn test_load_rejects_garbage_and_keeps_position() {
        let mut engine = ShakmatyEngine::new();
        play(&mut engine, &[("d2", "d4")]);
        let before = engine.dump();
        assert!(matches!(
            engine.load("not a fen"),
            Err(RulesError::InvalidPosition(_))
        ));
        assert_eq!(engine.dump(), before);
    }

    #[test]
    fn test_reset_returns_to_configured_start() {
        let start = "8/P7/8/8/8/8/8/4K2k w - - 0 1";
        let mut engine = ShakmatyEngine::with_start(start).unwrap();
        play(&mut engine, &[("e1", "d1")]);
        engine.reset();
        assert_eq!(engine.dump(), start);
    }
}
