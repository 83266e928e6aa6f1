//! Resolve structural moves against a position's legal-move set.
//!
//! The legal-move list is authoritative: the resolver only selects among the
//! moves it enumerates, it never judges legality itself.

use shakmaty::{Chess, Move, Position};
use thiserror::Error;

use crate::domain::chess::PieceKind;
use crate::domain::notation::{StructuralMove, move_coords};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no legal {piece} move from {from} to {to}")]
    NoMatchForPiece {
        piece: PieceKind,
        from: shakmaty::Square,
        to: shakmaty::Square,
    },
    #[error("no legal pawn move from {from} to {to}")]
    NoMatchForPawn {
        from: shakmaty::Square,
        to: shakmaty::Square,
    },
}

/// Find the unique legal move matching the structural move's coordinates
/// and optional piece-type hint.
///
/// When a candidate is a promotion, the structural promotion letter selects
/// the promoted piece; without one the promotion defaults to queen.
pub fn resolve(structural: &StructuralMove, position: &Chess) -> Result<Move, ResolveError> {
    for m in &position.legal_moves() {
        if move_coords(m) != (structural.from, structural.to) {
            continue;
        }
        if let Some(kind) = structural.piece {
            let occupant = position.board().piece_at(structural.from);
            if occupant.map(|p| p.role) != Some(kind.to_role()) {
                continue;
            }
        }
        if let Move::Normal {
            promotion: Some(role),
            ..
        } = m
        {
            let wanted = structural.promotion.unwrap_or(PieceKind::Queen);
            if *role != wanted.to_role() {
                continue;
            }
        }
        return Ok(m.clone());
    }

    Err(match structural.piece {
        Some(piece) => ResolveError::NoMatchForPiece {
            piece,
            from: structural.from,
            to: structural.to,
        },
        None => ResolveError::NoMatchForPawn {
            from: structural.from,
            to: structural.to,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notation::decode;
    use shakmaty::{Role, Square};

    fn play(mut position: Chess, moves: &[&str]) -> Chess {
        for text in moves {
            let structural = decode(text).unwrap();
            let m = resolve(&structural, &position).unwrap();
            position = position.play(m).unwrap();
        }
        position
    }

    #[test]
    fn test_resolves_knight_move_from_initial_position() {
        let position = Chess::default();
        let m = resolve(&decode("Nb1c3").unwrap(), &position).unwrap();
        assert_eq!(move_coords(&m), (Square::B1, Square::C3));
        assert_eq!(m.role(), Role::Knight);
    }

    #[test]
    fn test_rejects_wrong_piece_hint() {
        let position = Chess::default();
        let err = resolve(&decode("Bb1c3").unwrap(), &position).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NoMatchForPiece {
                piece: PieceKind::Bishop,
                from: Square::B1,
                to: Square::C3,
            }
        );
    }

    #[test]
    fn test_rejects_illegal_pawn_move() {
        let position = Chess::default();
        let err = resolve(&decode("e2e5").unwrap(), &position).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NoMatchForPawn {
                from: Square::E2,
                to: Square::E5,
            }
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let position = Chess::default();
        let structural = decode("e2e4").unwrap();
        let first = resolve(&structural, &position).unwrap();
        let second = resolve(&structural, &position).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolves_castling_as_king_move() {
        let position = play(
            Chess::default(),
            &["e2e4", "e7e5", "Ng1f3", "Ng8f6", "Bf1c4", "Bf8c5"],
        );
        let m = resolve(&decode("Ke1g1").unwrap(), &position).unwrap();
        assert!(matches!(m, Move::Castle { .. }));
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        // march the a-pawn through to a8
        let position = play(
            Chess::default(),
            &[
                "a2a4", "b7b5", "a4b5", "a7a6", "b5a6", "Bc8b7", "a6b7", "Ng8h6",
            ],
        );
        let m = resolve(&decode("b7a8").unwrap(), &position).unwrap();
        match m {
            Move::Normal { promotion, .. } => assert_eq!(promotion, Some(Role::Queen)),
            other => panic!("expected a promotion, got {other:?}"),
        }
    }
}
