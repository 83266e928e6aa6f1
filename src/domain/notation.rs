//! Long-form move notation codec.
//!
//! Moves are written as origin square + destination square, prefixed with a
//! piece letter for everything except pawns: "e2e4", "Nb1c3". Cosmetic
//! hyphens and spaces are ignored ("e2-e4"). This is a pure syntactic
//! transform - legality lives with the resolver and the rules engine.

use shakmaty::{Chess, File, Move, Position, Square};
use thiserror::Error;

use crate::domain::chess::PieceKind;

/// Structural form of a decoded move. The piece kind is only a
/// disambiguation hint; actual piece identity comes from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralMove {
    pub from: Square,
    pub to: Square,
    pub piece: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("malformed move \"{input}\"")]
    MalformedMove { input: String },
    #[error("unknown piece letter '{letter}', expected one of K, Q, R, B or N")]
    UnknownPieceLetter { letter: char },
}

/// Decode move text into a structural move.
///
/// Grammar by normalized length:
/// - 4 chars: pawn move, origin + destination ("e2e4")
/// - 5 chars: piece letter + origin + destination ("Nb1c3")
/// - 6 chars: as 5, with a trailing promotion-piece letter
pub fn decode(text: &str) -> Result<StructuralMove, NotationError> {
    let trimmed = text.trim();
    let normalized: Vec<char> = trimmed
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .collect();

    let malformed = || NotationError::MalformedMove {
        input: trimmed.to_string(),
    };

    match normalized.len() {
        4 => Ok(StructuralMove {
            from: parse_square(normalized[0], normalized[1]).ok_or_else(malformed)?,
            to: parse_square(normalized[2], normalized[3]).ok_or_else(malformed)?,
            piece: None,
            promotion: None,
        }),
        5 | 6 => {
            let letter = normalized[0];
            let piece = PieceKind::from_letter(letter)
                .ok_or(NotationError::UnknownPieceLetter { letter })?;
            let from = parse_square(normalized[1], normalized[2]).ok_or_else(malformed)?;
            let to = parse_square(normalized[3], normalized[4]).ok_or_else(malformed)?;
            let promotion = match normalized.get(5) {
                Some(&p) => Some(
                    PieceKind::from_letter(p)
                        .filter(|kind| *kind != PieceKind::King)
                        .ok_or_else(malformed)?,
                ),
                None => None,
            };
            Ok(StructuralMove {
                from,
                to,
                piece: Some(piece),
                promotion,
            })
        }
        _ => Err(malformed()),
    }
}

/// Encode an applied move as notation text, querying the mover's identity
/// from the post-move board at the destination square.
pub fn encode(m: &Move, board_after: &Chess) -> String {
    let (from, to) = move_coords(m);
    let kind = board_after
        .board()
        .piece_at(to)
        .map(|p| PieceKind::from_role(p.role))
        .unwrap_or_else(|| PieceKind::from_role(m.role()));
    match kind.letter() {
        Some(letter) => format!("{letter}{from}{to}"),
        None => format!("{from}{to}"),
    }
}

/// Origin and destination of a move as the notation sees them. Castling is
/// written as the king's origin and final square (e1g1 form).
pub fn move_coords(m: &Move) -> (Square, Square) {
    match m {
        Move::Normal { from, to, .. } => (*from, *to),
        Move::EnPassant { from, to, .. } => (*from, *to),
        Move::Castle { king, rook } => {
            let king_dest = if rook.file() == File::H {
                Square::from_coords(File::G, rook.rank())
            } else {
                Square::from_coords(File::C, rook.rank())
            };
            (*king, king_dest)
        }
        // drops never occur in standard chess
        Move::Put { to, .. } => (*to, *to),
    }
}

// Strict square parsing: lowercase file a-h, rank 1-8.
fn parse_square(file: char, rank: char) -> Option<Square> {
    if !file.is_ascii() || !rank.is_ascii() {
        return None;
    }
    Square::from_ascii(&[file as u8, rank as u8]).ok()
}
