//! Game session model - the application layer for chess game state.

use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, Move, Position};
use thiserror::Error;
use tracing::info;

use crate::domain::chess::{Piece, shakmaty_to_piece, to_square};
use crate::domain::notation::move_coords;

/// Attempt to apply a move that is not legal in the current position.
/// The session only ever receives already-validated moves, so this is an
/// internal invariant violation rather than a user-facing rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("move {0} is not legal in the current position")]
pub struct ApplyError(pub String);

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// Checkmate - the given color won.
    Checkmate(Color),
    /// Stalemate - draw.
    Stalemate,
    /// Insufficient material - draw.
    InsufficientMaterial,
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::Checkmate(Color::White) => f.write_str("checkmate, white wins"),
            GameOutcome::Checkmate(Color::Black) => f.write_str("checkmate, black wins"),
            GameOutcome::Stalemate => f.write_str("stalemate"),
            GameOutcome::InsufficientMaterial => f.write_str("draw by insufficient material"),
        }
    }
}

/// A single game against the engine: the current position, the moves that
/// produced it, and the board auto-display flag.
///
/// Invariant: `position` is always reachable from the standard initial
/// position by playing `history` in order.
pub struct GameSession {
    position: Chess,
    history: Vec<UciMove>,
    auto_display: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            history: Vec::new(),
            auto_display: false,
        }
    }

    /// Start over from the standard initial position.
    pub fn reset(&mut self) {
        info!(moves_played = self.history.len(), "session reset");
        self.position = Chess::default();
        self.history.clear();
    }

    pub fn set_auto_display(&mut self, on: bool) {
        self.auto_display = on;
    }

    pub fn auto_display(&self) -> bool {
        self.auto_display
    }

    /// Read-only snapshot of the current position.
    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// UCI moves played since the initial position.
    pub fn history(&self) -> &[UciMove] {
        &self.history
    }

    /// Piece at row/col (0-indexed, row 0 = rank 8), for rendering.
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        let sq = to_square(row, col);
        self.position.board().piece_at(sq).map(shakmaty_to_piece)
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Apply an already-validated legal move.
    ///
    /// The legality re-check is defensive; a failure here means a caller
    /// broke the resolver contract.
    pub fn apply(&mut self, m: Move) -> Result<(), ApplyError> {
        if !self.position.legal_moves().contains(&m) {
            let (from, to) = move_coords(&m);
            return Err(ApplyError(format!("{from}{to}")));
        }
        let uci = UciMove::from_standard(m.clone());
        // play() cannot fail for a move drawn from legal_moves()
        self.position = self
            .position
            .clone()
            .play(m)
            .map_err(|_| ApplyError(uci.to_string()))?;
        self.history.push(uci);
        Ok(())
    }

    /// Whether the game has ended, and how.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.position.is_checkmate() {
            // the side to move is the side that got mated
            Some(GameOutcome::Checkmate(self.position.turn().other()))
        } else if self.position.is_stalemate() {
            Some(GameOutcome::Stalemate)
        } else if self.position.is_insufficient_material() {
            Some(GameOutcome::InsufficientMaterial)
        } else {
            None
        }
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
