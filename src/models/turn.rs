//! Turn controller - drives one full user/engine turn against the session.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::notation::{self, NotationError};
use crate::domain::resolver::{ResolveError, resolve};
use crate::models::engine::{Engine, EngineError};
use crate::models::game::{ApplyError, GameOutcome, GameSession};

#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("the game is over: {0}")]
    GameFinished(GameOutcome),
    #[error("internal error: {0}")]
    Internal(#[from] ApplyError),
    #[error("opponent unavailable: {0}")]
    OpponentUnavailable(#[source] EngineError),
}

impl TurnError {
    /// Pre-commit rejections left the session untouched and the user can
    /// simply try another move; everything else is fatal for the turn.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TurnError::Notation(_) | TurnError::Resolve(_) | TurnError::GameFinished(_)
        )
    }
}

/// What a completed turn looked like from the caller's side.
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// The opponent's reply in long notation, absent when the user's own
    /// move ended the game.
    pub reply: Option<String>,
    /// Game end reached during this turn, if any.
    pub outcome: Option<GameOutcome>,
    /// Whether the side to move is now in check.
    pub check: bool,
}

/// Owns the session and the engine, and advances the game strictly
/// two plies at a time.
pub struct TurnController {
    session: GameSession,
    engine: Box<dyn Engine>,
    budget: Duration,
}

impl TurnController {
    pub fn new(engine: Box<dyn Engine>, budget: Duration) -> Self {
        Self {
            session: GameSession::new(),
            engine,
            budget,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// Start a new game. An engine failure here is logged, not fatal - a
    /// dead engine is restarted lazily on the next move request.
    pub fn reset(&mut self) {
        self.session.reset();
        if let Err(e) = self.engine.new_game() {
            warn!(error = %e, "engine reset failed, will retry on next move");
        }
    }

    /// Play one full turn: decode, resolve and apply the user's move, then
    /// fetch and apply the opponent's reply.
    ///
    /// Rejections (bad notation, no matching legal move, finished game)
    /// leave the session untouched. After the user's move commits, an
    /// engine failure leaves the session with exactly that ply applied.
    pub fn play_turn(&mut self, input: &str) -> Result<TurnReport, TurnError> {
        if let Some(outcome) = self.session.outcome() {
            return Err(TurnError::GameFinished(outcome));
        }

        let structural = notation::decode(input)?;
        let user_move = resolve(&structural, self.session.position())?;

        // commit point - failures past here are fatal, not rejections
        self.session.apply(user_move)?;
        debug!(ply = self.session.history().len(), "user move applied");

        if let Some(outcome) = self.session.outcome() {
            info!(%outcome, "game ended on the user's move");
            return Ok(TurnReport {
                reply: None,
                outcome: Some(outcome),
                check: self.session.is_check(),
            });
        }

        let reply = self
            .engine
            .best_move(self.session.position(), self.session.history(), self.budget)
            .map_err(TurnError::OpponentUnavailable)?;

        // the adapter validated the reply against this exact position
        self.session.apply(reply.clone())?;
        let reply_text = notation::encode(&reply, self.session.position());
        debug!(reply = %reply_text, "engine move applied");

        let outcome = self.session.outcome();
        if let Some(outcome) = &outcome {
            info!(%outcome, "game ended on the engine's move");
        }
        Ok(TurnReport {
            reply: Some(reply_text),
            outcome,
            check: self.session.is_check(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::uci::UciMove;
    use shakmaty::{Chess, Color, Move};

    /// Engine that plays back a fixed list of UCI replies.
    struct ScriptedEngine {
        replies: Vec<&'static str>,
        next: usize,
        fail: bool,
    }

    impl ScriptedEngine {
        fn new(replies: &[&'static str]) -> Box<Self> {
            Box::new(Self {
                replies: replies.to_vec(),
                next: 0,
                fail: false,
            })
        }

        fn failing() -> Box<Self> {
            Box::new(Self {
                replies: Vec::new(),
                next: 0,
                fail: true,
            })
        }
    }

    impl Engine for ScriptedEngine {
        fn new_game(&mut self) -> Result<(), EngineError> {
            self.next = 0;
            Ok(())
        }

        fn best_move(
            &mut self,
            position: &Chess,
            _history: &[UciMove],
            _budget: Duration,
        ) -> Result<Move, EngineError> {
            if self.fail {
                return Err(EngineError::Exited);
            }
            let text = self
                .replies
                .get(self.next)
                .expect("engine asked for more replies than scripted");
            self.next += 1;
            let uci: UciMove = text.parse().unwrap();
            Ok(uci.to_move(position).unwrap())
        }
    }

    fn controller(replies: &[&'static str]) -> TurnController {
        TurnController::new(ScriptedEngine::new(replies), Duration::from_millis(100))
    }

    #[test]
    fn test_full_turn_advances_two_plies() {
        let mut ctl = controller(&["e7e5", "b8c6"]);

        let report = ctl.play_turn("e2e4").unwrap();
        assert_eq!(report.reply.as_deref(), Some("e7e5"));
        assert_eq!(report.outcome, None);
        assert_eq!(ctl.session().history().len(), 2);

        // a knight reply comes back with its piece letter
        let report = ctl.play_turn("Ng1f3").unwrap();
        assert_eq!(report.reply.as_deref(), Some("Nb8c6"));
        assert_eq!(ctl.session().history().len(), 4);
    }

    #[test]
    fn test_rejections_leave_session_untouched() {
        let mut ctl = controller(&[]);

        // malformed, unknown piece letter, no bishop on b1, illegal pawn move
        for input in ["xyz", "Xb1c3", "Bb1c3", "e2e5"] {
            let err = ctl.play_turn(input).unwrap_err();
            assert!(err.is_rejection(), "input {input:?}");
            assert!(ctl.session().history().is_empty(), "input {input:?}");
        }
    }

    #[test]
    fn test_engine_failure_is_fatal_and_keeps_user_ply() {
        let mut ctl = TurnController::new(ScriptedEngine::failing(), Duration::from_millis(100));
        let err = ctl.play_turn("e2e4").unwrap_err();
        assert!(matches!(err, TurnError::OpponentUnavailable(_)));
        assert!(!err.is_rejection());
        // the user's move stays committed, no rollback
        assert_eq!(ctl.session().history().len(), 1);
    }

    #[test]
    fn test_user_mate_skips_engine_request() {
        // scholar's mate: 1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7#
        let mut ctl = controller(&["e7e5", "b8c6", "g8f6"]);
        ctl.play_turn("e2e4").unwrap();
        ctl.play_turn("Bf1c4").unwrap();
        ctl.play_turn("Qd1h5").unwrap();

        // the scripted engine would panic if asked for a fourth reply
        let report = ctl.play_turn("Qh5f7").unwrap();
        assert_eq!(report.reply, None);
        assert_eq!(report.outcome, Some(GameOutcome::Checkmate(Color::White)));
        assert!(report.check);
        assert_eq!(ctl.session().history().len(), 7);

        // further input in a finished game is rejected without mutation
        let err = ctl.play_turn("e2e4").unwrap_err();
        assert!(matches!(err, TurnError::GameFinished(_)));
        assert!(err.is_rejection());
        assert_eq!(ctl.session().history().len(), 7);
    }

    #[test]
    fn test_reset_starts_over() {
        let mut ctl = controller(&["e7e5"]);
        ctl.play_turn("e2e4").unwrap();
        ctl.reset();
        assert!(ctl.session().history().is_empty());
        assert_eq!(ctl.session().turn(), Color::White);
    }
}
