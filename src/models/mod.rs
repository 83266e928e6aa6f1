pub mod engine;
pub mod game;
pub mod turn;

pub use engine::{Engine, EngineError, UciEngine};
pub use game::{ApplyError, GameOutcome, GameSession};
pub use turn::{TurnController, TurnError, TurnReport};
