//! UCI (Universal Chess Interface) protocol types and utilities.
//!
//! This module handles the line-level UCI vocabulary spoken to chess
//! engines. It provides types for UCI commands and responses, but does not
//! handle the actual process spawning (that's done in the models layer).

/// UCI commands that can be sent to an engine
#[derive(Debug, Clone)]
pub enum UciCommand {
    /// Initialize UCI mode
    Uci,
    /// Check if engine is ready
    IsReady,
    /// Set a new game
    UciNewGame,
    /// Set position (startpos with the moves played so far)
    Position { moves: Vec<String> },
    /// Search with a fixed time budget in milliseconds
    GoMoveTime(u64),
    /// Quit the engine
    Quit,
}

impl UciCommand {
    /// Convert command to UCI protocol string
    pub fn to_uci_string(&self) -> String {
        match self {
            UciCommand::Uci => "uci".to_string(),
            UciCommand::IsReady => "isready".to_string(),
            UciCommand::UciNewGame => "ucinewgame".to_string(),
            UciCommand::Position { moves } => {
                let mut cmd = String::from("position startpos");
                if !moves.is_empty() {
                    cmd.push_str(" moves ");
                    cmd.push_str(&moves.join(" "));
                }
                cmd
            }
            UciCommand::GoMoveTime(ms) => format!("go movetime {}", ms),
            UciCommand::Quit => "quit".to_string(),
        }
    }
}

/// Raw UCI output line types
#[derive(Debug, Clone)]
pub enum UciOutputKind {
    /// "uciok" - engine is ready for UCI
    UciOk,
    /// "readyok" - engine is ready
    ReadyOk,
    /// "info ..." - search information (ignored by this client)
    Info(String),
    /// "bestmove ..." - best move found
    BestMove(String),
    /// Engine identification
    Id(String),
    /// Option definition
    Option(String),
    /// Unknown/other output
    Other(String),
}

impl UciOutputKind {
    /// Parse a raw UCI output line into a categorized type
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line == "uciok" {
            UciOutputKind::UciOk
        } else if line == "readyok" {
            UciOutputKind::ReadyOk
        } else if let Some(rest) = line.strip_prefix("info ") {
            UciOutputKind::Info(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("bestmove ") {
            UciOutputKind::BestMove(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("id ") {
            UciOutputKind::Id(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("option ") {
            UciOutputKind::Option(rest.to_string())
        } else {
            UciOutputKind::Other(line.to_string())
        }
    }
}

/// Extract the move token from a "bestmove" payload, dropping any
/// "ponder ..." continuation ("e2e4 ponder e7e5" -> "e2e4").
pub fn bestmove_token(rest: &str) -> Option<&str> {
    rest.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_startpos() {
        let cmd = UciCommand::Position { moves: vec![] };
        assert_eq!(cmd.to_uci_string(), "position startpos");
    }

    #[test]
    fn test_position_with_moves() {
        let cmd = UciCommand::Position {
            moves: vec!["e2e4".to_string(), "e7e5".to_string()],
        };
        assert_eq!(cmd.to_uci_string(), "position startpos moves e2e4 e7e5");
    }

    #[test]
    fn test_go_movetime() {
        assert_eq!(UciCommand::GoMoveTime(100).to_uci_string(), "go movetime 100");
    }

    #[test]
    fn test_parse_bestmove() {
        let kind = UciOutputKind::parse("bestmove e2e4 ponder e7e5");
        match kind {
            UciOutputKind::BestMove(rest) => {
                assert_eq!(bestmove_token(&rest), Some("e2e4"));
            }
            other => panic!("expected bestmove, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_handshake_lines() {
        assert!(matches!(UciOutputKind::parse("uciok"), UciOutputKind::UciOk));
        assert!(matches!(
            UciOutputKind::parse("readyok"),
            UciOutputKind::ReadyOk
        ));
        assert!(matches!(
            UciOutputKind::parse("id name Stockfish 16"),
            UciOutputKind::Id(_)
        ));
        assert!(matches!(
            UciOutputKind::parse("info depth 20 score cp 35"),
            UciOutputKind::Info(_)
        ));
    }
}
