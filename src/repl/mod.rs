//! Line-based command front end.
//!
//! Mirrors a chat-bot command surface: slash commands control the session,
//! any other non-empty line is treated as move text.

mod board;

pub use board::render;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::error;

use crate::models::{TurnController, TurnError, TurnReport};

const EXAMPLE_MOVES: &str = "Nb1c3 or e2e4";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    NewGame,
    Board,
    BoardOn,
    BoardOff,
    Help,
    Quit,
    Unknown(&'a str),
    Move(&'a str),
}

fn parse_command(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line {
        "/newgame" => Command::NewGame,
        "/board" => Command::Board,
        "/board_on" => Command::BoardOn,
        "/board_off" => Command::BoardOff,
        "/help" | "/start" => Command::Help,
        "/quit" => Command::Quit,
        other if other.starts_with('/') => Command::Unknown(other),
        other => Command::Move(other),
    })
}

fn print_help() {
    println!("You play white; the engine answers every move.");
    println!("Moves are written as origin square + destination square,");
    println!("with a piece letter in front for everything except pawns:");
    println!("  K king, Q queen, R rook, B bishop, N knight");
    println!("  (knight is \"N\" to avoid clashing with the king's \"K\")");
    println!("Examples: e2e4, Nb1c3");
    println!();
    println!("Commands:");
    println!("  /newgame    start a new game");
    println!("  /board      show the board");
    println!("  /board_on   show the board after every turn");
    println!("  /board_off  stop showing the board automatically");
    println!("  /help       this message");
    println!("  /quit       leave");
}

fn print_report(report: &TurnReport) {
    if let Some(reply) = &report.reply {
        if report.check && report.outcome.is_none() {
            println!("Engine plays {reply}. Check!");
        } else {
            println!("Engine plays {reply}.");
        }
    }
    if let Some(outcome) = &report.outcome {
        println!("Game over: {outcome}. /newgame starts another.");
    }
}

/// Run the command loop until /quit or end of input.
pub fn run(mut controller: TurnController) -> Result<()> {
    println!("chessbot - play chess against a UCI engine");
    println!();
    print_help();
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;

        match parse_command(&line) {
            None => continue,
            Some(Command::Quit) => break,
            Some(Command::Help) => print_help(),
            Some(Command::NewGame) => {
                controller.reset();
                println!("New game started. Your move.");
                if controller.session().auto_display() {
                    print!("{}", render(controller.session().position()));
                }
            }
            Some(Command::Board) => {
                print!("{}", render(controller.session().position()));
            }
            Some(Command::BoardOn) => {
                controller.session_mut().set_auto_display(true);
                println!("Board auto-display is on.");
            }
            Some(Command::BoardOff) => {
                controller.session_mut().set_auto_display(false);
                println!("Board auto-display is off.");
            }
            Some(Command::Unknown(cmd)) => {
                println!("Unknown command {cmd}. /help lists the commands.");
            }
            Some(Command::Move(text)) => match controller.play_turn(text) {
                Ok(report) => {
                    print_report(&report);
                    if controller.session().auto_display() {
                        print!("{}", render(controller.session().position()));
                    }
                }
                Err(e) if e.is_rejection() => {
                    println!("Move not accepted: {e}. Example: {EXAMPLE_MOVES}.");
                }
                Err(e @ TurnError::OpponentUnavailable(_)) => {
                    error!(error = %e, "engine failed after the user move was applied");
                    println!("Sorry - the engine is unavailable right now.");
                    println!("Your move was kept; try again in a moment.");
                }
                Err(e) => {
                    error!(error = %e, "turn failed unexpectedly");
                    println!("Something went wrong on our side. Please try again.");
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/newgame"), Some(Command::NewGame));
        assert_eq!(parse_command(" /board "), Some(Command::Board));
        assert_eq!(parse_command("/board_on"), Some(Command::BoardOn));
        assert_eq!(parse_command("/board_off"), Some(Command::BoardOff));
        assert_eq!(parse_command("/help"), Some(Command::Help));
        assert_eq!(parse_command("/quit"), Some(Command::Quit));
    }

    #[test]
    fn test_parse_move_text() {
        assert_eq!(parse_command("e2e4"), Some(Command::Move("e2e4")));
        assert_eq!(parse_command("  Nb1c3  "), Some(Command::Move("Nb1c3")));
    }

    #[test]
    fn test_parse_unknown_command_and_blank_lines() {
        assert_eq!(parse_command("/fen"), Some(Command::Unknown("/fen")));
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
    }
}
