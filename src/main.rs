use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod domain;
mod models;
mod repl;

use models::{TurnController, UciEngine};

/// Play chess against a UCI engine from your terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a UCI engine binary
    #[arg(long, default_value = "stockfish")]
    engine: String,

    /// Engine think time per move, in milliseconds
    #[arg(long, default_value_t = 100)]
    movetime: u64,

    /// Print the board automatically after every turn
    #[arg(long)]
    auto_board: bool,
}

fn main() -> anyhow::Result<()> {
    // logs go to stderr so the board and prompts stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut engine = UciEngine::new(args.engine.clone());
    engine
        .start()
        .with_context(|| format!("starting engine \"{}\"", args.engine))?;

    let mut controller =
        TurnController::new(Box::new(engine), Duration::from_millis(args.movetime));
    controller.session_mut().set_auto_display(args.auto_board);

    repl::run(controller)
}
