//! UCI engine adapter - talks to a chess engine across a subprocess boundary.
//!
//! This model handles spawning the engine process, the uci/isready
//! handshake, and the position/go/bestmove request cycle.
//!
//! Architecture:
//! - Engine I/O runs on OS threads (reader/writer) connected by channels
//! - The adapter itself is synchronous: callers block on the reply channel
//!   with a deadline, so a wedged engine surfaces as a timeout rather than
//!   a hang
//! - A dead process is respawned and re-handshaken before the next request

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use shakmaty::uci::UciMove;
use shakmaty::{Chess, Move};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::uci::{UciCommand, UciOutputKind, bestmove_token};

/// How long to wait for the uci/isready handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Extra wall-clock allowance on top of the per-move search budget
const DEFAULT_REPLY_GRACE: Duration = Duration::from_secs(10);

/// A chess engine: given the game so far, produce a legal reply.
///
/// The returned move is valid for the exact position it was requested
/// against; callers apply it without re-resolving.
pub trait Engine {
    /// Tell the engine a fresh game is starting.
    fn new_game(&mut self) -> Result<(), EngineError>;

    /// Produce a reply for `position`, reached by playing `history` from the
    /// standard initial position, within the given time budget.
    fn best_move(
        &mut self,
        position: &Chess,
        history: &[UciMove],
        budget: Duration,
    ) -> Result<Move, EngineError>;
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine \"{path}\": {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine process exited unexpectedly")]
    Exited,
    #[error("engine did not reply within {0:?}")]
    Timeout(Duration),
    #[error("engine sent an unusable reply: \"{0}\"")]
    MalformedReply(String),
}

/// Messages sent from the engine reader thread to the adapter
#[derive(Debug)]
enum EngineEvent {
    /// A line of output from the engine
    Output(String),
    /// Engine process exited
    Exited,
    /// Read error occurred
    Error(String),
}

struct EngineProcess {
    child: Child,
    events: Receiver<EngineEvent>,
    commands: Sender<String>,
}

/// UCI subprocess adapter implementing [`Engine`].
pub struct UciEngine {
    path: String,
    reply_grace: Duration,
    process: Option<EngineProcess>,
}

impl UciEngine {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reply_grace: DEFAULT_REPLY_GRACE,
            process: None,
        }
    }

    /// Override the wall-clock allowance granted on top of the search
    /// budget before a missing bestmove counts as a timeout.
    pub fn with_reply_grace(mut self, grace: Duration) -> Self {
        self.reply_grace = grace;
        self
    }

    /// Spawn the engine process and complete the UCI handshake.
    /// Does nothing if the engine is already running.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.process.is_some() {
            return Ok(());
        }

        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Spawn {
                path: self.path.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| EngineError::Spawn {
            path: self.path.clone(),
            source: std::io::Error::other("stdin not captured"),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| EngineError::Spawn {
            path: self.path.clone(),
            source: std::io::Error::other("stdout not captured"),
        })?;

        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let (cmd_tx, cmd_rx) = mpsc::channel::<String>();

        // Reader thread (OS thread for blocking I/O)
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(text) => {
                        if event_tx.send(EngineEvent::Output(text)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = event_tx.send(EngineEvent::Error(e.to_string()));
                        break;
                    }
                }
            }
            let _ = event_tx.send(EngineEvent::Exited);
        });

        // Writer thread (OS thread for blocking I/O)
        thread::spawn(move || {
            let mut writer = stdin;
            while let Ok(cmd) = cmd_rx.recv() {
                if writeln!(writer, "{}", cmd).is_err() {
                    break;
                }
                if writer.flush().is_err() {
                    break;
                }
            }
        });

        self.process = Some(EngineProcess {
            child,
            events: event_rx,
            commands: cmd_tx,
        });

        if let Err(e) = self.handshake() {
            self.reap();
            return Err(e);
        }

        info!(path = %self.path, "engine started");
        Ok(())
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        self.send(UciCommand::Uci)?;
        self.wait_for(
            |kind| matches!(kind, UciOutputKind::UciOk),
            HANDSHAKE_TIMEOUT,
        )?;
        self.send(UciCommand::IsReady)?;
        self.wait_for(
            |kind| matches!(kind, UciOutputKind::ReadyOk),
            HANDSHAKE_TIMEOUT,
        )?;
        Ok(())
    }

    /// Send quit and reap the engine process.
    pub fn stop(&mut self) {
        if let Some(mut proc) = self.process.take() {
            let _ = proc.commands.send(UciCommand::Quit.to_uci_string());
            let _ = proc.child.kill();
            let _ = proc.child.wait();
            info!(path = %self.path, "engine stopped");
        }
    }

    /// Restart the engine if its process has died since the last request.
    fn ensure_running(&mut self) -> Result<(), EngineError> {
        if let Some(proc) = self.process.as_mut() {
            match proc.child.try_wait() {
                Ok(None) => return Ok(()),
                _ => {
                    warn!(path = %self.path, "engine process died, restarting");
                    self.reap();
                }
            }
        }
        self.start()
    }

    /// Drop a dead process without the quit exchange.
    fn reap(&mut self) {
        if let Some(mut proc) = self.process.take() {
            let _ = proc.child.kill();
            let _ = proc.child.wait();
        }
    }

    fn send(&self, cmd: UciCommand) -> Result<(), EngineError> {
        let proc = self.process.as_ref().ok_or(EngineError::Exited)?;
        proc.commands
            .send(cmd.to_uci_string())
            .map_err(|_| EngineError::Exited)
    }

    /// Consume engine output until a line matches `want`, or fail on
    /// timeout/exit. Non-matching lines (info chatter) are discarded.
    fn wait_for(
        &mut self,
        want: impl Fn(&UciOutputKind) -> bool,
        timeout: Duration,
    ) -> Result<UciOutputKind, EngineError> {
        let result = match self.process.as_ref() {
            None => Err(EngineError::Exited),
            Some(proc) => {
                let deadline = Instant::now() + timeout;
                loop {
                    let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                        break Err(EngineError::Timeout(timeout));
                    };
                    match proc.events.recv_timeout(remaining) {
                        Ok(EngineEvent::Output(line)) => {
                            let kind = UciOutputKind::parse(&line);
                            if want(&kind) {
                                break Ok(kind);
                            }
                        }
                        Ok(EngineEvent::Exited) => break Err(EngineError::Exited),
                        Ok(EngineEvent::Error(e)) => {
                            warn!(error = %e, "engine read error");
                            break Err(EngineError::Exited);
                        }
                        Err(RecvTimeoutError::Timeout) => {
                            break Err(EngineError::Timeout(timeout));
                        }
                        Err(RecvTimeoutError::Disconnected) => break Err(EngineError::Exited),
                    }
                }
            }
        };
        if matches!(result, Err(EngineError::Exited)) {
            self.reap();
        }
        result
    }
}

impl Engine for UciEngine {
    fn new_game(&mut self) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.send(UciCommand::UciNewGame)?;
        self.send(UciCommand::IsReady)?;
        self.wait_for(
            |kind| matches!(kind, UciOutputKind::ReadyOk),
            HANDSHAKE_TIMEOUT,
        )?;
        Ok(())
    }

    fn best_move(
        &mut self,
        position: &Chess,
        history: &[UciMove],
        budget: Duration,
    ) -> Result<Move, EngineError> {
        self.ensure_running()?;

        let moves = history.iter().map(|m| m.to_string()).collect();
        self.send(UciCommand::Position { moves })?;
        self.send(UciCommand::GoMoveTime(budget.as_millis() as u64))?;

        let rest = match self.wait_for(
            |kind| matches!(kind, UciOutputKind::BestMove(_)),
            budget + self.reply_grace,
        ) {
            Ok(UciOutputKind::BestMove(rest)) => rest,
            Ok(other) => return Err(EngineError::MalformedReply(format!("{other:?}"))),
            Err(e) => {
                if matches!(e, EngineError::Timeout(_)) {
                    // a late bestmove would be mistaken for the answer to
                    // the next request; start over instead
                    self.reap();
                }
                return Err(e);
            }
        };

        let token = bestmove_token(&rest)
            .ok_or_else(|| EngineError::MalformedReply(rest.clone()))?;
        let uci: UciMove = token
            .parse()
            .map_err(|_| EngineError::MalformedReply(rest.clone()))?;
        let m = uci
            .to_move(position)
            .map_err(|_| EngineError::MalformedReply(rest.clone()))?;

        debug!(reply = %token, "engine best move");
        Ok(m)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
