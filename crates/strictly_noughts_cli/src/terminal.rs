//! Line-oriented terminal presentation layer.
//!
//! Reads commands from stdin while listening for engine moves from the
//! driver, and redraws the board after every change.

use anyhow::{Context, Result};
use strictly_noughts::{Board, DriverError, GameEvent, SessionConfig, SessionDriver, SessionView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    /// Play the cell at this index.
    Move(usize),
    /// Start a new game.
    Restart,
    /// Leave.
    Quit,
    /// Blank line.
    Nothing,
    /// Anything else.
    Unknown,
}

/// Maps a typed line to an [`Input`]; cells are numbered 1-9.
fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Input::Nothing,
        "r" | "restart" => Input::Restart,
        "q" | "quit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(position @ 1..=9) => Input::Move(position - 1),
            _ => Input::Unknown,
        },
    }
}

/// Runs an interactive game until the player quits or stdin closes.
#[instrument(skip(config), fields(participants = %config.participants()))]
pub async fn run(config: SessionConfig) -> Result<()> {
    let (driver, mut events) = SessionDriver::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!("Terminal session started");
    println!("Type 1-9 to play a cell, r to restart, q to quit.");

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    GameEvent::AutomatedMove { index, .. } => {
                        println!("Engine plays {}", index + 1);
                    }
                    GameEvent::Restarted { generation } => {
                        debug!(generation, "Rendering new game");
                        println!("New game");
                    }
                }
                render(&driver.view()?);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Move(index) => match driver.try_human_move(index) {
                        Ok(_) => render(&driver.view()?),
                        Err(DriverError::Rejected(rejection)) => {
                            debug!(%rejection, "Move refused");
                            println!("Can't play {}: {}.", index + 1, rejection);
                        }
                        Err(e) => return Err(e.into()),
                    },
                    Input::Restart => driver.reset()?,
                    Input::Quit => break,
                    Input::Nothing => {}
                    Input::Unknown => println!("Type 1-9, r or q."),
                }
            }
        }
    }

    info!("Terminal session ended");
    Ok(())
}

fn render(view: &SessionView) {
    println!();
    println!("{}", Board::from_cells(view.cells).display());
    if view.outcome.is_terminal() {
        println!("{}. Type r to play again.", view.outcome);
    } else if view.engine_thinking {
        println!("{} is thinking...", view.current_mark);
    } else {
        println!("{} to move", view.current_mark);
    }
}
