//! Strictly Noughts - terminal front end
//!
//! Play tic-tac-toe against the engine, against a friend, or watch the
//! engine play itself.

#![warn(missing_docs)]

mod cli;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::collections::BTreeMap;
use std::path::PathBuf;
use strictly_noughts::{Difficulty, Mark, ParticipantCount, Session, SessionConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so the board on stdout stays readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,strictly_noughts=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            humans,
            difficulty,
            delay_ms,
            human_mark,
            config,
            seed,
        } => {
            let config = play_config(config, humans, difficulty, delay_ms, human_mark, seed)?;
            terminal::run(config).await
        }
        Command::SelfPlay {
            games,
            difficulty,
            seed,
        } => run_self_play(games, difficulty, seed),
    }
}

/// Builds the session config from an optional file plus flag overrides.
#[instrument]
fn play_config(
    path: Option<PathBuf>,
    humans: Option<u8>,
    difficulty: Option<Difficulty>,
    delay_ms: Option<u64>,
    human_mark: Option<Mark>,
    seed: Option<u64>,
) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => SessionConfig::from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(humans) = humans {
        config = config.with_participants(ParticipantCount::try_from(humans)?);
    }
    if let Some(difficulty) = difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(delay_ms) = delay_ms {
        config = config.with_think_delay_ms(delay_ms);
    }
    if let Some(human_mark) = human_mark {
        config = config.with_human_mark(human_mark);
    }
    if seed.is_some() {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Plays `games` engine-vs-engine games and prints the tally.
#[instrument]
fn run_self_play(games: u32, difficulty: Difficulty, seed: Option<u64>) -> Result<()> {
    info!("Starting self-play");
    let mut tally: BTreeMap<String, u32> = BTreeMap::new();

    for game in 0..games {
        // Zero delay: the session plays itself to the end inside `new`.
        let config = SessionConfig::new(ParticipantCount::Zero)
            .with_difficulty(difficulty)
            .with_think_delay_ms(0)
            .with_seed(seed.map(|s| s.wrapping_add(u64::from(game))));
        let session = Session::new(config);
        let outcome = session.outcome();
        println!("Game {:>3}: {}", game + 1, outcome);
        *tally.entry(outcome.to_string()).or_default() += 1;
    }

    println!();
    for (outcome, count) in &tally {
        println!("{outcome:<14} {count}");
    }
    Ok(())
}
