//! Command-line interface for strictly_noughts.

use clap::{Parser, Subcommand};
use strictly_noughts::{Difficulty, Mark};

/// Strictly Noughts - tic-tac-toe against an engine that never loses
#[derive(Parser, Debug)]
#[command(name = "strictly_noughts")]
#[command(about = "Tic-tac-toe with an exhaustive minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Number of human players (0, 1 or 2)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
        humans: Option<u8>,

        /// Engine strength (minimax or random)
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Pause before the engine's move lands, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Mark played by the human in single-player games (X or O)
        #[arg(long)]
        human_mark: Option<Mark>,

        /// Path to a TOML session config; flags override its values
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for the random engine
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Let the engine play itself and tally the results
    SelfPlay {
        /// Number of games to play
        #[arg(short, long, default_value = "10")]
        games: u32,

        /// Engine strength (minimax or random)
        #[arg(long, default_value = "minimax")]
        difficulty: Difficulty,

        /// Base seed for the random engine; game `n` uses `seed + n`
        #[arg(long)]
        seed: Option<u64>,
    },
}
