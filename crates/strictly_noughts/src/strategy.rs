//! Move-selection strategies for automated participants.

use crate::{Board, Mark, search};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Chooses moves for an automated participant.
pub trait Strategy: Send {
    /// Returns the strategy's display name.
    fn name(&self) -> &str;

    /// Chooses a cell for `mark` to play.
    ///
    /// Returns `None` only when the board is already won or full. The board
    /// is never modified.
    fn choose_move(&mut self, board: &Board, mark: Mark) -> Option<usize>;
}

/// Optimal play through exhaustive minimax.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxStrategy;

impl Strategy for MinimaxStrategy {
    fn name(&self) -> &str {
        "minimax"
    }

    #[instrument(skip(self, board))]
    fn choose_move(&mut self, board: &Board, mark: Mark) -> Option<usize> {
        let mut scratch = board.clone();
        search::best_move(&mut scratch, mark).map(|outcome| outcome.index)
    }
}

/// Uniformly random legal moves.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Creates a strategy seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible strategy.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    #[instrument(skip(self, board))]
    fn choose_move(&mut self, board: &Board, mark: Mark) -> Option<usize> {
        if board.check_win(Mark::X) || board.check_win(Mark::O) {
            return None;
        }
        let choice = board.empty_indices().choose(&mut self.rng).copied();
        debug!(?choice, "Random move chosen");
        choice
    }
}

/// How strongly the automated participant plays.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Never loses.
    #[default]
    Minimax,
    /// Any empty cell.
    Random,
}

impl Difficulty {
    /// Builds the strategy for this difficulty.
    ///
    /// `seed` only affects [`Difficulty::Random`].
    #[instrument]
    pub fn strategy(self, seed: Option<u64>) -> Box<dyn Strategy> {
        match self {
            Difficulty::Minimax => Box::new(MinimaxStrategy),
            Difficulty::Random => Box::new(match seed {
                Some(seed) => RandomStrategy::seeded(seed),
                None => RandomStrategy::new(),
            }),
        }
    }
}
