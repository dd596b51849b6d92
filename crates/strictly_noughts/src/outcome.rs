//! Game outcome, always derived from the board.

use crate::{Board, Mark};
use serde::{Deserialize, Serialize};

/// Outcome of a game at some point in time.
///
/// Never stored next to the board; [`GameOutcome::of`] recomputes it so the
/// two cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Moves remain and nobody has a line.
    InProgress,
    /// The mark completed a line.
    Win(Mark),
    /// Board full without a line.
    Draw,
}

impl GameOutcome {
    /// Derives the outcome of a board.
    ///
    /// A full board that also holds a line is a win, never a draw.
    pub fn of(board: &Board) -> Self {
        if board.check_win(Mark::X) {
            GameOutcome::Win(Mark::X)
        } else if board.check_win(Mark::O) {
            GameOutcome::Win(Mark::O)
        } else if board.check_draw() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        }
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameOutcome::Win(mark) => Some(*mark),
            _ => None,
        }
    }

    /// Returns true once the game has concluded.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::Win(mark) => write!(f, "Player {} wins", mark),
            GameOutcome::Draw => write!(f, "Draw"),
        }
    }
}
