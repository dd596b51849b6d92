//! Draw detection.

use crate::{Board, Cell};

/// Checks if every cell is occupied.
///
/// A full board with no winner is a draw; callers look for a line first.
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}
