//! Exhaustive minimax search.
//!
//! Full-depth and unpruned. Children are generated in ascending index order
//! and ties keep the first child seen, so the same board always yields the
//! same move.
//!
//! The search mutates the board it is handed and undoes every tentative
//! placement through [`Tentative`], whose `Drop` empties the cell again on
//! every exit path. Memory stays proportional to depth.

use crate::{Board, Mark};
use std::ops::{Deref, DerefMut};
use tracing::{debug, instrument};

/// Score of a position the maximizing mark has won.
pub const WIN_SCORE: i32 = 10;
/// Score of a position the minimizing mark has won.
pub const LOSS_SCORE: i32 = -10;
/// Score of a full board with no line.
pub const DRAW_SCORE: i32 = 0;

/// Result of a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct SearchOutcome {
    /// Board index to play.
    pub index: usize,
    /// Minimax score of that move from the maximizing mark's view.
    pub score: i32,
    /// Positions visited, root included.
    pub nodes: u64,
}

/// A mark placed for the duration of one branch.
struct Tentative<'a> {
    board: &'a mut Board,
    index: usize,
}

impl<'a> Tentative<'a> {
    fn place(board: &'a mut Board, index: usize, mark: Mark) -> Self {
        board.place(index, mark);
        Self { board, index }
    }
}

impl Deref for Tentative<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for Tentative<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for Tentative<'_> {
    fn drop(&mut self) {
        self.board.clear(self.index);
    }
}

/// Scored node: the move leading to the best child, if any.
#[derive(Debug, Clone, Copy)]
struct Scored {
    index: Option<usize>,
    score: i32,
}

impl Scored {
    fn leaf(score: i32) -> Self {
        Self { index: None, score }
    }
}

/// Minimax searcher for one maximizing mark.
#[derive(Debug)]
struct Minimax {
    maximizing: Mark,
    nodes: u64,
}

impl Minimax {
    fn score(&mut self, board: &mut Board, to_move: Mark) -> Scored {
        self.nodes += 1;

        // Order matters: a board where both marks hold a line resolves
        // to the minimizing mark.
        if board.check_win(self.maximizing.opponent()) {
            return Scored::leaf(LOSS_SCORE);
        }
        if board.check_win(self.maximizing) {
            return Scored::leaf(WIN_SCORE);
        }
        let candidates = board.empty_indices();
        if candidates.is_empty() {
            return Scored::leaf(DRAW_SCORE);
        }

        let maximizing = to_move == self.maximizing;
        let mut best = Scored {
            index: None,
            score: if maximizing { i32::MIN } else { i32::MAX },
        };

        for index in candidates {
            let score = {
                let mut trial = Tentative::place(board, index, to_move);
                self.score(&mut trial, to_move.opponent()).score
            };
            let better = if maximizing {
                score > best.score
            } else {
                score < best.score
            };
            if better {
                best = Scored {
                    index: Some(index),
                    score,
                };
            }
        }

        best
    }
}

/// Finds the optimal move for `maximizing`, which is also the mark to move.
///
/// Returns `None` when the board is already won or full. The board is
/// mutated during the search and restored before returning.
#[instrument(skip(board), fields(empty = board.empty_indices().len()))]
pub fn best_move(board: &mut Board, maximizing: Mark) -> Option<SearchOutcome> {
    let mut search = Minimax {
        maximizing,
        nodes: 0,
    };
    let root = search.score(board, maximizing);
    let outcome = root
        .index
        .map(|index| SearchOutcome::new(index, root.score, search.nodes));

    debug!(
        nodes = search.nodes,
        index = ?outcome.map(|o| o.index),
        score = root.score,
        "Search complete"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(pattern: &str) -> Board {
        Board::from_pattern(pattern).expect("nine cells")
    }

    #[test]
    fn test_board_restored_after_search() {
        let mut b = board("X...O...X");
        let before = b.clone();
        best_move(&mut b, Mark::O);
        assert_eq!(b, before);

        let mut empty = Board::new();
        best_move(&mut empty, Mark::X);
        assert_eq!(empty, Board::new());
    }

    #[test]
    fn test_corner_opening_answered_in_center() {
        for corner in [0, 2, 6, 8] {
            let mut b = Board::new();
            b.place(corner, Mark::X);
            let outcome = best_move(&mut b, Mark::O).expect("moves remain");
            assert_eq!(outcome.index, 4, "after X at {corner}");
            assert_eq!(outcome.score, DRAW_SCORE);
        }
    }

    #[test]
    fn test_empty_board_is_a_draw_and_picks_lowest_index() {
        // Every opening draws under perfect play, so the first one wins the tie.
        let mut b = Board::new();
        let outcome = best_move(&mut b, Mark::X).expect("moves remain");
        assert_eq!(outcome.score, DRAW_SCORE);
        assert_eq!(outcome.index, 0);
    }

    #[test]
    fn test_tie_break_prefers_lower_index() {
        // O O . / O X X / . X X: O wins at 2 or at 6.
        let mut b = board("OO.OXX.XX");
        let outcome = best_move(&mut b, Mark::O).expect("moves remain");
        assert_eq!(outcome.index, 2);
        assert_eq!(outcome.score, WIN_SCORE);
    }

    #[test]
    fn test_blocks_immediate_threat() {
        // . . . / . O . / X X .
        let mut b = board("....O.XX.");
        let outcome = best_move(&mut b, Mark::O).expect("moves remain");
        assert_eq!(outcome.index, 8);
        assert!(outcome.score >= DRAW_SCORE);
    }

    #[test]
    fn test_terminal_board_has_no_move() {
        let mut won = board("XXXOO....");
        assert_eq!(best_move(&mut won, Mark::O), None);

        let mut full = board("XOXXOOOXX");
        assert_eq!(best_move(&mut full, Mark::X), None);
    }

    #[test]
    fn test_both_lines_resolve_to_minimizing_mark() {
        let mut search = Minimax {
            maximizing: Mark::O,
            nodes: 0,
        };
        // Unreachable in play: both marks hold a row.
        let mut b = board("XXXOOO...");
        let scored = search.score(&mut b, Mark::O);
        assert_eq!(scored.score, LOSS_SCORE);
        assert_eq!(scored.index, None);
        assert_eq!(search.nodes, 1);
    }

    #[test]
    fn test_last_cell_is_taken() {
        // X O X / X O O / O X .
        let mut b = board("XOXXOOOX.");
        let outcome = best_move(&mut b, Mark::X).expect("one move left");
        assert_eq!(outcome.index, 8);
    }
}
