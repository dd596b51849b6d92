//! Core domain types for the noughts-and-crosses board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// One of the two participant symbols.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
    strum::EnumString,
)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell holding a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 board, row-major (`index = row * 3 + col`).
///
/// # Panics
///
/// Every index-taking method panics when `index >= 9`. Callers are expected
/// to hand in indices produced by the presentation layer or by
/// [`Board::empty_indices`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Builds a board from explicit cells.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Builds a board from a compact pattern such as `"XO.X....O"`.
    ///
    /// `X` and `O` place marks, anything else leaves the cell empty. Returns
    /// `None` unless the pattern has exactly nine characters.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        let chars: Vec<char> = pattern.chars().collect();
        if chars.len() != CELL_COUNT {
            return None;
        }
        let mut board = Self::new();
        for (index, c) in chars.into_iter().enumerate() {
            board.cells[index] = match c {
                'X' | 'x' => Cell::Occupied(Mark::X),
                'O' | 'o' => Cell::Occupied(Mark::O),
                _ => Cell::Empty,
            };
        }
        Some(board)
    }

    /// Gets the cell at the given index.
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        self.cells[index] == Cell::Empty
    }

    /// Places a mark on an empty cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is already occupied. The turn controller rejects
    /// such moves before they reach the board.
    pub fn place(&mut self, index: usize, mark: Mark) {
        assert!(
            self.is_empty(index),
            "cell {index} is already occupied by {:?}",
            self.cells[index]
        );
        self.cells[index] = Cell::Occupied(mark);
    }

    /// Empties a cell again. Only the search undoes moves.
    pub(crate) fn clear(&mut self, index: usize) {
        self.cells[index] = Cell::Empty;
    }

    /// Returns true if `mark` fills one of the eight lines.
    pub fn check_win(&self, mark: Mark) -> bool {
        crate::rules::has_line(self, mark)
    }

    /// Returns true if every cell is occupied.
    ///
    /// Does not look for a completed line; a full board with a line is a win.
    pub fn check_draw(&self) -> bool {
        crate::rules::is_full(self)
    }

    /// Indices of empty cells in ascending order.
    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their 1-based number, the digit a player types.
    #[instrument(skip(self))]
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Cell::Empty => (index + 1).to_string(),
                    Cell::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_indices(), (0..9).collect::<Vec<_>>());
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_place_fills_cell() {
        let mut board = Board::new();
        board.place(4, Mark::X);
        assert!(!board.is_empty(4));
        assert_eq!(board.get(4), Cell::Occupied(Mark::X));
        assert_eq!(board.empty_indices(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_place_on_occupied_cell_panics() {
        let mut board = Board::new();
        board.place(0, Mark::X);
        board.place(0, Mark::O);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_index_panics() {
        let board = Board::new();
        board.is_empty(9);
    }

    #[test]
    fn test_empty_and_occupied_always_sum_to_nine() {
        let mut board = Board::new();
        let mut mark = Mark::X;
        for index in [4, 0, 8, 2, 6, 3, 5, 1, 7] {
            assert_eq!(board.empty_indices().len() + board.occupied_count(), CELL_COUNT);
            board.place(index, mark);
            mark = mark.opponent();
        }
        assert_eq!(board.empty_indices().len() + board.occupied_count(), CELL_COUNT);
        assert!(board.empty_indices().is_empty());
    }

    #[test]
    fn test_from_pattern() {
        let board = Board::from_pattern("XO.......").expect("nine cells");
        assert_eq!(board.get(0), Cell::Occupied(Mark::X));
        assert_eq!(board.get(1), Cell::Occupied(Mark::O));
        assert!(board.is_empty(2));
        assert!(Board::from_pattern("XO").is_none());
    }

    #[test]
    fn test_display_numbers_empty_cells() {
        let board = Board::from_pattern("X...O....").expect("nine cells");
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }
}
