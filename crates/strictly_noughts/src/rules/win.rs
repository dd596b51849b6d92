//! Win detection.

use crate::{Board, Cell, Mark};

/// Three cell indices forming a line.
pub type WinLine = [usize; 3];

/// The eight winning lines.
pub const WIN_LINES: [WinLine; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns true if `mark` occupies all three cells of some line.
pub fn has_line(board: &Board, mark: Mark) -> bool {
    let target = Cell::Occupied(mark);
    WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&index| board.get(index) == target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_line_on_empty_board() {
        let board = Board::new();
        assert!(!has_line(&board, Mark::X));
        assert!(!has_line(&board, Mark::O));
    }

    #[test]
    fn test_every_line_wins_for_each_mark() {
        for mark in [Mark::X, Mark::O] {
            for line in WIN_LINES {
                let mut board = Board::new();
                for index in line {
                    board.place(index, mark);
                }
                assert!(has_line(&board, mark), "line {line:?} for {mark}");
                assert!(!has_line(&board, mark.opponent()));
            }
        }
    }

    #[test]
    fn test_blocked_line_is_not_a_win() {
        for line in WIN_LINES {
            let mut board = Board::new();
            board.place(line[0], Mark::X);
            board.place(line[1], Mark::X);
            board.place(line[2], Mark::O);
            assert!(!has_line(&board, Mark::X), "line {line:?}");
        }
    }

    #[test]
    fn test_exactly_eight_lines_among_all_triples() {
        // Brute force over every 3-cell set: a board holding only those
        // cells wins iff the set is one of the eight lines.
        let mut wins = 0;
        for a in 0..9 {
            for b in (a + 1)..9 {
                for c in (b + 1)..9 {
                    let mut board = Board::new();
                    board.place(a, Mark::O);
                    board.place(b, Mark::O);
                    board.place(c, Mark::O);
                    let is_line = WIN_LINES.contains(&[a, b, c]);
                    assert_eq!(has_line(&board, Mark::O), is_line, "{a},{b},{c}");
                    if is_line {
                        wins += 1;
                    }
                }
            }
        }
        assert_eq!(wins, 8);
    }
}
