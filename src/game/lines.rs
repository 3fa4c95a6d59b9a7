//! Line matching over the 12 fixed winning patterns
//!
//! Five rows, five columns and the two diagonals. Evaluation is a full
//! recomputation on every call so the result stays correct no matter what
//! order the ledger was mutated in.

use crate::game::board::Board;
use std::collections::HashSet;

/// The 12 winning 5-cell arrangements, as board indices (row-major)
pub const LINE_PATTERNS: [[usize; 5]; 12] = [
    // Rows
    [0, 1, 2, 3, 4],
    [5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14],
    [15, 16, 17, 18, 19],
    [20, 21, 22, 23, 24],
    // Columns
    [0, 5, 10, 15, 20],
    [1, 6, 11, 16, 21],
    [2, 7, 12, 17, 22],
    [3, 8, 13, 18, 23],
    [4, 9, 14, 19, 24],
    // Diagonals
    [0, 6, 12, 18, 24],
    [4, 8, 12, 16, 20],
];

/// Result of evaluating a board against the call ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    /// Count of currently complete patterns
    pub total_lines: usize,
    /// Pattern indices complete now and not yet in the completed set
    pub newly_completed: Vec<usize>,
}

/// Evaluate every pattern against the board and called numbers.
///
/// A pattern is complete iff all 5 of its board values have been called.
/// `completed` is the set of pattern indices already reported; indices
/// missing from it show up in `newly_completed` so a highlight fires
/// exactly once per pattern per session. The caller owns `completed` and
/// records the new indices itself.
pub fn evaluate(board: &Board, called: &HashSet<u8>, completed: &HashSet<usize>) -> LineReport {
    let mut total_lines = 0;
    let mut newly_completed = Vec::new();

    for (index, pattern) in LINE_PATTERNS.iter().enumerate() {
        let complete = pattern
            .iter()
            .all(|&cell| called.contains(&board.value_at(cell)));
        if complete {
            total_lines += 1;
            if !completed.contains(&index) {
                newly_completed.push(index);
            }
        }
    }

    LineReport {
        total_lines,
        newly_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::BOARD_CELLS;

    fn row_major_board() -> Board {
        let mut cells = [0u8; BOARD_CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = (i + 1) as u8;
        }
        Board::from_cells(cells).unwrap()
    }

    #[test]
    fn test_first_row_completes() {
        let board = row_major_board();
        let called: HashSet<u8> = [1, 2, 3, 4, 5].into_iter().collect();
        let completed = HashSet::new();

        let report = evaluate(&board, &called, &completed);
        assert_eq!(report.total_lines, 1);
        assert_eq!(report.newly_completed, vec![0]);
    }

    #[test]
    fn test_already_completed_not_reported_again() {
        let board = row_major_board();
        let called: HashSet<u8> = [1, 2, 3, 4, 5].into_iter().collect();
        let completed: HashSet<usize> = [0].into_iter().collect();

        let report = evaluate(&board, &called, &completed);
        assert_eq!(report.total_lines, 1);
        assert!(report.newly_completed.is_empty());
    }

    #[test]
    fn test_partial_line_does_not_count() {
        let board = row_major_board();
        let called: HashSet<u8> = [1, 2, 3, 4].into_iter().collect();

        let report = evaluate(&board, &called, &HashSet::new());
        assert_eq!(report.total_lines, 0);
        assert!(report.newly_completed.is_empty());
    }

    #[test]
    fn test_diagonal_on_row_major_board() {
        let board = row_major_board();
        // Main diagonal values on a row-major board
        let called: HashSet<u8> = [1, 7, 13, 19, 25].into_iter().collect();

        let report = evaluate(&board, &called, &HashSet::new());
        assert_eq!(report.total_lines, 1);
        assert_eq!(report.newly_completed, vec![10]);
    }

    #[test]
    fn test_all_numbers_complete_all_patterns() {
        let board = row_major_board();
        let called: HashSet<u8> = (1..=25).collect();

        let report = evaluate(&board, &called, &HashSet::new());
        assert_eq!(report.total_lines, 12);
        assert_eq!(report.newly_completed.len(), 12);
    }

    #[test]
    fn test_pattern_table_shape() {
        for pattern in &LINE_PATTERNS {
            assert_eq!(pattern.len(), 5);
            for &cell in pattern {
                assert!(cell < BOARD_CELLS);
            }
        }
    }
}
