//! Bingo board and the two paths that produce one
//!
//! A board is a fixed arrangement of the numbers 1..=25 on a 5x5 grid. It
//! is either shuffled in one go or filled by hand one number at a time;
//! both paths yield a validated permutation before play can start.

use crate::errors::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Cells on a board
pub const BOARD_CELLS: usize = 25;

/// Largest callable number
pub const MAX_NUMBER: u8 = 25;

/// A player's personal 5x5 arrangement of 1..=25, immutable once play begins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board([u8; BOARD_CELLS]);

impl Board {
    /// Produce a uniformly random permutation of 1..=25 (Fisher-Yates)
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut cells = [0u8; BOARD_CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = (i + 1) as u8;
        }
        for i in (1..BOARD_CELLS).rev() {
            let j = rng.gen_range(0..=i);
            cells.swap(i, j);
        }
        Self(cells)
    }

    /// Build a board from explicit cell values, validating the permutation
    /// invariant: exactly the numbers 1..=25, each exactly once.
    pub fn from_cells(cells: [u8; BOARD_CELLS]) -> Result<Self, GameError> {
        let mut seen = [false; BOARD_CELLS];
        for &n in &cells {
            if n == 0 || n > MAX_NUMBER {
                return Err(GameError::MalformedBoard);
            }
            let slot = (n - 1) as usize;
            if seen[slot] {
                return Err(GameError::MalformedBoard);
            }
            seen[slot] = true;
        }
        Ok(Self(cells))
    }

    pub fn cells(&self) -> &[u8; BOARD_CELLS] {
        &self.0
    }

    /// Value at a cell index (row-major)
    pub fn value_at(&self, index: usize) -> u8 {
        self.0[index]
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.contains(&number)
    }
}

/// Outcome of touching a cell during manual setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupEvent {
    /// The cell received the next number in sequence
    Filled(u8),
    /// First cell of a swap was selected
    SwapSelected(usize),
    /// Two cells exchanged values and swap mode ended
    Swapped(usize, usize),
    /// The touch had no effect (occupied cell, empty swap target, board done)
    Ignored,
}

/// Manual board setup: numbers 1,2,3,...,25 are placed in increasing order
/// into cells of the player's choosing, with undo and swap support.
#[derive(Debug, Clone)]
pub struct BoardSetup {
    grid: [Option<u8>; BOARD_CELLS],
    next_fill: u8,
    swap_mode: bool,
    swap_selection: Option<usize>,
}

impl BoardSetup {
    pub fn new() -> Self {
        Self {
            grid: [None; BOARD_CELLS],
            next_fill: 1,
            swap_mode: false,
            swap_selection: None,
        }
    }

    /// Number the next touched empty cell will receive, if any remain
    pub fn next_fill(&self) -> Option<u8> {
        (self.next_fill <= MAX_NUMBER).then_some(self.next_fill)
    }

    pub fn filled_count(&self) -> usize {
        self.grid.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.next_fill > MAX_NUMBER
    }

    pub fn swap_mode(&self) -> bool {
        self.swap_mode
    }

    pub fn grid(&self) -> &[Option<u8>; BOARD_CELLS] {
        &self.grid
    }

    /// Handle a cell touch: a swap step when swap mode is active, otherwise
    /// a fill of the next number in sequence.
    pub fn touch(&mut self, index: usize) -> SetupEvent {
        if index >= BOARD_CELLS {
            return SetupEvent::Ignored;
        }

        if self.swap_mode {
            // Only filled cells participate in a swap
            if self.grid[index].is_none() {
                return SetupEvent::Ignored;
            }
            match self.swap_selection {
                None => {
                    self.swap_selection = Some(index);
                    SetupEvent::SwapSelected(index)
                }
                Some(first) => {
                    self.grid.swap(first, index);
                    self.swap_selection = None;
                    self.swap_mode = false;
                    SetupEvent::Swapped(first, index)
                }
            }
        } else if self.grid[index].is_none() && self.next_fill <= MAX_NUMBER {
            let n = self.next_fill;
            self.grid[index] = Some(n);
            self.next_fill += 1;
            SetupEvent::Filled(n)
        } else {
            SetupEvent::Ignored
        }
    }

    /// Remove the most recently placed number, returning it. Any pending
    /// swap selection is discarded so it cannot point at the emptied cell.
    pub fn undo(&mut self) -> Option<u8> {
        if self.next_fill <= 1 {
            return None;
        }
        self.next_fill -= 1;
        let target = self.next_fill;
        if let Some(cell) = self.grid.iter_mut().find(|c| **c == Some(target)) {
            *cell = None;
        }
        self.swap_selection = None;
        Some(target)
    }

    /// Toggle swap mode; any half-finished selection is discarded
    pub fn toggle_swap(&mut self) -> bool {
        self.swap_mode = !self.swap_mode;
        self.swap_selection = None;
        self.swap_mode
    }

    /// Replace the whole grid with a random board
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        let board = Board::random(rng);
        for (cell, &n) in self.grid.iter_mut().zip(board.cells().iter()) {
            *cell = Some(n);
        }
        self.next_fill = MAX_NUMBER + 1;
        self.swap_mode = false;
        self.swap_selection = None;
    }

    /// Finalize the setup into an immutable board
    pub fn finish(&self) -> Result<Board, GameError> {
        let filled = self.filled_count();
        if filled < BOARD_CELLS {
            return Err(GameError::IncompleteBoard { filled });
        }
        let mut cells = [0u8; BOARD_CELLS];
        for (slot, cell) in cells.iter_mut().zip(self.grid.iter()) {
            *slot = cell.expect("all cells filled");
        }
        Board::from_cells(cells)
    }
}

impl Default for BoardSetup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_permutation(board: &Board) {
        let mut seen = [false; BOARD_CELLS];
        for &n in board.cells() {
            assert!(n >= 1 && n <= MAX_NUMBER, "value {} out of range", n);
            assert!(!seen[(n - 1) as usize], "duplicate value {}", n);
            seen[(n - 1) as usize] = true;
        }
    }

    #[test]
    fn test_random_board_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_permutation(&Board::random(&mut rng));
        }
    }

    #[test]
    fn test_from_cells_rejects_duplicates() {
        let mut cells = [0u8; BOARD_CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = (i + 1) as u8;
        }
        cells[3] = 5; // duplicate of cells[4]
        assert_eq!(Board::from_cells(cells), Err(GameError::MalformedBoard));
    }

    #[test]
    fn test_manual_fill_in_order() {
        let mut setup = BoardSetup::new();
        assert_eq!(setup.touch(10), SetupEvent::Filled(1));
        assert_eq!(setup.touch(0), SetupEvent::Filled(2));
        // Occupied cell is ignored
        assert_eq!(setup.touch(10), SetupEvent::Ignored);
        assert_eq!(setup.next_fill(), Some(3));
    }

    #[test]
    fn test_undo_removes_last_fill() {
        let mut setup = BoardSetup::new();
        setup.touch(4);
        setup.touch(9);
        assert_eq!(setup.undo(), Some(2));
        assert_eq!(setup.grid()[9], None);
        assert_eq!(setup.grid()[4], Some(1));
        assert_eq!(setup.next_fill(), Some(2));
    }

    #[test]
    fn test_undo_discards_swap_selection() {
        let mut setup = BoardSetup::new();
        setup.touch(0);
        setup.touch(1);
        setup.toggle_swap();
        assert_eq!(setup.touch(1), SetupEvent::SwapSelected(1));

        // The selected cell is the one the undo empties
        assert_eq!(setup.undo(), Some(2));
        assert_eq!(setup.grid()[1], None);

        // The next swap touch starts a fresh selection instead of moving a
        // value into the emptied cell
        assert_eq!(setup.touch(0), SetupEvent::SwapSelected(0));
        assert_eq!(setup.grid()[0], Some(1));
    }

    #[test]
    fn test_undo_on_empty_board() {
        let mut setup = BoardSetup::new();
        assert_eq!(setup.undo(), None);
    }

    #[test]
    fn test_swap_exchanges_exactly_two_cells() {
        let mut setup = BoardSetup::new();
        let mut rng = StdRng::seed_from_u64(11);
        setup.randomize(&mut rng);
        let before = *setup.grid();

        assert!(setup.toggle_swap());
        assert_eq!(setup.touch(2), SetupEvent::SwapSelected(2));
        assert_eq!(setup.touch(20), SetupEvent::Swapped(2, 20));

        let after = setup.grid();
        assert_eq!(after[2], before[20]);
        assert_eq!(after[20], before[2]);
        for i in 0..BOARD_CELLS {
            if i != 2 && i != 20 {
                assert_eq!(after[i], before[i]);
            }
        }
        // Swap mode exits after the exchange
        assert!(!setup.swap_mode());
    }

    #[test]
    fn test_swap_ignores_empty_cells() {
        let mut setup = BoardSetup::new();
        setup.touch(0);
        setup.toggle_swap();
        assert_eq!(setup.touch(5), SetupEvent::Ignored);
    }

    #[test]
    fn test_finish_requires_full_board() {
        let mut setup = BoardSetup::new();
        setup.touch(0);
        match setup.finish() {
            Err(GameError::IncompleteBoard { filled }) => assert_eq!(filled, 1),
            other => panic!("expected IncompleteBoard, got {:?}", other),
        }
    }

    #[test]
    fn test_manual_path_yields_permutation() {
        let mut setup = BoardSetup::new();
        for i in 0..BOARD_CELLS {
            setup.touch(BOARD_CELLS - 1 - i);
        }
        assert!(setup.is_complete());
        let board = setup.finish().expect("complete board");
        assert_permutation(&board);
        assert_eq!(board.value_at(24), 1);
    }
}
