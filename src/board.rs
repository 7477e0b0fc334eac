//! Board: fixed grid of locked cells, locking and line clears.

use crate::piece::Piece;
use crate::tetromino::TetrominoKind;
use std::collections::VecDeque;

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// Single cell: empty, or locked by a piece of the given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoKind),
}

impl Cell {
    #[inline]
    pub fn is_filled(self) -> bool {
        matches!(self, Self::Filled(_))
    }
}

/// Result of writing a piece into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    Placed,
    /// At least one filled cell sat above row 0; the others were still written.
    AboveBoard,
}

/// Playfield: `rows[0]` is the top row. Dimensions never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: VecDeque<[Cell; BOARD_WIDTH]>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: (0..BOARD_HEIGHT).map(|_| [Cell::Empty; BOARD_WIDTH]).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(Cell::is_filled)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    /// Write the piece's cells at its absolute position.
    pub fn lock(&mut self, piece: &Piece) -> LockOutcome {
        let mut outcome = LockOutcome::Placed;
        let (px, py) = piece.position();
        let cell = Cell::Filled(piece.kind());
        for (r, c) in piece.shape().filled_cells() {
            let x = px + c as i32;
            let y = py + r as i32;
            if y < 0 {
                outcome = LockOutcome::AboveBoard;
                continue;
            }
            if x >= 0 {
                self.set(x as usize, y as usize, cell);
            }
        }
        outcome
    }

    /// Remove every full row and insert as many empty rows at the top.
    /// Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().any(|c| !c.is_filled()));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.push_front([Cell::Empty; BOARD_WIDTH]);
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize, kind: TetrominoKind) {
        for x in 0..BOARD_WIDTH {
            board.set(x, y, Cell::Filled(kind));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.height(), BOARD_HEIGHT);
        assert_eq!(board.width(), BOARD_WIDTH);
        assert!(board.rows().all(|row| row.iter().all(|c| *c == Cell::Empty)));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(BOARD_WIDTH, 0), None);
        assert_eq!(board.get(0, BOARD_HEIGHT), None);
    }

    #[test]
    fn test_clear_lines_on_empty_board() {
        let mut board = Board::new();
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_lines_shifts_rows_down() {
        let mut board = Board::new();
        fill_row(&mut board, 19, TetrominoKind::I);
        fill_row(&mut board, 17, TetrominoKind::I);
        board.set(3, 18, Cell::Filled(TetrominoKind::T));
        board.set(4, 16, Cell::Filled(TetrominoKind::Z));

        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.height(), BOARD_HEIGHT);
        // Row 18 drops to the bottom, row 16 drops two rows.
        assert_eq!(board.get(3, 19), Some(Cell::Filled(TetrominoKind::T)));
        assert_eq!(board.get(4, 18), Some(Cell::Filled(TetrominoKind::Z)));
        assert!(!board.is_occupied(0, 19));
        assert!(board.rows().take(2).all(|row| row.iter().all(|c| !c.is_filled())));
    }

    #[test]
    fn test_row_count_preserved_across_clears() {
        let mut board = Board::new();
        for round in 0..5 {
            for y in 0..=round {
                fill_row(&mut board, BOARD_HEIGHT - 1 - y, TetrominoKind::O);
            }
            board.clear_lines();
            assert_eq!(board.height(), BOARD_HEIGHT);
        }
    }

    #[test]
    fn test_lock_writes_kind() {
        let mut board = Board::new();
        let piece = Piece::spawn(TetrominoKind::O, BOARD_WIDTH);
        assert_eq!(board.lock(&piece), LockOutcome::Placed);
        let (x, _) = piece.position();
        let x = x as usize;
        for (cx, cy) in [(x, 0), (x + 1, 0), (x, 1), (x + 1, 1)] {
            assert_eq!(board.get(cx, cy), Some(Cell::Filled(TetrominoKind::O)));
        }
    }

    #[test]
    fn test_lock_above_board_writes_visible_cells() {
        let mut board = Board::new();
        let mut piece = Piece::spawn(TetrominoKind::O, BOARD_WIDTH);
        piece.set_position(4, -1);
        assert_eq!(board.lock(&piece), LockOutcome::AboveBoard);
        assert!(board.is_occupied(4, 0));
        assert!(board.is_occupied(5, 0));
        assert!(!board.is_occupied(4, 1));
    }
}
