//! The falling piece: shape, position, collision and rotation.

use crate::board::Board;
use crate::tetromino::{Shape, TetrominoKind};

/// Current piece. `x`/`y` locate the top-left of the shape matrix on the
/// board; `y` may be negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: TetrominoKind,
    shape: Shape,
    x: i32,
    y: i32,
}

impl Piece {
    /// New piece of `kind`, centred horizontally on the top row.
    pub fn spawn(kind: TetrominoKind, board_width: usize) -> Self {
        let mut piece = Self {
            kind,
            shape: kind.shape(),
            x: 0,
            y: 0,
        };
        piece.reset_to_spawn(board_width);
        piece
    }

    /// Re-centre using the current shape's width and return to the top row.
    pub fn reset_to_spawn(&mut self, board_width: usize) {
        let x = (board_width / 2) as i32 - (self.shape.width() / 2) as i32;
        self.set_position(x, 0);
    }

    #[inline]
    pub fn kind(&self) -> TetrominoKind {
        self.kind
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Absolute board coordinates of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(|(r, c)| (self.x + c as i32, self.y + r as i32))
    }

    /// True if translating by (dx, dy) would leave the board sideways, pass
    /// the floor, or overlap a locked cell. Rows above the board are free.
    pub fn collides(&self, board: &Board, dx: i32, dy: i32) -> bool {
        Self::shape_collides(&self.shape, self.x + dx, self.y + dy, board)
    }

    fn shape_collides(shape: &Shape, x: i32, y: i32, board: &Board) -> bool {
        let (w, h) = (board.width() as i32, board.height() as i32);
        shape.filled_cells().any(|(r, c)| {
            let nx = x + c as i32;
            let ny = y + r as i32;
            if nx < 0 || nx >= w || ny >= h {
                return true;
            }
            ny >= 0 && board.is_occupied(nx as usize, ny as usize)
        })
    }

    /// Clockwise rotation in place. No wall kicks: a blocked rotation is
    /// dropped and the piece is left untouched. Returns whether it rotated.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let candidate = self.shape.rotated_cw();
        if Self::shape_collides(&candidate, self.x, self.y, board) {
            return false;
        }
        self.shape = candidate;
        true
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}
