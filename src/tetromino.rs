//! Piece catalog: the seven tetromino kinds, their shapes and colours.

/// Largest side of any tetromino shape matrix.
pub const SHAPE_CAPACITY: usize = 4;

/// Display colour as (r, g, b).
pub type Rgb = (u8, u8, u8);

/// Tetromino kinds (I, O, T, L, J, S, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::L, Self::J, Self::S, Self::Z];

    /// Canonical (spawn) rotation, rows top to bottom.
    fn rows(self) -> &'static [&'static str] {
        match self {
            Self::I => &["####"],
            Self::O => &["##", "##"],
            Self::T => &[".#.", "###"],
            Self::L => &["#.", "#.", "##"],
            Self::J => &[".#", ".#", "##"],
            Self::S => &[".##", "##."],
            Self::Z => &["##.", ".##"],
        }
    }

    /// Fresh copy of the canonical shape; each piece owns its own.
    pub fn shape(self) -> Shape {
        let rows = self.rows();
        let mut shape = Shape::empty(rows[0].len(), rows.len());
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.bytes().enumerate() {
                shape.cells[r][c] = ch == b'#';
            }
        }
        shape
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::I => (0, 255, 255),
            Self::O => (255, 255, 0),
            Self::T => (128, 0, 128),
            Self::L => (255, 165, 0),
            Self::J => (0, 0, 255),
            Self::S => (0, 255, 0),
            Self::Z => (255, 0, 0),
        }
    }

    /// Index into `ALL`, used for palette lookups.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Small fixed-capacity boolean grid. `cells[row][col]`, only the
/// `height` x `width` top-left corner is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    cells: [[bool; SHAPE_CAPACITY]; SHAPE_CAPACITY],
    width: usize,
    height: usize,
}

impl Shape {
    fn empty(width: usize, height: usize) -> Self {
        Self {
            cells: [[false; SHAPE_CAPACITY]; SHAPE_CAPACITY],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row][col]
    }

    /// (row, col) of every filled cell, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |r| {
            (0..self.width).filter_map(move |c| self.cells[r][c].then_some((r, c)))
        })
    }

    /// Clockwise quarter turn: new row i is old column i read bottom to top.
    pub fn rotated_cw(&self) -> Self {
        let mut out = Self::empty(self.height, self.width);
        for i in 0..self.width {
            for j in 0..self.height {
                out.cells[i][j] = self.cells[self.height - 1 - j][i];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in TetrominoKind::ALL {
            assert_eq!(kind.shape().filled_cells().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_shape_dimensions() {
        let i = TetrominoKind::I.shape();
        assert_eq!((i.width(), i.height()), (4, 1));
        let l = TetrominoKind::L.shape();
        assert_eq!((l.width(), l.height()), (2, 3));
    }

    #[test]
    fn test_rotate_t_clockwise() {
        // .#.      #.
        // ###  ->  ##
        //          #.
        let r = TetrominoKind::T.shape().rotated_cw();
        assert_eq!((r.width(), r.height()), (2, 3));
        let cells: Vec<_> = r.filled_cells().collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (1, 1), (2, 0)]);
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in TetrominoKind::ALL {
            let s = kind.shape();
            let back = s.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(s, back);
        }
    }

    #[test]
    fn test_shapes_are_independent_copies() {
        let mut a = TetrominoKind::S.shape();
        let b = TetrominoKind::S.shape();
        a = a.rotated_cw();
        assert_ne!(a, b);
        assert_eq!(b, TetrominoKind::S.shape());
    }
}
