//! Tetromino catalog - canonical shapes and matrix rotation
//!
//! Shapes are small occupancy matrices (at most 4x4). A piece has no stored rotation
//! state: rotating replaces its matrix, so the matrix itself is the orientation.
//! The exact canonical matrices matter because they decide which cells a piece
//! covers in each of its four orientations.

use crate::rng::Randomizer;
use crate::types::{PieceKind, SHAPE_MAX};

/// Occupancy matrix of a piece with a logical `rows x cols` size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    cells: [[bool; SHAPE_MAX]; SHAPE_MAX],
    rows: u8,
    cols: u8,
}

impl Shape {
    /// Build from a `0`/`1` grid. Only the top-left `rows x cols` block is used.
    const fn from_bits(rows: u8, cols: u8, bits: [[u8; SHAPE_MAX]; SHAPE_MAX]) -> Self {
        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        let mut r = 0;
        while r < rows as usize {
            let mut c = 0;
            while c < cols as usize {
                cells[r][c] = bits[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self { cells, rows, cols }
    }

    /// Build from rows of `0`/`1` values.
    ///
    /// Returns `None` when the input is empty, ragged, or larger than 4x4.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_core::Shape;
    ///
    /// let bar = Shape::from_rows(&[&[1, 1, 1]]).unwrap();
    /// assert_eq!((bar.rows(), bar.cols()), (1, 3));
    /// assert!(Shape::from_rows(&[&[1, 1], &[1]]).is_none());
    /// ```
    pub fn from_rows(rows: &[&[u8]]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if height > SHAPE_MAX || width == 0 || width > SHAPE_MAX {
            return None;
        }
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }

        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][c] = v != 0;
            }
        }
        Some(Self {
            cells,
            rows: height as u8,
            cols: width as u8,
        })
    }

    /// Number of rows in the matrix
    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    /// Number of columns in the matrix
    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Whether the cell at (`row`, `col`) is occupied. Out-of-range cells are empty.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.cells[row][col]
    }

    /// Occupied cells as `(dx, dy)` offsets from the top-left corner
    pub fn occupied(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.rows()).flat_map(move |r| {
            (0..self.cols())
                .filter(move |&c| self.cells[r][c])
                .map(move |c| (c as i8, r as i8))
        })
    }

    /// Number of occupied cells
    pub fn count(&self) -> usize {
        self.occupied().count()
    }
}

const I_SHAPE: Shape = Shape::from_bits(
    4,
    4,
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
);

const J_SHAPE: Shape = Shape::from_bits(
    3,
    3,
    [[0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
);

const L_SHAPE: Shape = Shape::from_bits(
    3,
    3,
    [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
);

const O_SHAPE: Shape = Shape::from_bits(
    2,
    2,
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const S_SHAPE: Shape = Shape::from_bits(
    3,
    3,
    [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const T_SHAPE: Shape = Shape::from_bits(
    3,
    3,
    [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

const Z_SHAPE: Shape = Shape::from_bits(
    3,
    3,
    [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

/// Canonical spawn matrix for a piece kind (returned by value)
pub fn canonical_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::Z => Z_SHAPE,
    }
}

/// Pick one of the seven kinds uniformly and return it with its own copy of the shape
pub fn random_tetromino<R: Randomizer + ?Sized>(rng: &mut R) -> (PieceKind, Shape) {
    let index = rng.pick(PieceKind::ALL.len()) % PieceKind::ALL.len();
    let kind = PieceKind::ALL[index];
    (kind, canonical_shape(kind))
}

/// Rotate 90° clockwise.
///
/// An N x M matrix becomes M x N: output row `i` is input column `i` read bottom to top.
pub fn rotate(shape: &Shape) -> Shape {
    let (rows, cols) = (shape.rows(), shape.cols());
    let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
    for (i, out_row) in cells.iter_mut().enumerate().take(cols) {
        for (j, out) in out_row.iter_mut().enumerate().take(rows) {
            *out = shape.cells[rows - 1 - j][i];
        }
    }
    Shape {
        cells,
        rows: shape.cols,
        cols: shape.rows,
    }
}

/// Rotate 90° counter-clockwise, the exact inverse of [`rotate`].
///
/// Output row `i` is input column `M - 1 - i` read top to bottom.
pub fn unrotate(shape: &Shape) -> Shape {
    let (rows, cols) = (shape.rows(), shape.cols());
    let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
    for (i, out_row) in cells.iter_mut().enumerate().take(cols) {
        for (j, out) in out_row.iter_mut().enumerate().take(rows) {
            *out = shape.cells[j][cols - 1 - i];
        }
    }
    Shape {
        cells,
        rows: shape.cols,
        cols: shape.rows,
    }
}
