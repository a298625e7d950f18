//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or remembers the kind of piece
//! that filled it. Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Vertical and horizontal legality are separate checks on purpose: the session
//! recovers from a wall hit differently than from a collision (see rotation).

use arrayvec::ArrayVec;

use crate::tetromino::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Total number of cells on the board
const BOARD_SIZE: usize = WIDTH * HEIGHT;

/// Row indices removed by one clear, at most one per board row
pub type ClearedRows = ArrayVec<usize, HEIGHT>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Cells of one row, left to right. `y` must be a board row.
    pub(crate) fn row(&self, y: usize) -> &[Cell] {
        let start = y * WIDTH;
        &self.cells[start..start + WIDTH]
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(WIDTH)
    }

    /// True if any occupied cell of `shape` at (x, y) lands on a filled cell or on
    /// a row at or past the bottom edge.
    ///
    /// Columns outside the grid are not checked here; see [`Board::check_outside_walls`].
    pub fn check_collision(&self, shape: &Shape, x: i8, y: i8) -> bool {
        shape.occupied().any(|(dx, dy)| {
            let (px, py) = (x + dx, y + dy);
            py >= BOARD_HEIGHT as i8 || self.is_occupied(px, py)
        })
    }

    /// True if any occupied cell of `shape` at (x, y) lies left of column 0 or right of column 9
    pub fn check_outside_walls(&self, shape: &Shape, x: i8, _y: i8) -> bool {
        shape.occupied().any(|(dx, _)| {
            let px = x + dx;
            px < 0 || px >= BOARD_WIDTH as i8
        })
    }

    /// Write `kind` into every cell covered by `shape` at (x, y).
    ///
    /// The placement must already be legal. Cells outside the grid are skipped.
    pub fn merge(&mut self, shape: &Shape, x: i8, y: i8, kind: PieceKind) {
        for (dx, dy) in shape.occupied() {
            self.set(x + dx, y + dy, Some(kind));
        }
    }

    /// Remove full rows and return how many were removed
    pub fn clear_rows(&mut self) -> usize {
        self.clear_full_rows().len()
    }

    /// Remove full rows, compacting the rest downward, and return the removed row indices
    /// (bottom to top, as they were before the clear).
    ///
    /// The scan walks from row 19 up to row 1. Row 0 as it stands when the scan reaches it
    /// is never examined, so a full top row is only removed when a clear below it has
    /// already shifted it down.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let mut write_y = HEIGHT;

        // Scan from bottom to top
        for read_y in (0..HEIGHT).rev() {
            let eligible = read_y > 0 || !cleared_rows.is_empty();
            if eligible && self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                // This row survives, move it down to the write position
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * WIDTH;
                    let dst_start = write_y * WIDTH;
                    self.cells
                        .copy_within(src_start..src_start + WIDTH, dst_start);
                }
            }
        }

        // Fresh empty rows enter at the top
        for cell in &mut self.cells[..write_y * WIDTH] {
            *cell = None;
        }

        cleared_rows
    }

    /// True if any cell of row 0 is filled
    pub fn check_top_row_occupied(&self) -> bool {
        self.row(0).iter().any(|cell| cell.is_some())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of filled cells
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Clear the entire board
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Write the board as kind codes (0 = empty, see [`PieceKind::code`])
    pub fn write_u8_grid(&self, out: &mut [[u8; WIDTH]; HEIGHT]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s.map_or(0, |kind| kind.code());
            }
        }
    }

    /// Fill a whole row with `kind` (test helper)
    #[cfg(test)]
    pub(crate) fn fill_row(&mut self, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            self.set(x, y, Some(kind));
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
