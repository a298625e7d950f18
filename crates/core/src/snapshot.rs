//! Plain-data copy of session state for renderers

use crate::session::Tetromino;
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Cells occupied by every tetromino
pub const PIECE_CELLS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    /// Absolute board coordinates of the occupied cells
    pub cells: [(i8, i8); PIECE_CELLS],
}

impl From<&Tetromino> for ActiveSnapshot {
    fn from(value: &Tetromino) -> Self {
        let mut cells = [(value.x, value.y); PIECE_CELLS];
        for (slot, cell) in cells.iter_mut().zip(value.cells()) {
            *slot = cell;
        }
        Self {
            kind: value.kind,
            x: value.x,
            y: value.y,
            cells,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Kind codes, 0 = empty
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub level: u32,
    pub paused: bool,
    pub piece_id: u32,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: None,
            level: 1,
            paused: false,
            piece_id: 0,
        }
    }
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        !self.paused
    }

    /// Filled board cells plus the active piece, as a text grid (`.` empty, kind letter otherwise)
    pub fn render_text(&self) -> String {
        let mut grid = [[b'.'; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for (dst, src) in grid.iter_mut().zip(self.board.iter()) {
            for (d, &code) in dst.iter_mut().zip(src.iter()) {
                if let Some(kind) = PieceKind::from_code(code) {
                    *d = kind.as_str().as_bytes()[0];
                }
            }
        }
        if let Some(active) = self.active {
            let letter = active.kind.as_str().as_bytes()[0].to_ascii_lowercase();
            for (x, y) in active.cells {
                if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                    grid[y as usize][x as usize] = letter;
                }
            }
        }

        let mut out = String::with_capacity(grid.len() * (BOARD_WIDTH as usize + 1));
        for row in grid {
            out.extend(row.iter().map(|&b| b as char));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_cells_are_absolute() {
        let piece = Tetromino {
            x: 2,
            y: 3,
            ..Tetromino::new(PieceKind::O)
        };
        let snap = ActiveSnapshot::from(&piece);
        assert_eq!(snap.cells, [(2, 3), (3, 3), (2, 4), (3, 4)]);
    }

    #[test]
    fn test_render_text_marks_active_lowercase() {
        let mut snap = GameSnapshot::default();
        snap.board[19][0] = PieceKind::I.code();
        snap.active = Some(ActiveSnapshot::from(&Tetromino::new(PieceKind::O)));

        let text = snap.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 20);
        assert_eq!(lines[0], "....oo....");
        assert_eq!(lines[19], "I.........");
    }

    #[test]
    fn test_clear_resets() {
        let mut snap = GameSnapshot {
            paused: true,
            level: 7,
            ..GameSnapshot::default()
        };
        snap.clear();
        assert_eq!(snap, GameSnapshot::default());
        assert!(snap.playable());
    }
}
