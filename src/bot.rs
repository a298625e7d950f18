//! Greedy placement bot for headless runs
//!
//! For the active piece the bot tries every rotation and column on a copy of the board,
//! drops the piece straight down, and scores the resulting board. It then plays the best
//! placement through the ordinary session operations, so it sees exactly the rules a
//! human player does. Reachability is not searched: a placement behind an overhang may
//! end up somewhere else.

use crate::core::tetromino::rotate;
use crate::core::{Board, Randomizer, Session, Tetromino};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

const CLEAR_WEIGHT: i32 = 100;
const HOLE_WEIGHT: i32 = 35;
const HEIGHT_WEIGHT: i32 = 5;
const BUMPINESS_WEIGHT: i32 = 2;

/// A candidate final position for the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Clockwise rotations applied before shifting
    pub rotations: u8,
    /// Target column of the shape's top-left corner
    pub x: i8,
    pub score: i32,
}

/// Column heights of a board (0 for an empty column)
pub fn column_heights(board: &Board) -> [i32; BOARD_WIDTH as usize] {
    let mut heights = [0; BOARD_WIDTH as usize];
    for (x, height) in heights.iter_mut().enumerate() {
        if let Some(top) = (0..BOARD_HEIGHT as i8).find(|&y| board.is_occupied(x as i8, y)) {
            *height = i32::from(BOARD_HEIGHT) - i32::from(top);
        }
    }
    heights
}

/// Empty cells with a filled cell somewhere above them
pub fn count_holes(board: &Board) -> i32 {
    let mut holes = 0;
    for x in 0..BOARD_WIDTH as i8 {
        let mut covered = false;
        for y in 0..BOARD_HEIGHT as i8 {
            if board.is_occupied(x, y) {
                covered = true;
            } else if covered {
                holes += 1;
            }
        }
    }
    holes
}

/// Heuristic value of a board after a placement (higher is better)
pub fn evaluate(board: &Board, cleared: usize) -> i32 {
    let heights = column_heights(board);
    let aggregate: i32 = heights.iter().sum();
    let bumpiness: i32 = heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum();

    cleared as i32 * CLEAR_WEIGHT
        - count_holes(board) * HOLE_WEIGHT
        - aggregate * HEIGHT_WEIGHT
        - bumpiness * BUMPINESS_WEIGHT
}

/// Best placement for `piece` on `board`, or `None` if no drop position is legal
pub fn best_placement(board: &Board, piece: &Tetromino) -> Option<Placement> {
    let mut best: Option<Placement> = None;
    let mut shape = piece.shape;

    for rotations in 0..4u8 {
        for x in -3..BOARD_WIDTH as i8 {
            let candidate = Tetromino {
                shape,
                x,
                ..*piece
            };
            if candidate.is_blocked(board) {
                continue;
            }

            let mut y = candidate.y;
            while !board.check_collision(&shape, x, y + 1) {
                y += 1;
            }

            let mut after = board.clone();
            after.merge(&shape, x, y, piece.kind);
            let cleared = after.clear_rows();
            let score = evaluate(&after, cleared);

            if best.map_or(true, |b| score > b.score) {
                best = Some(Placement {
                    rotations,
                    x,
                    score,
                });
            }
        }
        shape = rotate(&shape);
    }

    best
}

/// Place the active piece with the best placement found. Returns false if the session
/// is paused or no placement exists.
pub fn play_piece<R: Randomizer>(session: &mut Session<R>) -> bool {
    if session.paused() {
        return false;
    }
    let Some(target) = best_placement(session.board(), session.active()) else {
        return false;
    };

    for _ in 0..target.rotations {
        session.rotate();
    }
    while session.active().x < target.x {
        if !session.move_right() {
            break;
        }
    }
    while session.active().x > target.x {
        if !session.move_left() {
            break;
        }
    }
    session.snap_down();
    true
}
