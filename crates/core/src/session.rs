//! Game session - owns the board, the active piece and the gravity clock
//!
//! Every operation validates against the board, mutates the session's own state and
//! then announces the outcome on the [`EventChannel`]. Illegal moves and rotations are
//! reverted rather than reported as errors. Game over is transient: the session emits
//! it, drops back to level 1, clears the board and keeps going.
//!
//! While paused, every gameplay operation is a no-op that emits nothing, and the
//! gravity clock does not accumulate.
//!
//! Handlers run while the session is mutably borrowed, so they cannot call back into it.
//! They request follow-up actions through an [`ActionSender`] instead; queued actions
//! run in order once the outermost operation returns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::events::{EventChannel, GameEvent};
use crate::layout::field_geometry;
use crate::rng::{Randomizer, SimpleRng};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::tetromino::{canonical_shape, random_tetromino, rotate, unrotate, Shape};
use crate::types::{
    gravity_interval, GameAction, Geometry, PieceKind, BOARD_HEIGHT, SPAWN_X, SPAWN_Y,
};

/// Upper bound on queued actions processed after a single operation
pub const MAX_DEFERRED_ACTIONS: usize = 64;

/// A piece: kind, current matrix, and top-left position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a piece with its canonical shape at the spawn position
    pub fn new(kind: PieceKind) -> Self {
        Self::spawn(kind, canonical_shape(kind))
    }

    fn spawn(kind: PieceKind, shape: Shape) -> Self {
        Self {
            kind,
            shape,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    /// Draw a uniformly random piece at the spawn position
    pub fn random<R: Randomizer + ?Sized>(rng: &mut R) -> Self {
        let (kind, shape) = random_tetromino(rng);
        Self::spawn(kind, shape)
    }

    /// Absolute board coordinates of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .occupied()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// True if the piece pokes through a wall, the floor, or a filled cell
    pub fn is_blocked(&self, board: &Board) -> bool {
        board.check_outside_walls(&self.shape, self.x, self.y)
            || board.check_collision(&self.shape, self.x, self.y)
    }
}

/// Cloneable handle for requesting actions from inside event handlers
#[derive(Debug, Clone, Default)]
pub struct ActionSender {
    queue: Rc<RefCell<VecDeque<GameAction>>>,
}

impl ActionSender {
    /// Queue an action to run after the current operation finishes
    pub fn send(&self, action: GameAction) {
        self.queue.borrow_mut().push_back(action);
    }

    /// Number of actions waiting to run
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn pop(&self) -> Option<GameAction> {
        self.queue.borrow_mut().pop_front()
    }

    fn discard(&self) -> usize {
        let mut queue = self.queue.borrow_mut();
        let dropped = queue.len();
        queue.clear();
        dropped
    }
}

/// Complete game session
#[derive(Debug)]
pub struct Session<R = SimpleRng> {
    board: Board,
    active: Tetromino,
    lookahead: VecDeque<Tetromino>,
    rng: R,
    level: u32,
    /// Ticks accumulated since the last forced descent
    gravity_elapsed: f32,
    paused: bool,
    geometry: Option<Geometry>,
    emit_gravity_moves: bool,
    /// Monotonic id of the active piece (increments on every spawn)
    piece_id: u32,
    events: EventChannel,
    deferred: ActionSender,
    draining: bool,
}

impl Session<SimpleRng> {
    /// Create a session using the seeded built-in randomizer
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_rng(config, SimpleRng::new(config.seed))
    }
}

impl<R: Randomizer> Session<R> {
    /// Create a session drawing pieces from `rng`
    pub fn with_rng(config: SessionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let active = Tetromino::random(&mut rng);
        let lookahead: VecDeque<Tetromino> = (0..config.lookahead)
            .map(|_| Tetromino::random(&mut rng))
            .collect();
        debug!(kind = ?active.kind, seed = config.seed, "session created");

        Ok(Self {
            board: Board::new(),
            active,
            lookahead,
            rng,
            level: config.initial_level,
            gravity_elapsed: 0.0,
            paused: config.start_paused,
            geometry: None,
            emit_gravity_moves: config.emit_gravity_moves,
            piece_id: 1,
            events: EventChannel::new(),
            deferred: ActionSender::default(),
            draining: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Tetromino {
        &self.active
    }

    /// Upcoming pieces, head first
    pub fn lookahead(&self) -> impl Iterator<Item = &Tetromino> + '_ {
        self.lookahead.iter()
    }

    /// The piece that spawns after the active one locks
    pub fn next_piece(&self) -> Option<&Tetromino> {
        self.lookahead.front()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    /// Last geometry published through a resize
    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    /// Gravity interval for the current level, in ticks
    pub fn gravity_interval(&self) -> f32 {
        gravity_interval(self.level)
    }

    /// Ticks accumulated toward the next forced descent
    pub fn gravity_elapsed(&self) -> f32 {
        self.gravity_elapsed
    }

    /// The channel this session publishes on
    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    /// Handle for queueing actions from event handlers
    pub fn sender(&self) -> ActionSender {
        self.deferred.clone()
    }

    /// Row the active piece would lock at if hard-dropped now
    pub fn ghost_y(&self) -> i8 {
        let piece = &self.active;
        let mut y = piece.y;
        for _ in 0..=BOARD_HEIGHT {
            if self.board.check_collision(&piece.shape, piece.x, y + 1) {
                break;
            }
            y += 1;
        }
        y
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = Some(ActiveSnapshot::from(&self.active));
        out.ghost_y = Some(self.ghost_y());
        out.next = self.next_piece().map(|piece| piece.kind);
        out.level = self.level;
        out.paused = self.paused;
        out.piece_id = self.piece_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Shift the active piece one column left. Returns whether it moved.
    pub fn move_left(&mut self) -> bool {
        let moved = self.shift(-1).unwrap_or(false);
        self.drain_deferred();
        moved
    }

    /// Shift the active piece one column right. Returns whether it moved.
    pub fn move_right(&mut self) -> bool {
        let moved = self.shift(1).unwrap_or(false);
        self.drain_deferred();
        moved
    }

    /// Explicit soft drop. Returns whether the piece locked.
    pub fn move_down(&mut self) -> bool {
        let locked = self.soft_drop().unwrap_or(false);
        self.drain_deferred();
        locked
    }

    /// Hard drop: fall until the piece locks. Returns the rows fallen before locking.
    pub fn snap_down(&mut self) -> u32 {
        let fallen = self.hard_drop().unwrap_or(0);
        self.drain_deferred();
        fallen
    }

    /// Rotate clockwise with single-cell wall kick. Returns false if the rotation was reverted.
    pub fn rotate(&mut self) -> bool {
        let rotated = self.try_rotate().unwrap_or(false);
        self.drain_deferred();
        rotated
    }

    /// Advance the gravity clock by `delta` ticks. Returns whether a forced descent ran.
    ///
    /// Non-positive or non-finite deltas are ignored.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.paused || !delta.is_finite() || delta <= 0.0 {
            return false;
        }

        self.gravity_elapsed += delta;
        if self.gravity_elapsed <= self.gravity_interval() {
            return false;
        }

        self.gravity_elapsed = 0.0;
        let locked = self.step_down();
        if self.emit_gravity_moves {
            self.emit(GameEvent::MoveDown(!locked));
        }
        self.drain_deferred();
        true
    }

    /// Suspend gravity and input. Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.paused = true;
        info!(piece_id = self.piece_id, "session paused");
        true
    }

    /// Resume after a pause. Returns false if not paused.
    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        info!(piece_id = self.piece_id, "session resumed");
        self.drain_deferred();
        true
    }

    /// Set the level (levels below 1 become 1) and announce it
    pub fn set_level(&mut self, level: u32) {
        self.apply_level(level);
        self.drain_deferred();
    }

    /// Recompute the field geometry for a viewport, announcing it if it changed.
    ///
    /// Returns whether a `Resize` event was emitted.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let Some(geometry) = field_geometry(width, height) else {
            debug!(width, height, "ignoring degenerate viewport");
            return false;
        };
        if self.geometry == Some(geometry) {
            return false;
        }
        self.geometry = Some(geometry);
        self.emit(GameEvent::Resize(geometry));
        self.drain_deferred();
        true
    }

    /// Dispatch a raw input intent. Returns the outcome of the underlying operation.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        let result = self.dispatch(action);
        self.drain_deferred();
        result
    }

    fn dispatch(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.shift(-1).unwrap_or(false),
            GameAction::MoveRight => self.shift(1).unwrap_or(false),
            GameAction::MoveDown => self.soft_drop().unwrap_or(false),
            GameAction::SnapDown => self.hard_drop().is_some(),
            GameAction::Rotate => self.try_rotate().unwrap_or(false),
            GameAction::Pause => self.pause(),
            GameAction::Resume => self.resume(),
            GameAction::TogglePause => {
                if self.paused {
                    self.resume()
                } else {
                    self.pause()
                }
            }
        }
    }

    /// Run actions queued by handlers. Nested calls return immediately; the outermost
    /// operation drains everything.
    fn drain_deferred(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;

        let mut budget = MAX_DEFERRED_ACTIONS;
        while let Some(action) = self.deferred.pop() {
            if budget == 0 {
                let dropped = 1 + self.deferred.discard();
                warn!(dropped, "deferred action limit reached, dropping the rest");
                break;
            }
            budget -= 1;
            self.dispatch(action);
        }

        self.draining = false;
    }

    fn emit(&self, event: GameEvent) {
        self.events.emit(&event);
    }

    fn apply_level(&mut self, level: u32) {
        self.level = level.max(1);
        info!(level = self.level, "level changed");
        self.emit(GameEvent::LevelChange(self.level));
    }

    /// Horizontal shift with revert. `None` while paused.
    fn shift(&mut self, dx: i8) -> Option<bool> {
        if self.paused {
            return None;
        }

        let mut candidate = self.active;
        candidate.x += dx;
        let moved = !candidate.is_blocked(&self.board);
        if moved {
            self.active = candidate;
        }

        let event = if dx < 0 {
            GameEvent::MoveLeft(moved)
        } else {
            GameEvent::MoveRight(moved)
        };
        self.emit(event);
        Some(moved)
    }

    /// Player soft drop: one step down, announced. `None` while paused.
    fn soft_drop(&mut self) -> Option<bool> {
        if self.paused {
            return None;
        }
        let locked = self.step_down();
        self.emit(GameEvent::MoveDown(!locked));
        Some(locked)
    }

    /// Hard drop. `None` while paused, otherwise the rows fallen before the lock.
    fn hard_drop(&mut self) -> Option<u32> {
        if self.paused {
            return None;
        }

        // From any legal position the piece reaches the floor within BOARD_HEIGHT steps
        let mut fallen = 0;
        for _ in 0..=BOARD_HEIGHT {
            if self.step_down() {
                break;
            }
            fallen += 1;
        }

        self.emit(GameEvent::SnapDown(true));
        Some(fallen)
    }

    /// Rotate with single-cell kick recovery. `None` while paused.
    fn try_rotate(&mut self) -> Option<bool> {
        if self.paused {
            return None;
        }

        self.active.shape = rotate(&self.active.shape);
        let mut success = true;
        if self.active.is_blocked(&self.board) {
            // Left kick, then right kick, then give up
            if self.shift(-1) == Some(true) || self.shift(1) == Some(true) {
                debug!(kind = ?self.active.kind, x = self.active.x, "rotation kicked");
            } else {
                self.active.shape = unrotate(&self.active.shape);
                success = false;
            }
        }

        self.emit(GameEvent::Rotate(success));
        Some(success)
    }

    /// One row down; locks when blocked. Returns whether a lock occurred.
    fn step_down(&mut self) -> bool {
        let mut candidate = self.active;
        candidate.y += 1;
        if !self
            .board
            .check_collision(&candidate.shape, candidate.x, candidate.y)
        {
            self.active = candidate;
            return false;
        }

        self.lock();
        true
    }

    /// Merge the active piece, clear rows, spawn the next piece and detect game over
    fn lock(&mut self) {
        let piece = self.active;
        self.board.merge(&piece.shape, piece.x, piece.y, piece.kind);

        let rows = self.board.clear_rows();
        debug!(kind = ?piece.kind, x = piece.x, y = piece.y, rows, "piece locked");
        if rows > 0 {
            self.emit(GameEvent::ClearRows(rows));
        }

        self.spawn_next();

        let spawn_blocked = self
            .board
            .check_collision(&self.active.shape, self.active.x, self.active.y);
        if self.board.check_top_row_occupied() || spawn_blocked {
            info!(piece_id = self.piece_id, level = self.level, "game over, resetting");
            self.emit(GameEvent::GameOver(true));
            self.apply_level(1);
            self.board.reset();
        }

        self.gravity_elapsed = 0.0;
    }

    /// Replace the active piece with the head of the lookahead queue and refill it
    fn spawn_next(&mut self) {
        let refill = Tetromino::random(&mut self.rng);
        self.lookahead.push_back(refill);
        if let Some(next) = self.lookahead.pop_front() {
            self.active = next;
        }
        self.piece_id = self.piece_id.wrapping_add(1);
        debug!(kind = ?self.active.kind, piece_id = self.piece_id, "piece spawned");
    }

    /// Replace the active piece (test helper)
    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: Tetromino) {
        self.active = piece;
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

impl<R> Drop for Session<R> {
    /// Release every subscriber and pending action along with the session
    fn drop(&mut self) {
        self.events.clear();
        self.deferred.discard();
    }
}
