//! Shared data structures and constants
//!
//! Everything in here is plain data with no dependencies, so it can be used by the
//! core state machine as well as by renderers, sound layers or bots that only observe it.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn position**: (4, 0), the top-left corner of the piece matrix
//!
//! # Gravity
//!
//! Time is measured in clock ticks, where [`TICKS_PER_SECOND`] ticks make one nominal
//! second. The gravity interval shrinks with the level and is clamped at a floor:
//!
//! | Level | Interval (ticks) |
//! |-------|------------------|
//! | 1 | 60 |
//! | 2 | 56 |
//! | 5 | 44 |
//! | 10 | 24 |
//! | 15+ | 4 |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{gravity_interval, GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(GameAction::from_str("snapDown"), Some(GameAction::SnapDown));
//! assert_eq!(gravity_interval(1), 60.0);
//! assert_eq!(gravity_interval(40), 4.0);
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Column of the top-left corner of a freshly spawned piece
pub const SPAWN_X: i8 = 4;

/// Row of the top-left corner of a freshly spawned piece
pub const SPAWN_Y: i8 = 0;

/// Clock ticks per nominal second (60 ticks ≈ one second at 60 FPS)
pub const TICKS_PER_SECOND: u32 = 60;

/// Gravity interval at level 1, in ticks
pub const GRAVITY_BASE_TICKS: i64 = 60;

/// Ticks removed from the gravity interval per level above 1
pub const GRAVITY_STEP_TICKS: i64 = 4;

/// Fastest gravity interval, in ticks
pub const GRAVITY_MIN_TICKS: i64 = 4;

/// Minimum number of pieces kept in the lookahead queue
pub const MIN_LOOKAHEAD: usize = 2;

/// Largest width or height of any piece matrix
pub const SHAPE_MAX: usize = 4;

/// Gravity interval for a level: `max(60 - (level - 1) * 4, 4)` ticks.
///
/// Level 0 is treated as level 1.
pub fn gravity_interval(level: u32) -> f32 {
    let level = i64::from(level.max(1));
    let ticks = GRAVITY_BASE_TICKS - (level - 1) * GRAVITY_STEP_TICKS;
    ticks.max(GRAVITY_MIN_TICKS) as f32
}

/// The seven tetromino piece kinds
///
/// A board cell remembers the kind that filled it so renderers can recover the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("Z"), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Uppercase single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }

    /// Position in [`PieceKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::J => 1,
            PieceKind::L => 2,
            PieceKind::O => 3,
            PieceKind::S => 4,
            PieceKind::T => 5,
            PieceKind::Z => 6,
        }
    }

    /// Non-zero code used by compact board encodings (1..=7)
    pub fn code(&self) -> u8 {
        self.index() as u8 + 1
    }

    /// Inverse of [`PieceKind::code`]; 0 and out-of-range codes are `None`
    pub fn from_code(code: u8) -> Option<Self> {
        let index = usize::from(code).checked_sub(1)?;
        PieceKind::ALL.get(index).copied()
    }
}

/// A cell on the game board
///
/// - `None`: empty
/// - `Some(PieceKind)`: filled by a piece of that kind
pub type Cell = Option<PieceKind>;

/// Raw input intents accepted by the session
///
/// Input layers (keyboard, touch, bots) map their devices onto these and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Shift the active piece one column left
    MoveLeft,
    /// Shift the active piece one column right
    MoveRight,
    /// Soft drop by one row (locks when blocked)
    MoveDown,
    /// Hard drop: fall until the piece locks
    SnapDown,
    /// Rotate 90° clockwise with single-cell wall kick
    Rotate,
    /// Suspend gravity and input
    Pause,
    /// Resume after a pause
    Resume,
    /// Pause when running, resume when paused
    TogglePause,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATE"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "movedown" => Some(GameAction::MoveDown),
            "snapdown" => Some(GameAction::SnapDown),
            "rotate" => Some(GameAction::Rotate),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            "togglepause" => Some(GameAction::TogglePause),
            _ => None,
        }
    }

    /// camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveDown => "moveDown",
            GameAction::SnapDown => "snapDown",
            GameAction::Rotate => "rotate",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
            GameAction::TogglePause => "togglePause",
        }
    }
}

/// Playing-field geometry in viewport units
///
/// Carried by resize notifications so renderers can lay out the grid. Collision and
/// placement never look at it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    /// Viewport width
    pub width: f32,
    /// Viewport height
    pub height: f32,
    /// Y of the top edge of row 0
    pub top: f32,
    /// X of the left edge of column 0
    pub left: f32,
    /// Edge length of one cell
    pub side: f32,
}
