//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules and state of a falling-block puzzle game: a 10x20 grid,
//! seven tetromino kinds, a gravity clock measured in ticks, and a session that validates
//! every move against the board and announces the outcome as a typed event.
//! It has **no dependencies** on rendering, audio, input devices or timers:
//!
//! - **Deterministic**: the same seed (or scripted [`SequenceRng`]) replays the same game
//! - **Observable**: renderers and score keepers subscribe to the [`EventChannel`]
//! - **Portable**: the host drives time by calling [`Session::tick`] with elapsed ticks
//!
//! # Module Structure
//!
//! - [`tetromino`]: canonical shapes and matrix rotation
//! - [`rng`]: randomness source for piece generation
//! - [`board`]: 10x20 grid with collision, wall checks and row clearing
//! - [`events`]: typed publish/subscribe channel
//! - [`session`]: the game state machine
//! - [`score`]: score keeper driven by events
//! - [`layout`]: playing-field geometry for a viewport
//! - [`snapshot`]: plain-data copies of session state
//!
//! # Game Rules
//!
//! - Pieces spawn at column 4, row 0 and are drawn uniformly from the seven kinds
//! - Rotation is clockwise only; a blocked rotation tries one cell left, then one cell
//!   right, then reverts
//! - Gravity descends one row once more than `max(60 - (level - 1) * 4, 4)` ticks have
//!   accumulated
//! - A piece locks when it cannot descend; full rows are removed and the next piece spawns
//! - If the top row is occupied or the new piece collides, the session announces game over,
//!   returns to level 1 and clears the board
//!
//! # Example
//!
//! ```
//! use blockfall_core::{ScoreKeeper, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default().with_seed(7)).unwrap();
//! let (score, _id) = ScoreKeeper::attach(session.events());
//!
//! session.move_left();
//! session.rotate();
//! let fallen = session.snap_down();
//! assert!(fallen > 0);
//! assert_eq!(session.board().filled(), 4);
//! assert_eq!(score.borrow().score(), 0);
//!
//! // Gravity: nothing happens until the interval is exceeded
//! assert!(!session.tick(60.0));
//! assert!(session.tick(1.0));
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod layout;
pub mod rng;
pub mod score;
pub mod session;
pub mod snapshot;
pub mod tetromino;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::SessionConfig;
pub use error::{BlockfallError, Result};
pub use events::{EventChannel, EventKind, GameEvent, SubscriptionId};
pub use layout::field_geometry;
pub use rng::{Randomizer, SequenceRng, SimpleRng};
pub use score::ScoreKeeper;
pub use session::{ActionSender, Session, Tetromino, MAX_DEFERRED_ACTIONS};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use tetromino::{canonical_shape, random_tetromino, rotate, unrotate, Shape};
