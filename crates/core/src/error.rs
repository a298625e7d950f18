/// Error types for the blockfall core
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, BlockfallError>;

/// Errors raised while setting up a session
///
/// Gameplay itself never fails: illegal moves are reverted and game over resets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockfallError {
    /// Lookahead queue configured shorter than the preview needs
    #[error("lookahead of {0} pieces is too short (minimum 2)")]
    LookaheadTooShort(usize),

    /// Levels start at 1
    #[error("invalid level: {0} (levels start at 1)")]
    InvalidLevel(u32),
}
