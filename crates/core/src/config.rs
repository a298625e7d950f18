//! Configuration for a game session

use crate::error::{BlockfallError, Result};
use crate::types::MIN_LOOKAHEAD;

/// Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seed for the built-in piece randomizer
    pub seed: u32,

    /// Start in the paused state (e.g. behind a start overlay)
    pub start_paused: bool,

    /// Level the session starts at
    pub initial_level: u32,

    /// Number of upcoming pieces kept in the lookahead queue
    pub lookahead: usize,

    /// Emit `MoveDown` for automatic gravity steps too, not only for explicit soft drops
    pub emit_gravity_moves: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            start_paused: false,
            initial_level: 1,
            lookahead: MIN_LOOKAHEAD,
            emit_gravity_moves: false,
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the randomizer seed
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether the session starts paused
    pub fn with_start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    /// Set the starting level
    pub fn with_initial_level(mut self, level: u32) -> Self {
        self.initial_level = level;
        self
    }

    /// Set the lookahead queue length
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Set whether gravity steps emit `MoveDown`
    pub fn with_emit_gravity_moves(mut self, emit: bool) -> Self {
        self.emit_gravity_moves = emit;
        self
    }

    /// Check the configuration for values the session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.lookahead < MIN_LOOKAHEAD {
            return Err(BlockfallError::LookaheadTooShort(self.lookahead));
        }
        if self.initial_level == 0 {
            return Err(BlockfallError::InvalidLevel(self.initial_level));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.lookahead, 2);
        assert_eq!(config.initial_level, 1);
        assert!(!config.start_paused);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new()
            .with_seed(9)
            .with_start_paused(true)
            .with_initial_level(4)
            .with_lookahead(5)
            .with_emit_gravity_moves(true);
        assert_eq!(config.seed, 9);
        assert!(config.start_paused);
        assert_eq!(config.initial_level, 4);
        assert_eq!(config.lookahead, 5);
        assert!(config.emit_gravity_moves);
    }

    #[test]
    fn test_rejects_short_lookahead() {
        let err = SessionConfig::new().with_lookahead(1).validate().unwrap_err();
        assert_eq!(err, BlockfallError::LookaheadTooShort(1));
        assert!(err.to_string().contains("minimum 2"));
    }

    #[test]
    fn test_rejects_level_zero() {
        let err = SessionConfig::new().with_initial_level(0).validate().unwrap_err();
        assert_eq!(err, BlockfallError::InvalidLevel(0));
    }
}
