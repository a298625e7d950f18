//! Score keeper - turns clear and game-over notifications into a running score
//!
//! Scoring rules:
//! - one row is worth 100 points
//! - each clear of `n > 1` rows adds a bonus of `2^(n-2) * 100`
//!   (2 rows: 300, 3 rows: 500, 4 rows: 800)
//! - on game over the best score is updated, then score and lines reset
//!
//! The keeper is an ordinary event subscriber; the session never calls it directly.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::events::{EventChannel, GameEvent, SubscriptionId};

/// Points for clearing `rows` rows in a single lock
///
/// # Examples
///
/// ```
/// use blockfall_core::score::points_for;
///
/// assert_eq!(points_for(0), 0);
/// assert_eq!(points_for(1), 100);
/// assert_eq!(points_for(4), 800);
/// ```
pub fn points_for(rows: usize) -> u64 {
    let rows = rows as u64;
    let base = rows.saturating_mul(100);
    let bonus = if rows > 1 {
        u32::try_from(rows - 2)
            .ok()
            .and_then(|shift| 1u64.checked_shl(shift))
            .unwrap_or(u64::MAX)
            .saturating_mul(100)
    } else {
        0
    };
    base.saturating_add(bonus)
}

/// Running score, cleared lines and best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreKeeper {
    score: u64,
    lines: u64,
    best: u64,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a best score carried over from an earlier run
    pub fn with_best(best: u64) -> Self {
        Self {
            best,
            ..Self::default()
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Fold one event into the totals. Returns whether anything changed.
    pub fn apply(&mut self, event: &GameEvent) -> bool {
        match *event {
            GameEvent::ClearRows(rows) if rows > 0 => {
                self.score = self.score.saturating_add(points_for(rows));
                self.lines = self.lines.saturating_add(rows as u64);
                true
            }
            GameEvent::GameOver(_) => {
                self.best = self.best.max(self.score);
                info!(score = self.score, best = self.best, lines = self.lines, "final score");
                self.score = 0;
                self.lines = 0;
                true
            }
            _ => false,
        }
    }

    /// Subscribe a fresh keeper to `channel`.
    ///
    /// The returned handle is shared with the subscription; unsubscribe with the id
    /// to detach it.
    pub fn attach(channel: &EventChannel) -> (Rc<RefCell<ScoreKeeper>>, SubscriptionId) {
        Self::attach_with(channel, Self::new())
    }

    /// Subscribe an existing keeper to `channel`
    pub fn attach_with(
        channel: &EventChannel,
        keeper: ScoreKeeper,
    ) -> (Rc<RefCell<ScoreKeeper>>, SubscriptionId) {
        let shared = Rc::new(RefCell::new(keeper));
        let sink = Rc::clone(&shared);
        let id = channel.subscribe_all(move |event| {
            sink.borrow_mut().apply(event);
        });
        (shared, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for(1), 100);
        assert_eq!(points_for(2), 300);
        assert_eq!(points_for(3), 500);
        assert_eq!(points_for(4), 800);
    }

    #[test]
    fn test_points_saturate() {
        assert_eq!(points_for(usize::MAX), u64::MAX);
    }

    #[test]
    fn test_accumulates_clears() {
        let mut keeper = ScoreKeeper::new();
        assert!(keeper.apply(&GameEvent::ClearRows(1)));
        assert!(keeper.apply(&GameEvent::ClearRows(2)));
        assert!(!keeper.apply(&GameEvent::MoveLeft(true)));
        assert_eq!(keeper.score(), 400);
        assert_eq!(keeper.lines(), 3);
    }

    #[test]
    fn test_game_over_records_best() {
        let mut keeper = ScoreKeeper::with_best(250);
        keeper.apply(&GameEvent::ClearRows(4));
        keeper.apply(&GameEvent::GameOver(true));
        assert_eq!(keeper.best(), 800);
        assert_eq!(keeper.score(), 0);
        assert_eq!(keeper.lines(), 0);

        keeper.apply(&GameEvent::ClearRows(1));
        keeper.apply(&GameEvent::GameOver(true));
        assert_eq!(keeper.best(), 800);
    }

    #[test]
    fn test_attach_follows_channel() {
        let channel = EventChannel::new();
        let (keeper, id) = ScoreKeeper::attach(&channel);

        channel.emit(&GameEvent::ClearRows(3));
        assert_eq!(keeper.borrow().score(), 500);

        assert!(channel.unsubscribe(id));
        channel.emit(&GameEvent::ClearRows(3));
        assert_eq!(keeper.borrow().score(), 500);
    }
}
