//! Event channel - typed publish/subscribe for session notifications
//!
//! The session announces what happened (moves, rotations, clears, game over, level and
//! geometry changes) through a closed [`GameEvent`] enum. Renderers, sound layers and
//! score keepers subscribe without the session knowing about them.
//!
//! Delivery is synchronous and in registration order. The channel is a cheap `Rc`
//! handle, single-threaded by construction:
//!
//! - handlers may subscribe or unsubscribe while an emit is running; the change applies
//!   from the next emit
//! - handlers may emit; the nested event is delivered in full, including to the
//!   handler that is still running, before the outer emit continues
//! - nothing is buffered, late subscribers miss earlier events
//!
//! Handlers are `Fn`, so they may be re-entered. Mutable handler state lives in a
//! `Cell` or `RefCell`.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use blockfall_core::events::{EventChannel, EventKind, GameEvent};
//!
//! let channel = EventChannel::new();
//! let cleared = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&cleared);
//! channel.subscribe(EventKind::ClearRows, move |event| {
//!     if let GameEvent::ClearRows(n) = event {
//!         sink.set(sink.get() + n);
//!     }
//! });
//!
//! channel.emit(&GameEvent::ClearRows(2));
//! channel.emit(&GameEvent::MoveLeft(true));
//! assert_eq!(cleared.get(), 2);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::types::Geometry;

/// Notification emitted by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Playing-field geometry changed
    Resize(Geometry),
    /// A lock removed this many full rows (never zero)
    ClearRows(usize),
    /// The board filled up; the session has reset itself
    GameOver(bool),
    /// Left shift attempted; `true` if the piece moved
    MoveLeft(bool),
    /// Right shift attempted; `true` if the piece moved
    MoveRight(bool),
    /// Explicit soft drop; `true` if the piece moved without locking
    MoveDown(bool),
    /// Hard drop finished (always with a lock)
    SnapDown(bool),
    /// Rotation attempted; `false` if it had to be reverted
    Rotate(bool),
    /// Level set to the carried value
    LevelChange(u32),
}

impl GameEvent {
    /// The kind used for subscription filtering
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Resize(_) => EventKind::Resize,
            GameEvent::ClearRows(_) => EventKind::ClearRows,
            GameEvent::GameOver(_) => EventKind::GameOver,
            GameEvent::MoveLeft(_) => EventKind::MoveLeft,
            GameEvent::MoveRight(_) => EventKind::MoveRight,
            GameEvent::MoveDown(_) => EventKind::MoveDown,
            GameEvent::SnapDown(_) => EventKind::SnapDown,
            GameEvent::Rotate(_) => EventKind::Rotate,
            GameEvent::LevelChange(_) => EventKind::LevelChange,
        }
    }
}

/// Payload-free mirror of [`GameEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    ClearRows,
    GameOver,
    MoveLeft,
    MoveRight,
    MoveDown,
    SnapDown,
    Rotate,
    LevelChange,
}

impl EventKind {
    /// Every kind, in catalog order
    pub const ALL: [EventKind; 9] = [
        EventKind::Resize,
        EventKind::ClearRows,
        EventKind::GameOver,
        EventKind::MoveLeft,
        EventKind::MoveRight,
        EventKind::MoveDown,
        EventKind::SnapDown,
        EventKind::Rotate,
        EventKind::LevelChange,
    ];

    /// camelCase event name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Resize => "resize",
            EventKind::ClearRows => "clearRows",
            EventKind::GameOver => "gameOver",
            EventKind::MoveLeft => "moveLeft",
            EventKind::MoveRight => "moveRight",
            EventKind::MoveDown => "moveDown",
            EventKind::SnapDown => "snapDown",
            EventKind::Rotate => "rotate",
            EventKind::LevelChange => "levelChange",
        }
    }

    /// Parse a camelCase event name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&GameEvent)>;

struct Subscriber {
    id: SubscriptionId,
    filter: Option<EventKind>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Shared publish/subscribe channel
#[derive(Clone, Default)]
pub struct EventChannel {
    registry: Rc<RefCell<Registry>>,
}

impl EventChannel {
    /// Create a channel with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for one event kind
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&GameEvent) + 'static,
    {
        self.insert(Some(kind), Rc::new(handler))
    }

    /// Register `handler` for every event
    pub fn subscribe_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&GameEvent) + 'static,
    {
        self.insert(None, Rc::new(handler))
    }

    fn insert(&self, filter: Option<EventKind>, handler: Handler) -> SubscriptionId {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscribers.push(Subscriber {
            id,
            filter,
            handler,
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let before = registry.subscribers.len();
        registry.subscribers.retain(|s| s.id != id);
        registry.subscribers.len() != before
    }

    /// Deliver `event` to every matching subscriber, in registration order
    pub fn emit(&self, event: &GameEvent) {
        let kind = event.kind();
        // Snapshot first so handlers can (un)subscribe without tripping the registry borrow
        let handlers: Vec<Handler> = self
            .registry
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.filter.map_or(true, |k| k == kind))
            .map(|s| Rc::clone(&s.handler))
            .collect();

        tracing::trace!(event = kind.as_str(), handlers = handlers.len(), "emit");
        for handler in handlers {
            handler(event);
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().subscribers.len()
    }

    /// Drop every subscription
    pub fn clear(&self) {
        self.registry.borrow_mut().subscribers.clear();
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder(channel: &EventChannel) -> Rc<RefCell<Vec<GameEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        channel.subscribe_all(move |e| sink.borrow_mut().push(*e));
        log
    }

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_str("CLEARROWS"), Some(EventKind::ClearRows));
        assert_eq!(EventKind::from_str("hold"), None);
    }

    #[test]
    fn test_filtered_delivery() {
        let channel = EventChannel::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        channel.subscribe(EventKind::Rotate, move |_| h.set(h.get() + 1));

        channel.emit(&GameEvent::Rotate(true));
        channel.emit(&GameEvent::MoveLeft(true));
        channel.emit(&GameEvent::Rotate(false));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_registration_order() {
        let channel = EventChannel::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let o = Rc::clone(&order);
            channel.subscribe(EventKind::GameOver, move |_| o.borrow_mut().push(tag));
        }
        channel.emit(&GameEvent::GameOver(true));
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let channel = EventChannel::new();
        let log = recorder(&channel);
        let id = channel.subscribe_all(|_| {});
        assert_eq!(channel.subscriber_count(), 2);

        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        assert_eq!(channel.subscriber_count(), 1);

        channel.emit(&GameEvent::LevelChange(3));
        assert_eq!(*log.borrow(), vec![GameEvent::LevelChange(3)]);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let channel = EventChannel::new();
        channel.emit(&GameEvent::ClearRows(1));
        let log = recorder(&channel);
        channel.emit(&GameEvent::ClearRows(4));
        assert_eq!(*log.borrow(), vec![GameEvent::ClearRows(4)]);
    }

    #[test]
    fn test_handler_can_unsubscribe_itself() {
        let channel = EventChannel::new();
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let (h, s, c) = (Rc::clone(&hits), Rc::clone(&slot), channel.clone());
        let id = channel.subscribe_all(move |_| {
            h.set(h.get() + 1);
            if let Some(id) = s.get() {
                c.unsubscribe(id);
            }
        });
        slot.set(Some(id));

        channel.emit(&GameEvent::MoveDown(true));
        channel.emit(&GameEvent::MoveDown(true));
        assert_eq!(hits.get(), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_nested_emit_reaches_running_handler() {
        let channel = EventChannel::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        // Levels up on every clear and also watches every event
        let (s, c) = (Rc::clone(&seen), channel.clone());
        channel.subscribe_all(move |event| {
            s.borrow_mut().push(*event);
            if let GameEvent::ClearRows(_) = event {
                c.emit(&GameEvent::LevelChange(2));
            }
        });
        let log = recorder(&channel);

        channel.emit(&GameEvent::ClearRows(1));
        assert_eq!(
            *seen.borrow(),
            vec![GameEvent::ClearRows(1), GameEvent::LevelChange(2)]
        );
        // The nested event finishes before the outer one reaches later subscribers
        assert_eq!(
            *log.borrow(),
            vec![GameEvent::LevelChange(2), GameEvent::ClearRows(1)]
        );
    }

    #[test]
    fn test_clear_removes_everything() {
        let channel = EventChannel::new();
        let _log = recorder(&channel);
        channel.clear();
        assert_eq!(channel.subscriber_count(), 0);
    }
}
