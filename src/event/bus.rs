//! Event bus: Ordered, synchronous publish/subscribe.
//!
//! Handlers run on the publishing thread, in the order they were registered,
//! before `publish` returns. Observers that live on another thread can take a
//! [`tap`](EventBus::tap) instead, which forwards a copy of every event over a
//! crossbeam channel.

use super::{Event, EventKind, Source};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Event)>;

struct Handler {
    id: SubscriptionId,
    /// `None` matches every source.
    source: Option<Source>,
    kind: EventKind,
    callback: Callback,
}

/// Ordered synchronous event bus.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Handler>,
    taps: Vec<Sender<Event>>,
    next_id: u64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `callback` for every event of `kind`, whatever its source.
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.register(None, kind, Box::new(callback))
    }

    /// Call `callback` for events of `kind` raised by `source` only.
    pub fn on_source<F>(&mut self, source: Source, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.register(Some(source), kind, Box::new(callback))
    }

    fn register(
        &mut self,
        source: Option<Source>,
        kind: EventKind,
        callback: Callback,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push(Handler {
            id,
            source,
            kind,
            callback,
        });
        id
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|handler| handler.id != id);
        self.handlers.len() != before
    }

    /// Receive a copy of every published event on a channel.
    ///
    /// The tap is dropped from the bus once its receiver is gone.
    pub fn tap(&mut self) -> Receiver<Event> {
        let (tx, rx) = unbounded();
        self.taps.push(tx);
        rx
    }

    /// Number of registered handlers (taps excluded).
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Deliver `event` to matching handlers, then to every tap.
    pub fn publish(&mut self, event: &Event) {
        for handler in &mut self.handlers {
            let source_matches = handler.source.map_or(true, |source| source == event.source);
            if source_matches && handler.kind == event.kind {
                (handler.callback)(event);
            }
        }

        if !self.taps.is_empty() {
            self.taps.retain(|tap| tap.send(event.clone()).is_ok());
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .field("taps", &self.taps.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::AtomId;
    use crate::event::Payload;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn added(line: &str) -> Event {
        Event::new(
            Source::Atom(AtomId::new(0)),
            EventKind::MessageAdded,
            Payload::Line(line.to_string()),
        )
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.on(EventKind::MessageAdded, move |_| log.borrow_mut().push(name));
        }
        bus.publish(&added("x"));

        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_kind_and_source_filtering() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&hits);
        bus.on_source(Source::Atom(AtomId::new(1)), EventKind::Shown, move |_| {
            *counter.borrow_mut() += 1;
        });

        bus.publish(&Event::lifecycle(AtomId::new(0), EventKind::Shown));
        bus.publish(&Event::lifecycle(AtomId::new(1), EventKind::Hidden));
        assert_eq!(*hits.borrow(), 0);

        bus.publish(&Event::lifecycle(AtomId::new(1), EventKind::Shown));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_off_unsubscribes() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = bus.on(EventKind::MessageAdded, move |_| *counter.borrow_mut() += 1);

        assert!(bus.off(id));
        assert!(!bus.off(id));
        assert!(bus.is_empty());
        bus.publish(&added("x"));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_tap_receives_copies_and_is_pruned() {
        let mut bus = EventBus::new();
        let rx = bus.tap();

        bus.publish(&added("a"));
        bus.publish(&added("b"));
        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received, vec![added("a"), added("b")]);

        drop(rx);
        bus.publish(&added("c"));
        assert_eq!(format!("{bus:?}"), "EventBus { handlers: 0, taps: 0, .. }");
    }
}
