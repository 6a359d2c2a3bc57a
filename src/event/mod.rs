//! Events: What atoms react to and what they announce.
//!
//! Every event has a [`Source`] (an atom or the application itself), an
//! [`EventKind`] that update rules match on, and an optional [`Payload`].
//!
//! ```text
//!  show()/hide()          set_theme()          add_message()
//!  ─────────────┐        ─────────────┐       ──────────────┐
//!               ▼                     ▼                     ▼
//!        Shown/Hidden           ThemeChanged          MessageAdded
//!     (Source::Atom(id))        (Source::App)      (Source::Atom(id))
//!               │                     │                     │
//!               └──────────────┬──────┴─────────────────────┘
//!                              ▼
//!                      Manager::emit (sync)
//!                 rules ─▶ renders ─▶ EventBus
//! ```

mod bus;

pub use bus::{EventBus, SubscriptionId};

use crate::atom::AtomId;
use std::fmt;

/// Who raised an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// An atom's own lifecycle or content change.
    Atom(AtomId),
    /// An application-wide trigger such as a theme change.
    App,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(id) => write!(f, "atom#{}", id.index()),
            Self::App => f.write_str("app"),
        }
    }
}

/// The kinds of event update rules and observers can match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// An atom's visibility flag went from false to true.
    Shown,
    /// An atom's visibility flag went from true to false.
    Hidden,
    /// The active theme was replaced.
    ThemeChanged,
    /// A text atom's scroll position was set.
    ScrollPercentageChanged,
    /// A text atom appended one line.
    MessageAdded,
}

/// Data carried with an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Nothing beyond source and kind.
    None,
    /// New scroll percentage (not validated).
    Percentage(f64),
    /// The appended line.
    Line(String),
    /// Name of the newly active theme.
    Theme(String),
}

/// One event as dispatched by the manager.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Who raised it.
    pub source: Source,
    /// What happened.
    pub kind: EventKind,
    /// Extra data.
    pub payload: Payload,
}

impl Event {
    /// Create an event.
    pub const fn new(source: Source, kind: EventKind, payload: Payload) -> Self {
        Self {
            source,
            kind,
            payload,
        }
    }

    /// Lifecycle event without a payload.
    pub const fn lifecycle(atom: AtomId, kind: EventKind) -> Self {
        Self::new(Source::Atom(atom), kind, Payload::None)
    }

    /// Whether this event is `kind` raised by `source`.
    pub fn matches(&self, source: Source, kind: EventKind) -> bool {
        self.source == source && self.kind == kind
    }
}
