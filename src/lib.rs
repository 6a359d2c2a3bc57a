//! # Atoms
//!
//! Reactive atoms for composing and updating terminal UI regions.
//!
//! An atom is one UI component that owns its visual state (geometry, style,
//! content) and declares how that state changes when something else happens:
//! "when `channels` is shown, shrink to the right three quarters", "when the
//! theme changes, re-derive my colors". A [`Manager`] holds the atoms and
//! dispatches every event synchronously, so effects are visible as soon as
//! the triggering call returns.
//!
//! ## Core Concepts
//!
//! - **Update rules**: `(source, event kind, patch)` bindings registered once
//!   during init and applied in registration order (last writer wins)
//! - **Render lock**: a per-atom counter that coalesces many mutations into
//!   one repaint
//! - **Display sinks**: a terminal renderer and an in-memory recorder behind
//!   one trait
//! - **Messages**: a scrollable, append-only text pane with batched inserts
//!
//! ## Example
//!
//! ```
//! use atoms::{display::RecordingDisplay, widget::Messages, Config, Manager, VisualState};
//!
//! let config = Config::default();
//! let mut manager = Manager::new(RecordingDisplay::new(), config.theme.clone());
//! let channels = manager.add_atom("channels", VisualState::default(), false)?;
//! let mut messages = Messages::create(&mut manager, &config)?;
//! messages.init(&mut manager)?;
//!
//! manager.show(channels)?;
//! let geometry = manager.atom(messages.id()).unwrap().state().geometry;
//! assert_eq!(geometry.left.to_string(), "25%");
//! # Ok::<(), atoms::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod atom;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod layout;
pub mod logging;
pub mod manager;
pub mod style;
pub mod theme;
pub mod widget;

// Re-exports for convenience
pub use atom::{Atom, AtomId, AtomInit, Patch, PatchContext, StatePatch, UpdateRule, VisualState};
pub use config::{Config, LayoutConfig};
pub use display::{Display, RecordingDisplay, TerminalDisplay};
pub use error::{Error, Result};
pub use event::{Event, EventBus, EventKind, Payload, Source};
pub use layout::{Dimension, Geometry, Rect};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use manager::{Manager, RenderGuard};
pub use style::{Color, Modifiers, Rgb, Style};
pub use theme::{ComponentTheme, ThemeData};
pub use widget::{LineBuffer, Messages};
