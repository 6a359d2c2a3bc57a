//! Display sinks: Where rendered atom state ends up.
//!
//! The manager treats the display as an opaque sink with synchronous apply
//! semantics. It pushes an atom's [`VisualState`] with [`Display::apply`]
//! and asks for a [`Display::repaint`]; how (or whether) pixels change is up
//! to the implementation.
//!
//! - [`TerminalDisplay`] paints visible atoms to any `io::Write` with
//!   `crossterm` escape sequences, one write per repaint.
//! - [`RecordingDisplay`] paints nothing and records every call.

mod recording;
mod terminal;

pub use recording::RecordingDisplay;
pub use terminal::TerminalDisplay;

use crate::atom::{AtomId, VisualState};
use std::io;

/// Render target consumed by the [`Manager`](crate::Manager).
pub trait Display {
    /// Replace the surface state of atom `id`.
    fn apply(&mut self, id: AtomId, state: &VisualState) -> io::Result<()>;

    /// Show or hide the surface of atom `id`.
    fn set_visible(&mut self, id: AtomId, visible: bool) -> io::Result<()>;

    /// Set the scroll position of atom `id`, in percent.
    ///
    /// Values outside `0..=100` are accepted; the sink decides what they
    /// mean.
    fn scroll(&mut self, id: AtomId, percentage: f64) -> io::Result<()>;

    /// Redraw the screen from the current surfaces.
    fn repaint(&mut self) -> io::Result<()>;
}
