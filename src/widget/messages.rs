//! Messages: A scrollable, append-only text pane.
//!
//! Each appended line becomes one line of the atom's content. Appending a
//! single line repaints immediately; appending a batch holds the atom's
//! render lock for the whole batch so N lines cost one repaint, while
//! observers still see one `MessageAdded` per line.
//!
//! The pane reflows around its siblings:
//!
//! | Trigger | Patch |
//! |---------|-------|
//! | `channels` shown | `left 25%`, `width 75%` |
//! | `channels` hidden | `left 0%`, `width 100%` |
//! | `header` shown | `top 0%+3`, `height 100%-6` |
//! | `header` hidden | `top 0%`, `height 100%-3` |
//! | theme changed | colors of the `messages` theme component |

use super::LineBuffer;
use crate::atom::{preset, AtomId, Patch, VisualState};
use crate::config::Config;
use crate::display::Display;
use crate::error::Result;
use crate::event::{Event, EventKind, Payload, Source};
use crate::manager::Manager;

/// Scroll position that anchors the view to the newest line.
pub const ANCHORED: f64 = 100.0;

/// The message pane.
#[derive(Debug)]
pub struct Messages {
    id: AtomId,
    lines: LineBuffer,
    /// `None` until the first scroll, and again after a clear.
    scroll_percentage: Option<f64>,
}

impl Messages {
    /// Atom name siblings resolve the pane by.
    pub const NAME: &'static str = "messages";

    /// Register the pane with `manager`, using the configured geometry and
    /// the `messages` colors of the configured theme.
    pub fn create<D: Display>(manager: &mut Manager<D>, config: &Config) -> Result<Self> {
        let style = config.theme.component(Self::NAME).style();
        let state = VisualState::new(config.layout.messages, style);
        let id = manager.add_atom(Self::NAME, state, config.layout.messages_visible)?;

        Ok(Self {
            id,
            lines: LineBuffer::new(),
            scroll_percentage: None,
        })
    }

    /// Register the pane's update rules. Runs once.
    ///
    /// Siblings that are not registered are skipped.
    pub fn init<D: Display>(&self, manager: &mut Manager<D>) -> Result<()> {
        manager.init_atom(self.id, |init| {
            if let Some(channels) = init.sibling("channels") {
                let source = Source::Atom(channels);
                init.update_on(source, EventKind::Shown, preset::shrink())
                    .update_on(source, EventKind::Hidden, preset::expand());
            } else {
                sibling_missing("channels");
            }

            if let Some(header) = init.sibling("header") {
                let source = Source::Atom(header);
                init.update_on(source, EventKind::Shown, preset::below_header())
                    .update_on(source, EventKind::Hidden, preset::without_header());
            } else {
                sibling_missing("header");
            }

            init.update_on(Source::App, EventKind::ThemeChanged, Patch::themed(Self::NAME));
            Ok(())
        })
    }

    /// The pane's atom.
    pub const fn id(&self) -> AtomId {
        self.id
    }

    /// Lines added since the last clear, oldest first.
    pub const fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    /// The last scroll position set, if any since the last clear.
    pub const fn scroll_percentage(&self) -> Option<f64> {
        self.scroll_percentage
    }

    /// Scroll to `percentage` and fire `ScrollPercentageChanged`.
    ///
    /// The value is passed to the display as is, even outside `0..=100`.
    pub fn set_scroll_percentage<D: Display>(
        &mut self,
        manager: &mut Manager<D>,
        percentage: f64,
    ) -> Result<()> {
        tracing::trace!(atom = Self::NAME, percentage, "scroll");
        manager.display_mut().scroll(self.id, percentage)?;
        self.scroll_percentage = Some(percentage);
        manager.emit(Event::new(
            Source::Atom(self.id),
            EventKind::ScrollPercentageChanged,
            Payload::Percentage(percentage),
        ))
    }

    /// Anchor the view to the newest line.
    pub fn scroll<D: Display>(&mut self, manager: &mut Manager<D>) -> Result<()> {
        self.set_scroll_percentage(manager, ANCHORED)
    }

    /// Remove every line and render.
    ///
    /// The scroll position becomes unset; call [`scroll`](Self::scroll) to
    /// re-anchor.
    pub fn clear_messages<D: Display>(&mut self, manager: &mut Manager<D>) -> Result<()> {
        self.lines.clear();
        self.scroll_percentage = None;
        manager.atom_mut(self.id)?.state_mut().content.clear();
        manager.render(self.id)
    }

    /// Append one line, fire `MessageAdded`, re-anchor and render.
    ///
    /// Use [`bulk_add_messages`](Self::bulk_add_messages) for more than one
    /// line.
    pub fn add_message<D: Display>(
        &mut self,
        manager: &mut Manager<D>,
        line: impl Into<String>,
    ) -> Result<()> {
        let line = line.into();
        manager
            .atom_mut(self.id)?
            .state_mut()
            .push_line(&line, self.lines.len());
        self.lines.push(line.clone());

        manager.emit(Event::new(
            Source::Atom(self.id),
            EventKind::MessageAdded,
            Payload::Line(line),
        ))?;
        self.scroll(manager)?;
        manager.render(self.id)
    }

    /// Append lines in order with a single repaint.
    ///
    /// An empty batch does nothing. Otherwise every line goes through
    /// [`add_message`](Self::add_message) under the render lock, which is
    /// released even if an append fails.
    pub fn bulk_add_messages<D, I>(&mut self, manager: &mut Manager<D>, lines: I) -> Result<()>
    where
        D: Display,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut lines = lines.into_iter().peekable();
        if lines.peek().is_none() {
            return Ok(());
        }

        let mut guard = manager.render_lock(self.id)?;
        let mut count = 0_usize;
        for line in lines {
            self.add_message(&mut *guard, line)?;
            count += 1;
        }
        tracing::debug!(atom = Self::NAME, lines = count, "bulk insert");
        guard.release()
    }
}

fn sibling_missing(sibling: &str) {
    tracing::debug!(atom = Messages::NAME, sibling, "sibling not registered");
}
