//! In-memory display that records what it is asked to do.

use super::Display;
use crate::atom::{AtomId, VisualState};
use std::collections::HashMap;
use std::io;

/// A [`Display`] that paints nothing and remembers every call.
///
/// Used to observe render coalescing: each [`repaint`](Display::repaint)
/// bumps a counter, and the last state applied per atom is kept.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    repaints: usize,
    applied: Vec<(AtomId, VisualState)>,
    visibility: HashMap<AtomId, bool>,
    scrolls: Vec<(AtomId, f64)>,
    fail_repaints: bool,
    fail_visibility: bool,
}

impl RecordingDisplay {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful repaints.
    pub const fn repaints(&self) -> usize {
        self.repaints
    }

    /// Every `apply` call, oldest first.
    pub fn applied(&self) -> &[(AtomId, VisualState)] {
        &self.applied
    }

    /// The most recent state applied for `id`.
    pub fn last_applied(&self, id: AtomId) -> Option<&VisualState> {
        self.applied
            .iter()
            .rev()
            .find(|(applied, _)| *applied == id)
            .map(|(_, state)| state)
    }

    /// Last visibility reported for `id`.
    pub fn is_visible(&self, id: AtomId) -> Option<bool> {
        self.visibility.get(&id).copied()
    }

    /// Every `scroll` call, oldest first.
    pub fn scrolls(&self) -> &[(AtomId, f64)] {
        &self.scrolls
    }

    /// Forget recorded calls (visibility is kept).
    pub fn reset(&mut self) {
        self.repaints = 0;
        self.applied.clear();
        self.scrolls.clear();
    }

    /// Make every following repaint fail with a broken pipe.
    pub fn fail_repaints(&mut self, fail: bool) {
        self.fail_repaints = fail;
    }

    /// Make every following `set_visible` fail with a broken pipe.
    pub fn fail_visibility(&mut self, fail: bool) {
        self.fail_visibility = fail;
    }
}

impl Display for RecordingDisplay {
    fn apply(&mut self, id: AtomId, state: &VisualState) -> io::Result<()> {
        self.applied.push((id, state.clone()));
        Ok(())
    }

    fn set_visible(&mut self, id: AtomId, visible: bool) -> io::Result<()> {
        if self.fail_visibility {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "visibility update failed"));
        }
        self.visibility.insert(id, visible);
        Ok(())
    }

    fn scroll(&mut self, id: AtomId, percentage: f64) -> io::Result<()> {
        self.scrolls.push((id, percentage));
        Ok(())
    }

    fn repaint(&mut self) -> io::Result<()> {
        if self.fail_repaints {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "repaint failed"));
        }
        self.repaints += 1;
        Ok(())
    }
}
