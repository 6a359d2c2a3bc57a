//! Atoms: The reactive unit of the UI.
//!
//! An atom owns:
//! - a [`VisualState`] (geometry, style, content),
//! - a visibility flag whose transitions fire `Shown` / `Hidden`,
//! - an ordered list of [`UpdateRule`]s registered once during init,
//! - a [`LockState`] that defers repaints while batching.
//!
//! Atoms are stored and driven by the [`Manager`](crate::Manager); this
//! module holds the per-atom data and the rule application step.

mod lock;
pub mod preset;
mod rule;
mod state;

pub use lock::{LockState, Unlock};
pub use rule::{Patch, PatchContext, UpdateRule};
pub use state::{GeometryPatch, StatePatch, StylePatch, VisualState};

use crate::event::{Event, EventKind, Source};
use std::collections::HashMap;

/// Identifier of an atom within its manager.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AtomId(usize);

impl AtomId {
    /// Create an atom ID from its registration index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Registration index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One reactive UI component.
#[derive(Debug)]
pub struct Atom {
    id: AtomId,
    name: String,
    state: VisualState,
    visible: bool,
    lock: LockState,
    rules: Vec<UpdateRule>,
    /// Set once `init` has run.
    ready: bool,
}

impl Atom {
    pub(crate) fn new(id: AtomId, name: String, state: VisualState, visible: bool) -> Self {
        Self {
            id,
            name,
            state,
            visible,
            lock: LockState::new(),
            rules: Vec::new(),
            ready: false,
        }
    }

    /// This atom's ID.
    pub const fn id(&self) -> AtomId {
        self.id
    }

    /// Logical name siblings look this atom up by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current visual state, kept up to date even while hidden or locked.
    pub const fn state(&self) -> &VisualState {
        &self.state
    }

    /// Whether the atom is shown.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Render lock counter.
    pub const fn lock_state(&self) -> &LockState {
        &self.lock
    }

    /// Registered rules, in registration order.
    pub fn rules(&self) -> &[UpdateRule] {
        &self.rules
    }

    /// Whether `init` has run.
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    pub(crate) const fn state_mut(&mut self) -> &mut VisualState {
        &mut self.state
    }

    pub(crate) const fn lock_mut(&mut self) -> &mut LockState {
        &mut self.lock
    }

    /// Set the visibility flag. Returns `true` if it changed.
    pub(crate) const fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    pub(crate) const fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub(crate) fn update_on(&mut self, source: Source, kind: EventKind, patch: Patch) {
        if self.ready {
            tracing::debug!(
                atom = %self.name,
                %source,
                ?kind,
                "rule registered after init; it merges after all earlier rules"
            );
        }
        self.rules.push(UpdateRule { source, kind, patch });
    }

    /// Merge every rule matching `event` into the state, in registration
    /// order, so later rules win on overlapping keys.
    ///
    /// Returns the number of rules applied.
    pub(crate) fn apply_matching(&mut self, event: &Event, ctx: &PatchContext<'_>) -> usize {
        let mut applied = 0;
        for rule in self.rules.iter().filter(|rule| rule.matches(event)) {
            self.state.apply(&rule.patch.evaluate(ctx));
            applied += 1;
        }
        applied
    }
}

/// Registration context handed to an atom's init closure.
///
/// ```
/// use atoms::{atom::preset, display::RecordingDisplay, EventKind, Manager, Source, VisualState};
///
/// let mut manager = Manager::new(RecordingDisplay::new(), Default::default());
/// let channels = manager.add_atom("channels", VisualState::default(), false)?;
/// let messages = manager.add_atom("messages", VisualState::default(), true)?;
///
/// manager.init_atom(messages, |init| {
///     if let Some(channels) = init.sibling("channels") {
///         init.update_on(Source::Atom(channels), EventKind::Shown, preset::shrink())
///             .update_on(Source::Atom(channels), EventKind::Hidden, preset::expand());
///     }
///     Ok(())
/// })?;
/// # let _ = channels;
/// # Ok::<(), atoms::Error>(())
/// ```
pub struct AtomInit<'a> {
    atom: &'a mut Atom,
    names: &'a HashMap<String, AtomId>,
}

impl<'a> AtomInit<'a> {
    pub(crate) fn new(atom: &'a mut Atom, names: &'a HashMap<String, AtomId>) -> Self {
        Self { atom, names }
    }

    /// The atom being initialized.
    pub const fn id(&self) -> AtomId {
        self.atom.id
    }

    /// Its current state.
    pub const fn state(&self) -> &VisualState {
        &self.atom.state
    }

    /// Resolve a sibling atom by name.
    pub fn sibling(&self, name: &str) -> Option<AtomId> {
        self.names.get(name).copied()
    }

    /// Register "when `kind` fires on `source`, merge `patch`".
    pub fn update_on(
        &mut self,
        source: Source,
        kind: EventKind,
        patch: impl Into<Patch>,
    ) -> &mut Self {
        self.atom.update_on(source, kind, patch.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Dimension;
    use crate::style::Color;
    use crate::theme::ThemeData;

    fn atom() -> Atom {
        Atom::new(AtomId::new(0), "messages".to_string(), VisualState::default(), true)
    }

    #[test]
    fn test_last_registered_rule_wins() {
        let channels = AtomId::new(1);
        let mut atom = atom();
        atom.update_on(
            Source::Atom(channels),
            EventKind::Shown,
            StatePatch::new().fg(Color::Ansi(1)).left(Dimension::cells(4)).into(),
        );
        atom.update_on(
            Source::Atom(channels),
            EventKind::Shown,
            StatePatch::new().fg(Color::Ansi(2)).into(),
        );

        let theme = ThemeData::dark();
        let applied = atom.apply_matching(
            &Event::lifecycle(channels, EventKind::Shown),
            &PatchContext { theme: &theme },
        );

        assert_eq!(applied, 2);
        assert_eq!(atom.state().style.fg, Color::Ansi(2));
        assert_eq!(atom.state().geometry.left, Dimension::cells(4));
    }

    #[test]
    fn test_non_matching_event_changes_nothing() {
        let mut atom = atom();
        atom.update_on(Source::App, EventKind::ThemeChanged, Patch::themed("messages"));

        let theme = ThemeData::dark();
        let before = atom.state().clone();
        let applied = atom.apply_matching(
            &Event::lifecycle(AtomId::new(3), EventKind::Shown),
            &PatchContext { theme: &theme },
        );
        assert_eq!(applied, 0);
        assert_eq!(atom.state(), &before);
    }

    #[test]
    fn test_visibility_transition_reporting() {
        let mut atom = atom();
        assert!(!atom.set_visible(true));
        assert!(atom.set_visible(false));
        assert!(!atom.is_visible());
    }
}
