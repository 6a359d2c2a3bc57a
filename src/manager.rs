//! Manager: The atom registry and its dispatch loop.
//!
//! The manager owns every atom, the active theme snapshot, the event bus and
//! the display sink. All mutation funnels through it, so dispatch is a plain
//! synchronous loop:
//!
//! 1. every atom merges its matching rules, in registration order
//! 2. each patched atom renders once (or defers, if locked)
//! 3. bus handlers and taps observe the event
//!
//! Nothing is queued: when `emit` returns, every effect of the event is
//! visible.

use crate::atom::{Atom, AtomId, AtomInit, Patch, PatchContext, Unlock, VisualState};
use crate::display::Display;
use crate::error::{Error, Result};
use crate::event::{Event, EventBus, EventKind, Payload, Source, SubscriptionId};
use crate::theme::ThemeData;
use crossbeam_channel::Receiver;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Atom registry, theme holder and event dispatcher.
pub struct Manager<D: Display> {
    atoms: Vec<Atom>,
    names: HashMap<String, AtomId>,
    theme: ThemeData,
    bus: EventBus,
    display: D,
}

impl<D: Display> Manager<D> {
    /// Create an empty manager painting to `display`.
    pub fn new(display: D, theme: ThemeData) -> Self {
        Self {
            atoms: Vec::new(),
            names: HashMap::new(),
            theme,
            bus: EventBus::new(),
            display,
        }
    }

    /// Register an atom under a unique name.
    ///
    /// The display learns about the atom's initial state and visibility, but
    /// nothing is repainted.
    pub fn add_atom(
        &mut self,
        name: impl Into<String>,
        state: VisualState,
        visible: bool,
    ) -> Result<AtomId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(Error::DuplicateAtom(name));
        }

        let id = AtomId::new(self.atoms.len());
        self.display.apply(id, &state)?;
        self.display.set_visible(id, visible)?;

        tracing::debug!(atom = %name, id = id.index(), visible, "atom registered");
        self.names.insert(name.clone(), id);
        self.atoms.push(Atom::new(id, name, state, visible));
        Ok(id)
    }

    /// Run an atom's one-time initialization.
    ///
    /// `f` registers the atom's update rules. A second call for the same
    /// atom fails with [`Error::AlreadyInitialized`]; if `f` fails the atom
    /// stays uninitialized and keeps whatever rules were registered.
    pub fn init_atom<F>(&mut self, id: AtomId, f: F) -> Result<()>
    where
        F: FnOnce(&mut AtomInit<'_>) -> Result<()>,
    {
        let atom = self
            .atoms
            .get_mut(id.index())
            .ok_or_else(|| Error::UnknownAtom(format!("#{}", id.index())))?;
        if atom.is_ready() {
            return Err(Error::AlreadyInitialized(atom.name().to_string()));
        }

        {
            let mut init = AtomInit::new(atom, &self.names);
            f(&mut init)?;
        }
        atom.mark_ready();

        tracing::debug!(atom = atom.name(), rules = atom.rules().len(), "atom initialized");
        Ok(())
    }

    /// Register a rule outside of `init`.
    ///
    /// Allowed at any time; the rule merges after all earlier ones.
    pub fn update_on(
        &mut self,
        id: AtomId,
        source: Source,
        kind: EventKind,
        patch: impl Into<Patch>,
    ) -> Result<()> {
        self.atom_mut(id)?.update_on(source, kind, patch.into());
        Ok(())
    }

    /// Look up an atom.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id.index())
    }

    /// Resolve an atom by name.
    pub fn id_of(&self, name: &str) -> Option<AtomId> {
        self.names.get(name).copied()
    }

    /// All atoms in registration order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    /// The active theme snapshot.
    pub const fn theme(&self) -> &ThemeData {
        &self.theme
    }

    /// The display sink.
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display sink.
    pub const fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The event bus, for registering observers.
    pub const fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Shorthand for `bus_mut().on(kind, callback)`.
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.bus.on(kind, callback)
    }

    /// Shorthand for `bus_mut().tap()`.
    pub fn tap(&mut self) -> Receiver<Event> {
        self.bus.tap()
    }

    pub(crate) fn atom_mut(&mut self, id: AtomId) -> Result<&mut Atom> {
        self.atoms
            .get_mut(id.index())
            .ok_or_else(|| Error::UnknownAtom(format!("#{}", id.index())))
    }

    fn atom_ref(&self, id: AtomId) -> Result<&Atom> {
        self.atom(id)
            .ok_or_else(|| Error::UnknownAtom(format!("#{}", id.index())))
    }

    fn name_of(&self, id: AtomId) -> &str {
        self.atom(id).map_or("?", Atom::name)
    }

    /// Dispatch one event synchronously.
    ///
    /// A failing render is logged and does not stop the pass; the first
    /// failure is returned once every atom and observer has seen the event.
    pub fn emit(&mut self, event: Event) -> Result<()> {
        tracing::trace!(source = %event.source, kind = ?event.kind, "dispatch");

        let ctx = PatchContext { theme: &self.theme };
        let patched: Vec<AtomId> = self
            .atoms
            .iter_mut()
            .filter_map(|atom| (atom.apply_matching(&event, &ctx) > 0).then_some(atom.id()))
            .collect();

        let mut first_error = None;
        for id in patched {
            if let Err(err) = self.render(id) {
                tracing::error!(
                    atom = self.name_of(id),
                    error = %err,
                    "render failed during dispatch"
                );
                first_error.get_or_insert(err);
            }
        }

        self.bus.publish(&event);
        first_error.map_or(Ok(()), Err)
    }

    /// Push an atom's state to the display and repaint.
    ///
    /// Deferred while the atom is locked. A hidden atom keeps its state
    /// current but is not repainted.
    pub fn render(&mut self, id: AtomId) -> Result<()> {
        let atom = self
            .atoms
            .get(id.index())
            .ok_or_else(|| Error::UnknownAtom(format!("#{}", id.index())))?;

        if atom.lock_state().is_locked() {
            tracing::trace!(atom = atom.name(), "render deferred while locked");
            self.atom_mut(id)?.lock_mut().defer();
            return Ok(());
        }
        if !atom.is_visible() {
            tracing::trace!(atom = atom.name(), "render skipped while hidden");
            return Ok(());
        }

        tracing::trace!(atom = atom.name(), "render");
        self.display.apply(id, atom.state())?;
        self.display.repaint()?;
        Ok(())
    }

    /// Make an atom visible, fire `Shown` and render it.
    pub fn show(&mut self, id: AtomId) -> Result<()> {
        self.set_visible(id, true)
    }

    /// Hide an atom, fire `Hidden` and repaint without it.
    pub fn hide(&mut self, id: AtomId) -> Result<()> {
        self.set_visible(id, false)
    }

    /// Flip an atom's visibility.
    pub fn toggle(&mut self, id: AtomId) -> Result<()> {
        let visible = self.atom_ref(id)?.is_visible();
        self.set_visible(id, !visible)
    }

    fn set_visible(&mut self, id: AtomId, visible: bool) -> Result<()> {
        if self.atom_ref(id)?.is_visible() == visible {
            return Ok(());
        }
        self.display.set_visible(id, visible)?;
        self.atom_mut(id)?.set_visible(visible);

        let kind = if visible { EventKind::Shown } else { EventKind::Hidden };
        tracing::debug!(atom = self.name_of(id), ?kind, "visibility changed");

        let dispatched = self.emit(Event::lifecycle(id, kind));
        let painted = if visible {
            self.render(id)
        } else {
            self.display.repaint().map_err(Error::from)
        };
        dispatched.and(painted)
    }

    /// Increment an atom's render lock.
    pub fn lock(&mut self, id: AtomId) -> Result<()> {
        self.atom_mut(id)?.lock_mut().lock();
        Ok(())
    }

    /// Decrement an atom's render lock.
    ///
    /// Renders once if the lock is released and a render was requested
    /// while it was held. An unlock without a matching lock is logged and
    /// ignored.
    pub fn unlock(&mut self, id: AtomId) -> Result<()> {
        let outcome = self.atom_mut(id)?.lock_mut().unlock();
        match outcome {
            Unlock::StillLocked | Unlock::Released { pending: false } => Ok(()),
            Unlock::Released { pending: true } => self.render(id),
            Unlock::Imbalanced => {
                tracing::warn!(atom = self.name_of(id), "unlock without matching lock ignored");
                Ok(())
            }
        }
    }

    /// Lock an atom for the lifetime of the returned guard.
    ///
    /// The guard derefs to the manager, so the batch runs through it:
    ///
    /// ```
    /// use atoms::{display::RecordingDisplay, Manager, VisualState};
    ///
    /// let mut manager = Manager::new(RecordingDisplay::new(), Default::default());
    /// let id = manager.add_atom("log", VisualState::default(), true)?;
    ///
    /// let mut guard = manager.render_lock(id)?;
    /// guard.render(id)?;
    /// guard.render(id)?;
    /// guard.release()?;
    ///
    /// assert_eq!(manager.display().repaints(), 1);
    /// # Ok::<(), atoms::Error>(())
    /// ```
    pub fn render_lock(&mut self, id: AtomId) -> Result<RenderGuard<'_, D>> {
        self.lock(id)?;
        Ok(RenderGuard {
            manager: self,
            id,
            released: false,
        })
    }

    /// Replace the theme and fire `ThemeChanged`.
    pub fn set_theme(&mut self, theme: ThemeData) -> Result<()> {
        let name = theme.name.clone();
        tracing::debug!(theme = %name, "theme changed");
        self.theme = theme;
        self.emit(Event::new(Source::App, EventKind::ThemeChanged, Payload::Theme(name)))
    }
}

impl<D: Display + fmt::Debug> fmt::Debug for Manager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("atoms", &self.atoms.len())
            .field("theme", &self.theme.name)
            .field("bus", &self.bus)
            .field("display", &self.display)
            .finish()
    }
}

/// Scoped render lock returned by [`Manager::render_lock`].
///
/// Unlocks on [`release`](Self::release) or, failing that, on drop, so an
/// early return or panic inside the batch cannot leave the atom locked.
pub struct RenderGuard<'m, D: Display> {
    manager: &'m mut Manager<D>,
    id: AtomId,
    released: bool,
}

impl<D: Display> RenderGuard<'_, D> {
    /// The locked atom.
    pub const fn id(&self) -> AtomId {
        self.id
    }

    /// Unlock now and report any error from the deferred render.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.manager.unlock(self.id)
    }
}

impl<D: Display> Deref for RenderGuard<'_, D> {
    type Target = Manager<D>;

    fn deref(&self) -> &Self::Target {
        self.manager
    }
}

impl<D: Display> DerefMut for RenderGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.manager
    }
}

impl<D: Display> Drop for RenderGuard<'_, D> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.manager.unlock(self.id) {
            tracing::error!(
                atom = self.manager.name_of(self.id),
                error = %err,
                "deferred render failed on guard drop"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{preset, StatePatch};
    use crate::display::RecordingDisplay;
    use crate::layout::{Dimension, Geometry};
    use crate::style::Color;
    use crate::theme::ComponentTheme;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manager() -> Manager<RecordingDisplay> {
        Manager::new(RecordingDisplay::new(), ThemeData::dark())
    }

    #[test]
    fn test_shown_applies_patch_and_renders() {
        let mut m = manager();
        let channels = m.add_atom("channels", VisualState::default(), false).unwrap();
        let messages = m.add_atom("messages", VisualState::default(), true).unwrap();
        m.init_atom(messages, |init| {
            init.update_on(Source::Atom(channels), EventKind::Shown, preset::shrink());
            Ok(())
        })
        .unwrap();

        let mut expected = m.atom(messages).unwrap().state().clone();
        expected.apply(&preset::shrink());

        m.show(channels).unwrap();

        assert_eq!(m.atom(messages).unwrap().state(), &expected);
        assert_eq!(m.display().last_applied(messages), Some(&expected));
        // One for `messages` during dispatch, one for `channels` itself.
        assert_eq!(m.display().repaints(), 2);
    }

    #[test]
    fn test_last_writer_wins_across_rules() {
        let mut m = manager();
        let header = m.add_atom("header", VisualState::default(), false).unwrap();
        let messages = m.add_atom("messages", VisualState::default(), true).unwrap();
        m.init_atom(messages, |init| {
            init.update_on(
                Source::Atom(header),
                EventKind::Shown,
                StatePatch::new().fg(Color::Ansi(1)).top(Dimension::cells(3)),
            )
            .update_on(
                Source::Atom(header),
                EventKind::Shown,
                StatePatch::new().fg(Color::Ansi(2)),
            );
            Ok(())
        })
        .unwrap();

        m.show(header).unwrap();

        let state = m.atom(messages).unwrap().state();
        assert_eq!(state.style.fg, Color::Ansi(2));
        assert_eq!(state.geometry.top, Dimension::cells(3));
    }

    #[test]
    fn test_show_hide_round_trip_restores_geometry() {
        let mut m = manager();
        let channels = m.add_atom("channels", VisualState::default(), false).unwrap();
        let messages = m.add_atom("messages", VisualState::default(), true).unwrap();
        m.init_atom(messages, |init| {
            let channels = init.sibling("channels").unwrap();
            init.update_on(Source::Atom(channels), EventKind::Shown, preset::shrink())
                .update_on(Source::Atom(channels), EventKind::Hidden, preset::expand());
            Ok(())
        })
        .unwrap();
        let original = m.atom(messages).unwrap().state().geometry;

        m.show(channels).unwrap();
        assert_eq!(m.atom(messages).unwrap().state().geometry.left, Dimension::percent(25.0));

        m.hide(channels).unwrap();
        assert_eq!(m.atom(messages).unwrap().state().geometry, original);
    }

    #[test]
    fn test_visibility_events_fire_on_transitions_only() {
        let mut m = manager();
        let id = m.add_atom("header", VisualState::default(), false).unwrap();
        let rx = m.tap();

        m.show(id).unwrap();
        m.show(id).unwrap();
        m.toggle(id).unwrap();
        m.hide(id).unwrap();

        let kinds: Vec<_> = rx.try_iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![EventKind::Shown, EventKind::Hidden]);
        assert_eq!(m.display().is_visible(id), Some(false));
    }

    #[test]
    fn test_hidden_atom_keeps_state_without_repaint() {
        let mut m = manager();
        let header = m.add_atom("header", VisualState::default(), false).unwrap();
        let messages = m.add_atom("messages", VisualState::default(), false).unwrap();
        m.update_on(messages, Source::Atom(header), EventKind::Shown, preset::below_header())
            .unwrap();

        m.show(header).unwrap();
        assert_eq!(m.atom(messages).unwrap().state().geometry.top, Dimension::relative(0.0, 3));
        // Only `header` itself was repainted.
        assert_eq!(m.display().repaints(), 1);

        m.show(messages).unwrap();
        assert_eq!(
            m.display().last_applied(messages).map(|state| state.geometry.top),
            Some(Dimension::relative(0.0, 3))
        );
    }

    #[test]
    fn test_lock_balance_and_clamping() {
        let mut m = manager();
        let id = m.add_atom("log", VisualState::default(), true).unwrap();

        m.lock(id).unwrap();
        m.lock(id).unwrap();
        m.render(id).unwrap();
        m.unlock(id).unwrap();
        assert_eq!(m.display().repaints(), 0);
        m.unlock(id).unwrap();
        assert_eq!(m.display().repaints(), 1);

        m.unlock(id).unwrap();
        assert_eq!(m.atom(id).unwrap().lock_state().depth(), 0);

        m.render(id).unwrap();
        assert_eq!(m.display().repaints(), 2);
    }

    #[test]
    fn test_unlock_without_pending_render_is_silent() {
        let mut m = manager();
        let id = m.add_atom("log", VisualState::default(), true).unwrap();
        m.lock(id).unwrap();
        m.unlock(id).unwrap();
        assert_eq!(m.display().repaints(), 0);
    }

    #[test]
    fn test_guard_drop_unlocks_on_early_return() {
        fn batch(m: &mut Manager<RecordingDisplay>, id: AtomId) -> Result<()> {
            let mut guard = m.render_lock(id)?;
            guard.render(id)?;
            Err(Error::UnknownAtom("bail".to_string()))
        }

        let mut m = manager();
        let id = m.add_atom("log", VisualState::default(), true).unwrap();
        assert!(batch(&mut m, id).is_err());

        assert!(!m.atom(id).unwrap().lock_state().is_locked());
        assert_eq!(m.display().repaints(), 1);
    }

    #[test]
    fn test_init_runs_once() {
        let mut m = manager();
        let id = m.add_atom("messages", VisualState::default(), true).unwrap();
        m.init_atom(id, |_| Ok(())).unwrap();
        assert!(m.atom(id).unwrap().is_ready());

        let err = m.init_atom(id, |_| Ok(())).unwrap_err();
        assert!(matches!(err, Error::AlreadyInitialized(name) if name == "messages"));
    }

    #[test]
    fn test_duplicate_and_unknown_atoms() {
        let mut m = manager();
        m.add_atom("messages", VisualState::default(), true).unwrap();
        assert!(matches!(
            m.add_atom("messages", VisualState::default(), true),
            Err(Error::DuplicateAtom(_))
        ));
        assert!(matches!(m.render(AtomId::new(9)), Err(Error::UnknownAtom(_))));
        assert_eq!(m.id_of("messages"), Some(AtomId::new(0)));
        assert_eq!(m.id_of("header"), None);
    }

    #[test]
    fn test_theme_change_rederives_style_lazily() {
        let mut m = manager();
        let style = ThemeData::dark().component("messages").style();
        let id = m
            .add_atom("messages", VisualState::new(Geometry::default(), style), true)
            .unwrap();
        m.update_on(id, Source::App, EventKind::ThemeChanged, Patch::themed("messages"))
            .unwrap();

        let custom = ThemeData::new("custom")
            .with_component("messages", ComponentTheme::new(Color::Ansi(3), Color::Ansi(4)));
        m.set_theme(custom).unwrap();

        let style = m.atom(id).unwrap().state().style;
        assert_eq!(style.fg, Color::Ansi(3));
        assert_eq!(style.bg, Color::Ansi(4));
        assert_eq!(m.theme().name, "custom");
    }

    #[test]
    fn test_observers_run_after_rules() {
        let mut m = manager();
        let channels = m.add_atom("channels", VisualState::default(), false).unwrap();
        let messages = m.add_atom("messages", VisualState::default(), true).unwrap();
        m.update_on(messages, Source::Atom(channels), EventKind::Shown, preset::shrink())
            .unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        m.on(EventKind::Shown, move |event| log.borrow_mut().push(event.source));

        m.show(channels).unwrap();
        assert_eq!(*seen.borrow(), vec![Source::Atom(channels)]);
    }

    #[test]
    fn test_failed_render_is_reported_after_full_dispatch() {
        let mut m = manager();
        let channels = m.add_atom("channels", VisualState::default(), false).unwrap();
        let a = m.add_atom("a", VisualState::default(), true).unwrap();
        let b = m.add_atom("b", VisualState::default(), true).unwrap();
        for id in [a, b] {
            m.update_on(id, Source::Atom(channels), EventKind::Shown, preset::shrink())
                .unwrap();
        }

        m.display_mut().fail_repaints(true);
        let rx = m.tap();
        assert!(matches!(m.show(channels), Err(Error::Display(_))));

        // Both atoms were patched and observers still ran.
        assert_eq!(m.atom(b).unwrap().state().geometry.left, Dimension::percent(25.0));
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_failed_visibility_update_keeps_atom_hidden() {
        let mut m = manager();
        let channels = m.add_atom("channels", VisualState::default(), false).unwrap();
        let messages = m.add_atom("messages", VisualState::default(), true).unwrap();
        m.update_on(messages, Source::Atom(channels), EventKind::Shown, preset::shrink())
            .unwrap();
        let rx = m.tap();

        m.display_mut().fail_visibility(true);
        assert!(matches!(m.show(channels), Err(Error::Display(_))));
        assert!(!m.atom(channels).unwrap().is_visible());
        assert_eq!(rx.try_iter().count(), 0);

        m.display_mut().fail_visibility(false);
        m.show(channels).unwrap();

        assert!(m.atom(channels).unwrap().is_visible());
        assert_eq!(m.display().is_visible(channels), Some(true));
        let kinds: Vec<EventKind> = rx.try_iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![EventKind::Shown]);
        assert_eq!(m.atom(messages).unwrap().state().geometry.left, Dimension::percent(25.0));
    }
}
