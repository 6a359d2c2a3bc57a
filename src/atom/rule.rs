//! Update rules: "when `kind` fires on `source`, apply `patch`".

use super::state::StatePatch;
use crate::event::{Event, EventKind, Source};
use crate::theme::ThemeData;
use std::fmt;

/// Read-only view of application state a derived patch is evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct PatchContext<'a> {
    /// The theme active at dispatch time.
    pub theme: &'a ThemeData,
}

type PatchFn = Box<dyn Fn(&PatchContext<'_>) -> StatePatch>;

/// What a rule applies when it fires.
pub enum Patch {
    /// A fixed partial state.
    Literal(StatePatch),
    /// Computed from the current application state each time the rule fires.
    Derived(PatchFn),
}

impl Patch {
    /// Wrap a function evaluated at dispatch time.
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&PatchContext<'_>) -> StatePatch + 'static,
    {
        Self::Derived(Box::new(f))
    }

    /// Re-derive `style` from `component`'s colors in the active theme.
    pub fn themed(component: impl Into<String>) -> Self {
        let component = component.into();
        Self::derived(move |ctx| StatePatch::new().style(ctx.theme.component(&component).style()))
    }

    /// Produce the partial state to merge.
    pub fn evaluate(&self, ctx: &PatchContext<'_>) -> StatePatch {
        match self {
            Self::Literal(patch) => patch.clone(),
            Self::Derived(f) => f(ctx),
        }
    }
}

impl From<StatePatch> for Patch {
    fn from(patch: StatePatch) -> Self {
        Self::Literal(patch)
    }
}

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(patch) => f.debug_tuple("Literal").field(patch).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// A `(source, kind, patch)` binding registered by an atom.
#[derive(Debug)]
pub struct UpdateRule {
    /// Who must raise the event.
    pub source: Source,
    /// Which event.
    pub kind: EventKind,
    /// What to merge into the atom's state.
    pub patch: Patch,
}

impl UpdateRule {
    /// Whether `event` triggers this rule.
    pub fn matches(&self, event: &Event) -> bool {
        event.matches(self.source, self.kind)
    }
}
