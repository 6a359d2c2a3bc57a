//! Visual state and partial-state patches.

use crate::layout::{Dimension, Geometry};
use crate::style::{Color, Style};

/// The mutable, renderable state of one atom.
///
/// Only the owning atom changes it: by applying a matching patch, or through
/// its own content operations.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct VisualState {
    /// Position and size, unresolved.
    pub geometry: Geometry,
    /// Foreground/background colors.
    pub style: Style,
    /// Rendered payload, one line per `\n`-separated segment.
    pub content: String,
}

impl VisualState {
    /// Create a state with empty content.
    pub fn new(geometry: Geometry, style: Style) -> Self {
        Self {
            geometry,
            style,
            content: String::new(),
        }
    }

    /// Shallow-merge `patch` into this state.
    ///
    /// Top-level keys are replaced; `geometry` and `style` merge one level
    /// deep so a patch touching `top` leaves `width` alone.
    pub fn apply(&mut self, patch: &StatePatch) {
        patch.geometry.apply_to(&mut self.geometry);
        patch.style.apply_to(&mut self.style);
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
    }

    /// Append one line to content that already holds `preceding` lines.
    pub(crate) fn push_line(&mut self, line: &str, preceding: usize) {
        if preceding > 0 {
            self.content.push('\n');
        }
        self.content.push_str(line);
    }
}

/// Partial geometry; `None` keys are left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GeometryPatch {
    /// New top offset.
    pub top: Option<Dimension>,
    /// New left offset.
    pub left: Option<Dimension>,
    /// New width.
    pub width: Option<Dimension>,
    /// New height.
    pub height: Option<Dimension>,
    /// New padding.
    pub padding: Option<u16>,
}

impl GeometryPatch {
    fn apply_to(&self, geometry: &mut Geometry) {
        merge(&mut geometry.top, self.top);
        merge(&mut geometry.left, self.left);
        merge(&mut geometry.width, self.width);
        merge(&mut geometry.height, self.height);
        merge(&mut geometry.padding, self.padding);
    }

    #[must_use]
    fn or(self, earlier: Self) -> Self {
        Self {
            top: self.top.or(earlier.top),
            left: self.left.or(earlier.left),
            width: self.width.or(earlier.width),
            height: self.height.or(earlier.height),
            padding: self.padding.or(earlier.padding),
        }
    }
}

/// Partial style; `None` keys are left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StylePatch {
    /// New foreground color.
    pub fg: Option<Color>,
    /// New background color.
    pub bg: Option<Color>,
}

impl StylePatch {
    fn apply_to(&self, style: &mut Style) {
        merge(&mut style.fg, self.fg);
        merge(&mut style.bg, self.bg);
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// A partial [`VisualState`].
///
/// Built with the chaining setters:
///
/// ```
/// use atoms::{Dimension, StatePatch};
///
/// let below_header = StatePatch::new()
///     .top(Dimension::relative(0.0, 3))
///     .height(Dimension::relative(100.0, -6));
/// assert!(below_header.style.fg.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StatePatch {
    /// Geometry keys to replace.
    pub geometry: GeometryPatch,
    /// Style keys to replace.
    pub style: StylePatch,
    /// Replacement content.
    pub content: Option<String>,
}

impl StatePatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `top`.
    #[must_use]
    pub fn top(mut self, top: Dimension) -> Self {
        self.geometry.top = Some(top);
        self
    }

    /// Set `left`.
    #[must_use]
    pub fn left(mut self, left: Dimension) -> Self {
        self.geometry.left = Some(left);
        self
    }

    /// Set `width`.
    #[must_use]
    pub fn width(mut self, width: Dimension) -> Self {
        self.geometry.width = Some(width);
        self
    }

    /// Set `height`.
    #[must_use]
    pub fn height(mut self, height: Dimension) -> Self {
        self.geometry.height = Some(height);
        self
    }

    /// Set `padding`.
    #[must_use]
    pub fn padding(mut self, padding: u16) -> Self {
        self.geometry.padding = Some(padding);
        self
    }

    /// Set the foreground color.
    #[must_use]
    pub fn fg(mut self, fg: Color) -> Self {
        self.style.fg = Some(fg);
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn bg(mut self, bg: Color) -> Self {
        self.style.bg = Some(bg);
        self
    }

    /// Set both colors.
    #[must_use]
    pub fn style(self, style: Style) -> Self {
        self.fg(style.fg).bg(style.bg)
    }

    /// Replace the content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Compose two patches; keys set in `later` win.
    #[must_use]
    pub fn then(self, later: Self) -> Self {
        Self {
            geometry: later.geometry.or(self.geometry),
            style: StylePatch {
                fg: later.style.fg.or(self.style.fg),
                bg: later.style.bg.or(self.style.bg),
            },
            content: later.content.or(self.content),
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_merges_one_level_deep() {
        let style = Style::new(Color::Ansi(7), Color::Ansi(0));
        let mut state = VisualState::new(Geometry::default(), style);
        state.apply(&StatePatch::new().top(Dimension::cells(3)).fg(Color::Ansi(1)));

        assert_eq!(state.geometry.top, Dimension::cells(3));
        assert_eq!(state.geometry.width, Dimension::percent(100.0));
        assert_eq!(state.geometry.padding, 0);
        assert_eq!(state.style, Style::new(Color::Ansi(1), Color::Ansi(0)));
        assert!(state.content.is_empty());
    }

    #[test]
    fn test_apply_replaces_content() {
        let mut state = VisualState::default();
        state.push_line("old", 0);
        state.apply(&StatePatch::new().content("new"));
        assert_eq!(state.content, "new");
    }

    #[test]
    fn test_then_is_last_writer_wins() {
        let first = StatePatch::new().fg(Color::Ansi(1)).left(Dimension::cells(2));
        let second = StatePatch::new().fg(Color::Ansi(2));
        let combined = first.then(second);

        assert_eq!(combined.style.fg, Some(Color::Ansi(2)));
        assert_eq!(combined.geometry.left, Some(Dimension::cells(2)));
    }

    #[test]
    fn test_push_line_keeps_empty_lines() {
        let mut state = VisualState::default();
        state.push_line("", 0);
        state.push_line("b", 1);
        assert_eq!(state.content, "\nb");
        assert!(StatePatch::new().is_empty());
    }
}
