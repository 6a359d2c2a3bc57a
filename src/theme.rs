//! Theme data: Per-component color pairs.
//!
//! A theme maps a component name (`"messages"`, `"header"`, ...) to the
//! foreground/background colors that component is painted with. Atoms never
//! read a theme directly; they register derived patches that are evaluated
//! against the manager's current theme when `ThemeChanged` fires.

use crate::style::{Color, Rgb, Style};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Colors for one component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentTheme {
    /// Text color.
    pub foreground_color: Color,
    /// Fill color.
    pub background_color: Color,
}

impl ComponentTheme {
    /// Create a component theme from a color pair.
    pub const fn new(foreground_color: Color, background_color: Color) -> Self {
        Self {
            foreground_color,
            background_color,
        }
    }

    /// The style an atom painted with this component's colors uses.
    pub const fn style(&self) -> Style {
        Style::new(self.foreground_color, self.background_color)
    }
}

/// A named set of component colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeData {
    /// Theme name, reported with `ThemeChanged`.
    pub name: String,
    /// Colors by component name.
    pub components: BTreeMap<String, ComponentTheme>,
}

impl Default for ThemeData {
    fn default() -> Self {
        Self::dark()
    }
}

impl ThemeData {
    /// Create an empty theme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: BTreeMap::new(),
        }
    }

    /// Set a component's colors (builder pattern).
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, colors: ComponentTheme) -> Self {
        self.components.insert(name.into(), colors);
        self
    }

    /// Colors for `component`, if the theme defines them.
    pub fn get(&self, component: &str) -> Option<&ComponentTheme> {
        self.components.get(component)
    }

    /// Colors for `component`, falling back to terminal defaults.
    pub fn component(&self, component: &str) -> ComponentTheme {
        self.get(component).copied().unwrap_or_else(|| {
            tracing::warn!(theme = %self.name, component, "theme has no colors for component");
            ComponentTheme::default()
        })
    }

    /// Look up a built-in theme by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Light text on a dark background.
    pub fn dark() -> Self {
        let text = Color::Rgb(Rgb::from_u32(0x00d0_d0d0));
        let base = Color::Rgb(Rgb::from_u32(0x001c_1c1c));
        let raised = Color::Rgb(Rgb::from_u32(0x0030_3030));
        Self::new("dark")
            .with_component("messages", ComponentTheme::new(text, base))
            .with_component("header", ComponentTheme::new(Color::Ansi(15), raised))
            .with_component("channels", ComponentTheme::new(Color::Ansi(14), raised))
            .with_component("input", ComponentTheme::new(text, raised))
    }

    /// Dark text on a light background.
    pub fn light() -> Self {
        let text = Color::Rgb(Rgb::from_u32(0x0020_2020));
        let base = Color::Rgb(Rgb::from_u32(0x00fa_fafa));
        let raised = Color::Rgb(Rgb::from_u32(0x00e4_e4e4));
        Self::new("light")
            .with_component("messages", ComponentTheme::new(text, base))
            .with_component("header", ComponentTheme::new(Color::Ansi(0), raised))
            .with_component("channels", ComponentTheme::new(Color::Ansi(4), raised))
            .with_component("input", ComponentTheme::new(text, raised))
    }
}
