//! Style module: Colors, text modifiers and inline markup.
//!
//! - [`Rgb`] / [`Color`]: Terminal colors as they appear in themes
//! - [`Modifiers`]: Text attribute bitflags
//! - [`Style`]: The foreground/background pair an atom is painted with
//! - [`markup`]: Inline style tags inside content lines

pub mod markup;

use crate::error::{Error, Result};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Names of the 16 standard ANSI colors, indexed by palette number.
const ANSI_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright-black",
    "bright-red",
    "bright-green",
    "bright-yellow",
    "bright-blue",
    "bright-magenta",
    "bright-cyan",
    "bright-white",
];

/// A terminal color as written in themes and markup.
///
/// Parses from `"default"`, `"#rrggbb"`, the 16 ANSI color names
/// (`"red"`, `"bright-blue"`, `"gray"`, ...) or a palette index `"0"`..`"255"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    /// The terminal's own default color.
    #[default]
    Reset,
    /// ANSI palette index (0-255).
    Ansi(u8),
    /// Explicit true color.
    Rgb(Rgb),
}

impl Color {
    /// Palette index of a named ANSI color.
    fn named(name: &str) -> Option<u8> {
        let normalized = name.to_ascii_lowercase().replace(['_', ' '], "-");
        let normalized = normalized
            .strip_prefix("light-")
            .map_or_else(|| normalized.clone(), |rest| format!("bright-{rest}"));
        match normalized.as_str() {
            "gray" | "grey" => Some(8),
            other => ANSI_NAMES
                .iter()
                .position(|candidate| *candidate == other)
                .and_then(|index| u8::try_from(index).ok()),
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("default") || trimmed.eq_ignore_ascii_case("reset") {
            return Ok(Self::Reset);
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() == 6 {
                if let Ok(value) = u32::from_str_radix(hex, 16) {
                    return Ok(Self::Rgb(Rgb::from_u32(value)));
                }
            }
            return Err(Error::InvalidColor(input.to_string()));
        }
        if let Ok(index) = trimmed.parse::<u8>() {
            return Ok(Self::Ansi(index));
        }
        Self::named(trimmed)
            .map(Self::Ansi)
            .ok_or_else(|| Error::InvalidColor(input.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => f.write_str("default"),
            Self::Ansi(index) => match ANSI_NAMES.get(usize::from(*index)) {
                Some(name) => f.write_str(name),
                None => write!(f, "{index}"),
            },
            Self::Rgb(rgb) => write!(f, "{rgb:?}"),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Reset => Self::Reset,
            Color::Ansi(index) => Self::AnsiValue(index),
            Color::Rgb(Rgb { r, g, b }) => Self::Rgb { r, g, b },
        }
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use atoms::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Italic text
        const ITALIC = 0b0000_0010;
        /// Underlined text
        const UNDERLINE = 0b0000_0100;
        /// Blinking text
        const BLINK = 0b0000_1000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0001_0000;
        /// Hidden/invisible text
        const HIDDEN = 0b0010_0000;
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl Modifiers {
    /// SGR attributes for the set flags, in a stable order.
    pub fn attributes(self) -> impl Iterator<Item = crossterm::style::Attribute> {
        use crossterm::style::Attribute;
        [
            (Self::BOLD, Attribute::Bold),
            (Self::ITALIC, Attribute::Italic),
            (Self::UNDERLINE, Attribute::Underlined),
            (Self::BLINK, Attribute::SlowBlink),
            (Self::REVERSED, Attribute::Reverse),
            (Self::HIDDEN, Attribute::Hidden),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, attribute)| attribute)
    }
}

/// Foreground/background color pair of an atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
}

impl Style {
    /// Create a style from a color pair.
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }
}
