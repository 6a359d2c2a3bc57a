//! Dimension: A percentage-or-offset position/size descriptor.
//!
//! Geometry is written the way terminal layout strings usually are:
//! `"10"` is ten cells, `"25%"` is a quarter of the parent extent and
//! `"100%-3"` / `"0%+3"` add a signed cell offset to a percentage.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single position or size value, resolved against a parent extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DimensionRepr", into = "DimensionRepr")]
pub enum Dimension {
    /// Absolute number of terminal cells.
    Cells(u16),
    /// Percentage of the parent extent plus a signed cell offset.
    Relative {
        /// Percentage of the parent extent (0-100, larger values overflow).
        percent: f32,
        /// Cells added after taking the percentage.
        offset: i32,
    },
}

impl Dimension {
    /// Absolute cell count.
    pub const fn cells(cells: u16) -> Self {
        Self::Cells(cells)
    }

    /// Plain percentage with no offset.
    pub const fn percent(percent: f32) -> Self {
        Self::Relative { percent, offset: 0 }
    }

    /// Percentage plus a signed cell offset (`"100%-3"` is `relative(100.0, -3)`).
    pub const fn relative(percent: f32, offset: i32) -> Self {
        Self::Relative { percent, offset }
    }

    /// Resolve to a cell count within `extent`.
    ///
    /// The result is clamped to `[0, extent]`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn resolve(&self, extent: u16) -> u16 {
        match *self {
            Self::Cells(cells) => cells.min(extent),
            Self::Relative { percent, offset } => {
                let base = (f32::from(extent) * percent / 100.0).floor() as i64;
                let value = base.saturating_add(i64::from(offset)).clamp(0, i64::from(extent));
                u16::try_from(value).unwrap_or(extent)
            }
        }
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidDimension {
            input: input.to_string(),
            reason,
        };
        let trimmed = input.trim();

        let Some((percent, rest)) = trimmed.split_once('%') else {
            return trimmed
                .parse::<u16>()
                .map(Self::Cells)
                .map_err(|_| invalid("expected a cell count or a percentage"));
        };

        let percent: f32 = percent
            .trim()
            .parse()
            .map_err(|_| invalid("percentage is not a number"))?;
        if !percent.is_finite() || percent < 0.0 {
            return Err(invalid("percentage must be a non-negative number"));
        }

        let rest = rest.trim();
        let offset = if rest.is_empty() {
            0
        } else if let Some(digits) = rest.strip_prefix('+') {
            parse_offset(digits).ok_or_else(|| invalid("offset is not a cell count"))?
        } else if let Some(digits) = rest.strip_prefix('-') {
            -parse_offset(digits).ok_or_else(|| invalid("offset is not a cell count"))?
        } else {
            return Err(invalid("offset must start with `+` or `-`"));
        };

        Ok(Self::Relative { percent, offset })
    }
}

fn parse_offset(digits: &str) -> Option<i32> {
    digits.trim().parse::<u16>().ok().map(i32::from)
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Cells(cells) => write!(f, "{cells}"),
            Self::Relative { percent, offset } => {
                write!(f, "{percent}%")?;
                if offset > 0 {
                    write!(f, "+{offset}")
                } else if offset < 0 {
                    write!(f, "{offset}")
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Cells(u16),
    Expr(String),
}

impl TryFrom<DimensionRepr> for Dimension {
    type Error = Error;

    fn try_from(repr: DimensionRepr) -> Result<Self> {
        match repr {
            DimensionRepr::Cells(cells) => Ok(Self::Cells(cells)),
            DimensionRepr::Expr(expr) => expr.parse(),
        }
    }
}

impl From<Dimension> for DimensionRepr {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Cells(cells) => Self::Cells(cells),
            relative @ Dimension::Relative { .. } => Self::Expr(relative.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("10".parse::<Dimension>().unwrap(), Dimension::cells(10));
        assert_eq!("25%".parse::<Dimension>().unwrap(), Dimension::percent(25.0));
        assert_eq!("100%-3".parse::<Dimension>().unwrap(), Dimension::relative(100.0, -3));
        assert_eq!("0%+3".parse::<Dimension>().unwrap(), Dimension::relative(0.0, 3));
        assert_eq!(" 50% + 2 ".parse::<Dimension>().unwrap(), Dimension::relative(50.0, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "abc", "x%", "10%*2", "-5%", "10%+y", "70000"] {
            let err = input.parse::<Dimension>().unwrap_err();
            assert!(matches!(err, Error::InvalidDimension { .. }), "{input}: {err}");
        }
    }

    #[test]
    fn test_display_matches_input() {
        for input in ["10", "25%", "100%-3", "0%+3", "33.5%"] {
            assert_eq!(input.parse::<Dimension>().unwrap().to_string(), input);
        }
    }

    #[test]
    fn test_resolve() {
        assert_eq!(Dimension::relative(100.0, -3).resolve(24), 21);
        assert_eq!(Dimension::relative(0.0, 3).resolve(24), 3);
        assert_eq!(Dimension::percent(25.0).resolve(80), 20);
        assert_eq!(Dimension::percent(33.0).resolve(10), 3);
        // Clamped into the parent extent.
        assert_eq!(Dimension::relative(0.0, -5).resolve(24), 0);
        assert_eq!(Dimension::relative(100.0, 5).resolve(24), 24);
        assert_eq!(Dimension::cells(200).resolve(80), 80);
    }

    #[test]
    fn test_resolve_huge_percentage_saturates() {
        let dimension: Dimension = "1e30%+1".parse().unwrap();
        assert_eq!(dimension.resolve(80), 80);
        assert_eq!("1e30%-3".parse::<Dimension>().unwrap().resolve(24), 24);
        assert_eq!(Dimension::relative(f32::MAX, i32::MAX).resolve(u16::MAX), u16::MAX);
    }

    #[test]
    fn test_serde_accepts_numbers_and_strings() {
        #[derive(Deserialize, Serialize)]
        struct Holder {
            a: Dimension,
            b: Dimension,
        }

        let holder: Holder = toml::from_str("a = 4\nb = \"100%-6\"").unwrap();
        assert_eq!(holder.a, Dimension::cells(4));
        assert_eq!(holder.b, Dimension::relative(100.0, -6));

        let text = toml::to_string(&holder).unwrap();
        assert!(text.contains("b = \"100%-6\""));

        assert!(toml::from_str::<Holder>("a = 1\nb = \"oops\"").is_err());
    }
}
