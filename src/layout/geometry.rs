//! Geometry: Unresolved position and size of an atom.

use super::dimension::Dimension;
use super::rect::Rect;
use serde::{Deserialize, Serialize};

/// Position and size descriptors of one atom, relative to its parent area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Offset from the top edge of the parent.
    pub top: Dimension,
    /// Offset from the left edge of the parent.
    pub left: Dimension,
    /// Width.
    pub width: Dimension,
    /// Height.
    pub height: Dimension,
    /// Blank cells kept between the edge and the content on every side.
    pub padding: u16,
}

impl Default for Geometry {
    /// Fills the whole parent area.
    fn default() -> Self {
        Self {
            top: Dimension::percent(0.0),
            left: Dimension::percent(0.0),
            width: Dimension::percent(100.0),
            height: Dimension::percent(100.0),
            padding: 0,
        }
    }
}

impl Geometry {
    /// Resolve to a concrete rectangle inside `area`.
    ///
    /// Offsets resolve against the parent extent; the result is clipped so it
    /// never leaves `area`.
    pub fn resolve(&self, area: Rect) -> Rect {
        let x = area.x.saturating_add(self.left.resolve(area.width));
        let y = area.y.saturating_add(self.top.resolve(area.height));
        let width = self.width.resolve(area.width);
        let height = self.height.resolve(area.height);
        Rect::new(x, y, width, height).clip_to(area)
    }

    /// The content rectangle of an already resolved `outer` rectangle.
    pub const fn inner(&self, outer: Rect) -> Rect {
        outer.shrink(self.padding)
    }
}
