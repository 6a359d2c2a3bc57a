//! Layout module: Geometry descriptors and their resolution to screen cells.
//!
//! Atoms carry unresolved [`Geometry`] in their visual state; only the
//! display sink resolves it to a [`Rect`] against the current screen size.

mod dimension;
mod geometry;
mod rect;

pub use dimension::Dimension;
pub use geometry::Geometry;
pub use rect::Rect;
