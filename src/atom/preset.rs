//! Reusable layout patches for sibling-driven reflow.

use super::state::StatePatch;
use crate::layout::Dimension;

/// Make room for a sidebar occupying the left quarter.
pub fn shrink() -> StatePatch {
    StatePatch::new()
        .left(Dimension::percent(25.0))
        .width(Dimension::percent(75.0))
}

/// Reclaim the full width once the sidebar is gone.
pub fn expand() -> StatePatch {
    StatePatch::new()
        .left(Dimension::percent(0.0))
        .width(Dimension::percent(100.0))
}

/// Move below a three-row header.
pub fn below_header() -> StatePatch {
    StatePatch::new()
        .top(Dimension::relative(0.0, 3))
        .height(Dimension::relative(100.0, -6))
}

/// Back to the top once the header is gone.
pub fn without_header() -> StatePatch {
    StatePatch::new()
        .top(Dimension::percent(0.0))
        .height(Dimension::relative(100.0, -3))
}
