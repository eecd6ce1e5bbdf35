//! Vertical stacking of frame containers on a page.
//!
//! One running `y` offset: every container sits at `x = 0, y = cursor`, and
//! after each record the cursor moves to the container's bottom edge plus a
//! fixed gap. Containers the sync did not touch still advance the cursor
//! from wherever they currently are.

use tessera_core::Rect;

/// Spacing between stacked containers.
pub const DEFAULT_GAP: f32 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    y: f32,
    gap: f32,
}

impl Default for LayoutCursor {
    fn default() -> Self {
        Self::new(DEFAULT_GAP)
    }
}

impl LayoutCursor {
    pub fn new(gap: f32) -> Self {
        Self { y: 0.0, gap }
    }

    /// Current offset for the next container.
    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Move below `bounds`: `top + height + gap`.
    pub fn advance_past(&mut self, bounds: &Rect) {
        self.y = bounds.y + bounds.height + self.gap;
    }
}
