//! # tessera-layout
//!
//! Geometry for frame sync.
//!
//! - **`engine`** — [`AutoLayout`], Taffy-backed sizing of auto-layout frames.
//! - **`cursor`** — [`LayoutCursor`], vertical stacking of containers on a page.

pub mod cursor;
pub mod engine;

pub use cursor::{LayoutCursor, DEFAULT_GAP};
pub use engine::{AutoLayout, LayoutError};
