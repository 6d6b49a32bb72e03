//! Grid layout engine
//!
//! Pure mapping from participant count to per-participant rectangles on
//! the composite canvas. The tracker rebuilds a `LayoutTable` on every
//! membership change; the compositor only reads it.

pub mod grid;
pub mod table;

pub use grid::{Grid, Rect};
pub use table::LayoutTable;
