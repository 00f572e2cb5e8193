//! Block-grid layout engine
//!
//! - [`grid`]: pure cell-to-rectangle arithmetic and placement clamping
//! - [`widget`]: the managed-widget contract and per-kind layout rules
//! - [`surface`]: the surface that owns widgets and reflows them on resize

pub mod grid;
pub mod surface;
pub mod widget;

pub use grid::{
    Grid, MAX_GRID_BLOCKS, MAX_GRID_LINES, PixelRect, Placement, cell_to_rect, grid_lines,
};
pub use surface::{LayoutSurface, MAX_SURFACE_WIDGETS};
pub use widget::{AttachMode, LayoutRule, ManagedWidget, Placed};
