//! Inkdash UI system: grid layout, widget contract and shared UI types
//!
//! This module provides:
//! - Core types for pointer input, widget identity and redraw targets
//! - The block-grid layout engine (cell to pixel rectangle)
//! - The managed-widget contract and the layout surface that reflows it
//! - The ink palette shared by every widget

pub mod colors;
pub mod core;
pub mod layout;

// Re-export commonly used items
pub use self::core::{Drawable, RedrawTarget, TouchEvent, TouchPoint, WidgetId};
pub use layout::{
    AttachMode, Grid, LayoutRule, LayoutSurface, ManagedWidget, PixelRect, Placed, Placement,
    cell_to_rect, grid_lines,
};
