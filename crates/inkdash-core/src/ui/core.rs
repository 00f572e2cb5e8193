//! Core UI traits and types for the inkdash UI system

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Represents a 2D pointer position on the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

impl TouchPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Pointer events delivered by the host toolkit
#[derive(Debug, Clone, Copy)]
pub enum TouchEvent {
    /// Pointer press at a point
    Press(TouchPoint),
}

/// Opaque index of a widget registered on a layout surface.
///
/// Callbacks carry this id instead of a reference to their owner; looking up
/// an id that no longer resolves is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub u8);

/// What a redraw request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawTarget {
    /// The whole surface (overlay toggles, resizes)
    Surface,
    /// A single widget
    Widget(WidgetId),
}

/// Trait for any UI element that can be drawn
pub trait Drawable {
    /// Draw the element to the display within its current bounds
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error>;

    /// Get the bounds of this drawable element, `None` when degenerate
    fn bounds(&self) -> Option<Rectangle>;
}
