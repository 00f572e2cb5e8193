//! Decorative "speaker grill" dot arrays
//!
//! Dots of radius `r` sit on a square lattice with pitch `4r`, centered in the
//! widget. The same geometry backs the static grill and the progress-dot
//! counter, whose fill level is a prefix of the row-major dot order.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};

use crate::ui::colors::{COLOR_INK, COLOR_INK_EMPTY};
use crate::ui::{Drawable, ManagedWidget, PixelRect, Placed};

/// Dot lattice for a widget rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrillGeometry {
    radius: f32,
    pitch: f32,
    cols: u32,
    rows: u32,
    offset_x: f32,
    offset_y: f32,
}

impl GrillGeometry {
    /// Lay out dots of `radius` inside a `width × height` area.
    ///
    /// A drawable area always holds at least one dot; a degenerate one holds
    /// none.
    pub fn new(width: i32, height: i32, radius: u32) -> Self {
        let r = radius.max(1) as f32;
        let pitch = 4.0 * r;

        if width <= 0 || height <= 0 {
            return Self {
                radius: r,
                pitch,
                cols: 0,
                rows: 0,
                offset_x: 0.0,
                offset_y: 0.0,
            };
        }

        let (w, h) = (width as f32, height as f32);
        let cols = (((w - r) / pitch) as i32).max(1) as u32;
        let rows = (((h - r) / pitch) as i32).max(1) as u32;

        Self {
            radius: r,
            pitch,
            cols,
            rows,
            offset_x: (w - (cols - 1) as f32 * pitch - 2.0 * r) / 2.0 + r,
            offset_y: (h - (rows - 1) as f32 * pitch - 2.0 * r) / 2.0 + r,
        }
    }

    /// Geometry for a widget rectangle
    pub fn for_rect(rect: PixelRect, radius: u32) -> Self {
        Self::new(rect.w, rect.h, radius)
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn total_dots(&self) -> u32 {
        self.cols * self.rows
    }

    /// Center of dot `index` (row-major) relative to the widget's top-left
    pub fn dot_center(&self, index: u32) -> Option<(f32, f32)> {
        if index >= self.total_dots() {
            return None;
        }
        let (row, col) = (index / self.cols, index % self.cols);
        Some((
            self.offset_x + col as f32 * self.pitch,
            self.offset_y + row as f32 * self.pitch,
        ))
    }

    /// Draw every dot, the first `filled` in full ink and the rest half-tone.
    pub fn draw_dots<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        origin: Point,
        filled: u32,
    ) -> Result<(), D::Error> {
        let diameter = (self.radius * 2.0) as u32;
        for index in 0..self.total_dots() {
            let Some((cx, cy)) = self.dot_center(index) else {
                break;
            };
            let color = if index < filled {
                COLOR_INK
            } else {
                COLOR_INK_EMPTY
            };
            Circle::with_center(origin + Point::new(cx as i32, cy as i32), diameter)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)?;
        }
        Ok(())
    }
}

/// Static grill with every dot filled.
pub struct SpeakerGrill {
    layout: ManagedWidget,
    radius: u32,
}

impl SpeakerGrill {
    pub fn new(layout: ManagedWidget, radius: u32) -> Self {
        Self { layout, radius }
    }

    pub fn geometry(&self) -> GrillGeometry {
        GrillGeometry::for_rect(self.layout.rect(), self.radius)
    }
}

impl Placed for SpeakerGrill {
    fn managed(&self) -> &ManagedWidget {
        &self.layout
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        &mut self.layout
    }
}

impl Drawable for SpeakerGrill {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let geometry = self.geometry();
        geometry.draw_dots(display, self.layout.rect().top_left(), geometry.total_dots())
    }

    fn bounds(&self) -> Option<Rectangle> {
        self.layout.rect().to_rectangle()
    }
}
