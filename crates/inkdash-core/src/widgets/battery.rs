//! Battery gauge: outlined cell, terminal bump, proportional fill and label

use core::fmt::Write;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, RoundedRectangle};
use heapless::String;

use super::draw_centered_label;
use crate::host::Host;
use crate::ui::colors::COLOR_INK;
use crate::ui::{Drawable, ManagedWidget, PixelRect, Placed, RedrawTarget};

const INNER_PAD: f32 = 10.0;
const FILL_MARGIN: f32 = 6.0;
const OUTLINE_WIDTH: u32 = 4;
const CORNER_RADIUS: u32 = 5;
const LABEL_GAP: i32 = 10;

/// Icon rectangles relative to the widget's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryGeometry {
    pub body: PixelRect,
    pub terminal: PixelRect,
    /// `None` at 0 %
    pub fill: Option<PixelRect>,
    /// Vertical band reserved for the percentage label
    pub label: PixelRect,
}

impl BatteryGeometry {
    /// Lay out the icon for a `width × height` widget at `level` percent.
    ///
    /// The cell is half the padded height tall and 2.2 times as wide, with
    /// the terminal taking 8 % of that width.
    pub fn new(width: i32, height: i32, level: u8) -> Self {
        let (w, h) = (width as f32, height as f32);
        let avail_h = h - 2.0 * INNER_PAD;

        let bat_h = avail_h * 0.5;
        let bat_w = bat_h * 2.2;
        let x = (w - bat_w) / 2.0;
        let y = (h - bat_h) / 2.0;

        let terminal_w = bat_w * 0.08;
        let terminal_h = bat_h * 0.4;
        let body_w = bat_w - terminal_w;

        let fill_w = (body_w - 2.0 * FILL_MARGIN) * level.min(100) as f32 / 100.0;
        let fill = (fill_w >= 1.0).then(|| {
            PixelRect::new(
                (x + FILL_MARGIN) as i32,
                (y + FILL_MARGIN) as i32,
                fill_w as i32,
                (bat_h - 2.0 * FILL_MARGIN) as i32,
            )
        });

        let label_y = (y + bat_h) as i32 + LABEL_GAP;

        Self {
            body: PixelRect::new(x as i32, y as i32, body_w as i32, bat_h as i32),
            terminal: PixelRect::new(
                (x + body_w) as i32,
                (y + (bat_h - terminal_h) / 2.0) as i32,
                terminal_w as i32,
                terminal_h as i32,
            ),
            fill,
            label: PixelRect::new(0, label_y, width, (height - label_y).max(0)),
        }
    }
}

/// Battery level and charging state pushed from outside.
pub struct BatteryWidget {
    layout: ManagedWidget,
    level: u8,
    charging: bool,
}

impl BatteryWidget {
    pub fn new(layout: ManagedWidget) -> Self {
        Self {
            layout,
            level: 50,
            charging: false,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn charging(&self) -> bool {
        self.charging
    }

    /// Store a new reading, clamping `level` into 0..=100, and request a redraw.
    pub fn set_values<H: Host>(&mut self, host: &mut H, level: i32, charging: bool) {
        self.level = level.clamp(0, 100) as u8;
        self.charging = charging;
        host.request_redraw(RedrawTarget::Widget(self.layout.id()));
    }

    pub fn geometry(&self) -> BatteryGeometry {
        let rect = self.layout.rect();
        BatteryGeometry::new(rect.w, rect.h, self.level)
    }

    /// `"{level}%"`, suffixed with a charge marker while charging
    pub fn label(&self) -> String<8> {
        let mut label = String::new();
        let _ = write!(label, "{}%", self.level);
        if self.charging {
            let _ = label.push_str(" +");
        }
        label
    }
}

impl Placed for BatteryWidget {
    fn managed(&self) -> &ManagedWidget {
        &self.layout
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        &mut self.layout
    }
}

impl Drawable for BatteryWidget {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let rect = self.layout.rect();
        if rect.is_degenerate() {
            return Ok(());
        }
        let origin = rect.top_left();
        let geometry = self.geometry();

        if let Some(body) = geometry.body.to_rectangle() {
            RoundedRectangle::with_equal_corners(
                body.translate(origin),
                Size::new(CORNER_RADIUS, CORNER_RADIUS),
            )
            .into_styled(PrimitiveStyle::with_stroke(COLOR_INK, OUTLINE_WIDTH))
            .draw(display)?;
        }

        let solid = PrimitiveStyle::with_fill(COLOR_INK);
        for part in [Some(geometry.terminal), geometry.fill].into_iter().flatten() {
            if let Some(area) = part.to_rectangle() {
                area.translate(origin).into_styled(solid).draw(display)?;
            }
        }

        match geometry.label.to_rectangle() {
            Some(area) => {
                let area = Rectangle::new(area.top_left + origin, area.size);
                draw_centered_label(display, &self.label(), &FONT_10X20, area)
            }
            None => Ok(()),
        }
    }

    fn bounds(&self) -> Option<Rectangle> {
        self.layout.rect().to_rectangle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Scheduler;

    #[test]
    fn test_geometry_proportions() {
        let geometry = BatteryGeometry::new(200, 120, 100);
        // avail_h 100 -> 50 tall, 110 wide, 8.8 px terminal
        assert_eq!(geometry.body, PixelRect::new(45, 35, 101, 50));
        assert_eq!(geometry.terminal, PixelRect::new(146, 50, 8, 20));
        assert_eq!(geometry.fill, Some(PixelRect::new(51, 41, 89, 38)));
        assert_eq!(geometry.label.y, 95);
    }

    #[test]
    fn test_fill_scales_with_level() {
        let half = BatteryGeometry::new(200, 120, 50).fill.unwrap();
        assert_eq!(half.w, 44);
        assert_eq!(BatteryGeometry::new(200, 120, 0).fill, None);
    }

    #[test]
    fn test_set_values_clamps_and_redraws() {
        let mut host = Scheduler::new();
        let mut battery = BatteryWidget::new(ManagedWidget::new(4, 3, 1, 1, 4, 4));

        battery.set_values(&mut host, 140, true);
        assert_eq!(battery.level(), 100);
        assert!(battery.charging());
        assert!(host.needs_redraw());

        battery.set_values(&mut host, -5, false);
        assert_eq!(battery.level(), 0);
    }

    #[test]
    fn test_label_marks_charging() {
        let mut host = Scheduler::new();
        let mut battery = BatteryWidget::new(ManagedWidget::new(4, 3, 1, 1, 4, 4));

        battery.set_values(&mut host, 87, false);
        assert_eq!(battery.label().as_str(), "87%");
        battery.set_values(&mut host, 87, true);
        assert_eq!(battery.label().as_str(), "87% +");
    }
}
