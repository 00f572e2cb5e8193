//! Framed, word-wrapped quote spanning the bottom row
//!
//! The wrap width comes from the widget's [`LayoutRule::WrapText`] rule, so
//! it follows every resize without the widget recomputing anything itself.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::ascii::FONT_9X15;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use heapless::String;

use super::{bounded, draw_text_block};
use crate::config::QUOTE_WRAP_INSET_PX;
use crate::host::Host;
use crate::ui::colors::COLOR_GRID;
use crate::ui::{Drawable, LayoutRule, ManagedWidget, Placed, RedrawTarget};

pub const QUOTE_LEN: usize = 256;

pub struct QuoteWidget {
    layout: ManagedWidget,
    text: String<QUOTE_LEN>,
}

impl QuoteWidget {
    /// The layout rule is forced to text wrapping with the standard inset.
    pub fn new(layout: ManagedWidget, text: &str) -> Self {
        Self {
            layout: layout.with_rule(LayoutRule::WrapText {
                inset_px: QUOTE_WRAP_INSET_PX,
            }),
            text: bounded(text),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn update<H: Host>(&mut self, host: &mut H, text: &str) {
        self.text = bounded(text);
        host.request_redraw(RedrawTarget::Widget(self.layout.id()));
    }

    /// Area the text wraps in: the wrap width, centered in the frame
    pub fn text_area(&self) -> Option<Rectangle> {
        let frame = self.layout.rect().to_rectangle()?;
        let wrap = self.layout.wrap_width()?;
        if wrap <= 0 {
            return None;
        }
        let wrap = (wrap as u32).min(frame.size.width);
        let inset = (frame.size.width - wrap) / 2;
        Some(Rectangle::new(
            frame.top_left + Point::new(inset as i32, 0),
            Size::new(wrap, frame.size.height),
        ))
    }
}

impl Placed for QuoteWidget {
    fn managed(&self) -> &ManagedWidget {
        &self.layout
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        &mut self.layout
    }
}

impl Drawable for QuoteWidget {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let Some(frame) = self.bounds() else {
            return Ok(());
        };
        frame
            .into_styled(PrimitiveStyle::with_stroke(COLOR_GRID, 1))
            .draw(display)?;

        match self.text_area() {
            Some(area) => draw_text_block(display, &self.text, &FONT_9X15, area),
            None => Ok(()),
        }
    }

    fn bounds(&self) -> Option<Rectangle> {
        self.layout.rect().to_rectangle()
    }
}
