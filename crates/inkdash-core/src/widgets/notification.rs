//! Dismissable notification card
//!
//! The card shares the quote's cell and is registered after it, so it covers
//! the quote while visible. A press anywhere on the card hides it.

use core::fmt::Write;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::ascii::FONT_9X15;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use heapless::String;
use log::debug;

use super::{bounded, draw_text_block};
use crate::host::Host;
use crate::ui::colors::{COLOR_INK, COLOR_PAPER};
use crate::ui::{Drawable, ManagedWidget, Placed, RedrawTarget};

pub const NOTIFICATION_TITLE_LEN: usize = 32;
pub const NOTIFICATION_BODY_LEN: usize = 128;

const BORDER_WIDTH: u32 = 2;

pub struct NotificationWidget {
    layout: ManagedWidget,
    title: String<NOTIFICATION_TITLE_LEN>,
    body: String<NOTIFICATION_BODY_LEN>,
    visible: bool,
}

impl NotificationWidget {
    pub fn new(layout: ManagedWidget) -> Self {
        Self {
            layout,
            title: String::new(),
            body: String::new(),
            visible: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show a new notification, replacing any visible one.
    pub fn update<H: Host>(&mut self, host: &mut H, title: &str, body: &str) {
        self.title = bounded(title);
        self.body = bounded(body);
        self.visible = true;
        host.request_redraw(RedrawTarget::Widget(self.layout.id()));
    }

    /// Hide the card. Returns whether it was visible.
    ///
    /// The whole surface is redrawn so the widgets underneath reappear.
    pub fn dismiss<H: Host>(&mut self, host: &mut H) -> bool {
        if !self.visible {
            return false;
        }
        debug!("Notification dismissed: {}", self.title);
        self.visible = false;
        host.request_redraw(RedrawTarget::Surface);
        true
    }
}

impl Placed for NotificationWidget {
    fn managed(&self) -> &ManagedWidget {
        &self.layout
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        &mut self.layout
    }
}

impl Drawable for NotificationWidget {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if !self.visible {
            return Ok(());
        }
        let Some(card) = self.bounds() else {
            return Ok(());
        };

        let style = PrimitiveStyleBuilder::new()
            .fill_color(COLOR_PAPER)
            .stroke_color(COLOR_INK)
            .stroke_width(BORDER_WIDTH)
            .build();
        card.into_styled(style).draw(display)?;

        let mut text: String<{ NOTIFICATION_TITLE_LEN + NOTIFICATION_BODY_LEN + 1 }> =
            String::new();
        let _ = write!(text, "{}\n{}", self.title, self.body);
        draw_text_block(display, &text, &FONT_9X15, card.offset(-(BORDER_WIDTH as i32) * 2))
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
    fn test_update_shows_and_dismiss_hides() {
        let mut host = Scheduler::new();
        let mut card = NotificationWidget::new(ManagedWidget::new(1, 4, 4, 1, 4, 4));
        assert!(!card.is_visible());
        assert!(!card.dismiss(&mut host));
        assert!(!host.needs_redraw());

        card.update(&mut host, "Door", "Front door opened");
        assert!(card.is_visible());
        assert_eq!((card.title(), card.body()), ("Door", "Front door opened"));

        host.take_redraws();
        assert!(card.dismiss(&mut host));
        assert!(!card.is_visible());
        assert_eq!(host.take_redraws().as_slice(), &[RedrawTarget::Surface]);
    }
}
