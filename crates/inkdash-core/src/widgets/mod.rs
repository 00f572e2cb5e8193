//! Dashboard widgets
//!
//! Every widget embeds a [`ManagedWidget`] for its placement and implements
//! [`Placed`] and [`Drawable`]. The timer-driven ones (counter, dice, clock)
//! own their timer handles and recognise their own fires through
//! `on_timer`, which returns `false` for foreign handles.

pub mod battery;
pub mod clock;
pub mod counter;
pub mod dice;
pub mod grill;
pub mod notification;
pub mod quote;
pub mod weather;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use embedded_layout::align::{Align, horizontal, vertical};
use embedded_text::TextBox;
use embedded_text::alignment::{HorizontalAlignment, VerticalAlignment};
use embedded_text::style::TextBoxStyleBuilder;
use heapless::String;
use rand::RngCore;

pub use battery::{BatteryGeometry, BatteryWidget};
pub use clock::{AlignPhase, ClockAligner, ClockWidget, format_clock};
pub use counter::{CounterMode, CounterWidget, DotCounter, fill_level};
pub use dice::{DiceWidget, Dot, RollAnimator, RollPhase, dice_positions, noise_squares};
pub use grill::{GrillGeometry, SpeakerGrill};
pub use notification::NotificationWidget;
pub use quote::QuoteWidget;
pub use weather::WeatherWidget;

use crate::clock::WallClock;
use crate::host::{Host, TimerHandle};
use crate::ui::colors::COLOR_INK;
use crate::ui::{Drawable, ManagedWidget, Placed};

/// Copy `text` into a bounded string, dropping whatever does not fit.
///
/// Truncation happens on a character boundary.
pub fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Draw a single line of text centered in `area`
pub(crate) fn draw_centered_label<'a, D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    text: &str,
    font: &'a MonoFont<'a>,
    area: Rectangle,
) -> Result<(), D::Error> {
    Text::new(text, Point::zero(), MonoTextStyle::new(font, COLOR_INK))
        .align_to(&area, horizontal::Center, vertical::Center)
        .draw(display)?;
    Ok(())
}

/// Draw word-wrapped text, each line centered, the block vertically centered
pub(crate) fn draw_text_block<'a, D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    text: &str,
    font: &'a MonoFont<'a>,
    area: Rectangle,
) -> Result<(), D::Error> {
    let character_style = MonoTextStyle::new(font, COLOR_INK);
    let textbox_style = TextBoxStyleBuilder::new()
        .alignment(HorizontalAlignment::Center)
        .vertical_alignment(VerticalAlignment::Middle)
        .build();

    TextBox::with_textbox_style(text, area, character_style, textbox_style).draw(display)?;
    Ok(())
}

/// Widget wrapper enum for storing the different widget kinds on one surface
pub enum DashWidget<R> {
    Grill(SpeakerGrill),
    Counter(CounterWidget),
    Dice(DiceWidget<R>),
    Clock(ClockWidget),
    Weather(WeatherWidget),
    Battery(BatteryWidget),
    Quote(QuoteWidget),
    Notification(NotificationWidget),
}

macro_rules! each_widget {
    ($self:expr, $widget:ident => $body:expr) => {
        match $self {
            DashWidget::Grill($widget) => $body,
            DashWidget::Counter($widget) => $body,
            DashWidget::Dice($widget) => $body,
            DashWidget::Clock($widget) => $body,
            DashWidget::Weather($widget) => $body,
            DashWidget::Battery($widget) => $body,
            DashWidget::Quote($widget) => $body,
            DashWidget::Notification($widget) => $body,
        }
    };
}

impl<R: RngCore> DashWidget<R> {
    /// Route a timer fire; `false` when no timer of this widget matches.
    pub fn on_timer<H: Host, C: WallClock>(
        &mut self,
        handle: TimerHandle,
        host: &mut H,
        clock: &C,
    ) -> bool {
        match self {
            DashWidget::Counter(counter) => counter.on_timer(handle, host, clock),
            DashWidget::Dice(dice) => dice.on_timer(handle, host),
            DashWidget::Clock(clock_widget) => clock_widget.on_timer(handle, host, clock),
            _ => false,
        }
    }

    /// Cancel every timer the widget owns
    pub fn stop<H: Host>(&mut self, host: &mut H) {
        match self {
            DashWidget::Counter(counter) => counter.stop(host),
            DashWidget::Dice(dice) => dice.stop(host),
            DashWidget::Clock(clock_widget) => clock_widget.stop(host),
            _ => {}
        }
    }

    /// Refresh state derived from the rectangle after a reflow
    pub fn on_reflow(&mut self) {
        if let DashWidget::Counter(counter) = self {
            counter.sync_capacity();
        }
    }
}

impl<R> Placed for DashWidget<R> {
    fn managed(&self) -> &ManagedWidget {
        each_widget!(self, widget => widget.managed())
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        each_widget!(self, widget => widget.managed_mut())
    }
}

impl<R: RngCore> Drawable for DashWidget<R> {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        each_widget!(self, widget => widget.draw(display))
    }

    fn bounds(&self) -> Option<Rectangle> {
        each_widget!(self, widget => widget.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_truncates_on_char_boundary() {
        let short: String<4> = bounded("abc");
        assert_eq!(short.as_str(), "abc");

        let cut: String<4> = bounded("abcdef");
        assert_eq!(cut.as_str(), "abcd");

        // 'é' is two bytes and does not fit after "abc"
        let multibyte: String<4> = bounded("abcé");
        assert_eq!(multibyte.as_str(), "abc");
    }
}
