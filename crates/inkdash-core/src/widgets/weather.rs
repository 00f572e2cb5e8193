//! Weather summary: icon, temperature and condition stacked and centered

use core::fmt::Write;

use embedded_graphics::mono_font::iso_8859_1::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::String;

use super::{bounded, draw_text_block};
use crate::host::Host;
use crate::ui::{Drawable, ManagedWidget, Placed, RedrawTarget};

pub const WEATHER_ICON_LEN: usize = 8;
pub const WEATHER_CONDITION_LEN: usize = 32;

pub struct WeatherWidget {
    layout: ManagedWidget,
    icon: String<WEATHER_ICON_LEN>,
    temperature: i32,
    condition: String<WEATHER_CONDITION_LEN>,
}

impl WeatherWidget {
    pub fn new(layout: ManagedWidget) -> Self {
        Self::with_values(layout, "*", 25, "Sunny")
    }

    pub fn with_values(
        layout: ManagedWidget,
        icon: &str,
        temperature: i32,
        condition: &str,
    ) -> Self {
        Self {
            layout,
            icon: bounded(icon),
            temperature,
            condition: bounded(condition),
        }
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Replace all three values; over-long texts are truncated.
    pub fn update<H: Host>(&mut self, host: &mut H, icon: &str, temperature: i32, condition: &str) {
        self.icon = bounded(icon);
        self.temperature = temperature;
        self.condition = bounded(condition);
        host.request_redraw(RedrawTarget::Widget(self.layout.id()));
    }

    /// Three-line text as drawn
    pub fn text(&self) -> String<64> {
        let mut text = String::new();
        let _ = write!(
            text,
            "{}\n{}\u{b0}C\n{}",
            self.icon, self.temperature, self.condition
        );
        text
    }
}

impl Placed for WeatherWidget {
    fn managed(&self) -> &ManagedWidget {
        &self.layout
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        &mut self.layout
    }
}

impl Drawable for WeatherWidget {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        match self.bounds() {
            Some(area) => draw_text_block(display, &self.text(), &FONT_10X20, area),
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
    fn test_defaults() {
        let weather = WeatherWidget::new(ManagedWidget::new(3, 2, 2, 1, 4, 4));
        assert_eq!(weather.icon(), "*");
        assert_eq!(weather.temperature(), 25);
        assert_eq!(weather.condition(), "Sunny");
        assert_eq!(weather.text().as_str(), "*\n25\u{b0}C\nSunny");
    }

    #[test]
    fn test_update_truncates_long_condition() {
        let mut host = Scheduler::new();
        let mut weather = WeatherWidget::new(ManagedWidget::new(3, 2, 2, 1, 4, 4));

        let long = "Scattered thunderstorms with occasional hail";
        weather.update(&mut host, "", -4, long);
        assert_eq!(weather.temperature(), -4);
        assert_eq!(weather.condition(), &long[..WEATHER_CONDITION_LEN]);
        assert!(host.needs_redraw());
    }
}
