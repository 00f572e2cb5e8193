//! The fixed dashboard: widget set, event routing and rendering
//!
//! The layout reproduces the device dashboard on a 4×4 grid:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │            speaker grill             │
//! ├──────────────────┬───────────────────┤
//! │      clock       │      weather      │
//! ├────────┬─────────┼─────────┬─────────┤
//! │ grill  │ counter │  dice   │ battery │
//! ├────────┴─────────┴─────────┴─────────┤
//! │     quote (notification on top)      │
//! └──────────────────────────────────────┘
//! ```
//!
//! The host feeds three kinds of events in: resizes, timer fires and
//! presses. Everything the dashboard wants back (timers, redraws) goes
//! through the [`Host`] passed to each call.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyle;
use log::{debug, info};
use rand::RngCore;

use crate::clock::WallClock;
use crate::config::{
    DEFAULT_QUOTE, DICE_RADIUS_PX, DashboardConfig, GRILL_RADIUS_PX, MAX_WIDGETS,
};
use crate::error::{DashError, DashResult};
use crate::feedback::{Feedback, FeedbackChannel};
use crate::host::{Host, TimerHandle};
use crate::ui::colors::{COLOR_GRID, COLOR_PAPER};
use crate::ui::{
    Drawable, Grid, LayoutSurface, ManagedWidget, Placed, RedrawTarget, TouchEvent, WidgetId,
};
use crate::widgets::counter::DotCounter;
use crate::widgets::{
    BatteryWidget, ClockWidget, CounterWidget, DashWidget, DiceWidget, NotificationWidget,
    QuoteWidget, SpeakerGrill, WeatherWidget,
};

/// Ids of the widgets events are routed to
#[derive(Debug, Clone, Copy)]
struct WidgetIds {
    clock: WidgetId,
    weather: WidgetId,
    counter: WidgetId,
    dice: WidgetId,
    battery: WidgetId,
    quote: WidgetId,
    notification: WidgetId,
}

/// The e-reader dashboard.
///
/// # Type Parameters
/// - `R`: random source of the dice, seeded once by the host
pub struct Dashboard<R> {
    config: DashboardConfig,
    surface: LayoutSurface<DashWidget<R>, MAX_WIDGETS>,
    ids: WidgetIds,
}

impl<R: RngCore> Dashboard<R> {
    /// Build the fixed widget set. No timer runs until [`start`](Self::start).
    pub fn new(config: DashboardConfig, rng: R) -> DashResult<Self> {
        let (bx, by) = (config.blocks_x, config.blocks_y);
        let cell = |col, row, w, h| ManagedWidget::new(col, row, w, h, bx, by);

        let mut surface = LayoutSurface::new(
            config.window_width,
            config.window_height,
            Grid::new(bx, by),
            config.padding,
        );

        place(
            &mut surface,
            DashWidget::Grill(SpeakerGrill::new(cell(1, 1, 4, 1), GRILL_RADIUS_PX)),
        )?;
        let clock = place(
            &mut surface,
            DashWidget::Clock(ClockWidget::new(cell(1, 2, 2, 1), config.clock_seconds)),
        )?;
        let weather = place(
            &mut surface,
            DashWidget::Weather(WeatherWidget::with_values(cell(3, 2, 2, 1), "", 19, "Rainy")),
        )?;
        place(
            &mut surface,
            DashWidget::Grill(SpeakerGrill::new(cell(1, 3, 1, 1), GRILL_RADIUS_PX)),
        )?;
        let counter = place(
            &mut surface,
            DashWidget::Counter(CounterWidget::new(
                cell(2, 3, 1, 1),
                GRILL_RADIUS_PX,
                DotCounter::from_config(&config.counter),
            )),
        )?;
        let dice = place(
            &mut surface,
            DashWidget::Dice(DiceWidget::new(cell(3, 3, 1, 1), rng, DICE_RADIUS_PX)),
        )?;
        let battery = place(
            &mut surface,
            DashWidget::Battery(BatteryWidget::new(cell(4, 3, 1, 1))),
        )?;
        let quote = place(
            &mut surface,
            DashWidget::Quote(QuoteWidget::new(cell(1, 4, 4, 1), DEFAULT_QUOTE)),
        )?;
        let notification = place(
            &mut surface,
            DashWidget::Notification(NotificationWidget::new(cell(1, 4, 4, 1))),
        )?;

        Ok(Self {
            config,
            surface,
            ids: WidgetIds {
                clock,
                weather,
                counter,
                dice,
                battery,
                quote,
                notification,
            },
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn surface(&self) -> &LayoutSurface<DashWidget<R>, MAX_WIDGETS> {
        &self.surface
    }

    /// Look up a widget by id
    pub fn widget(&self, id: WidgetId) -> DashResult<&DashWidget<R>> {
        self.surface
            .get(id)
            .ok_or(DashError::UnknownWidget { id: id.0 })
    }

    pub fn clock(&self) -> Option<&ClockWidget> {
        match self.surface.get(self.ids.clock)? {
            DashWidget::Clock(clock) => Some(clock),
            _ => None,
        }
    }

    pub fn weather(&self) -> Option<&WeatherWidget> {
        match self.surface.get(self.ids.weather)? {
            DashWidget::Weather(weather) => Some(weather),
            _ => None,
        }
    }

    pub fn counter(&self) -> Option<&CounterWidget> {
        match self.surface.get(self.ids.counter)? {
            DashWidget::Counter(counter) => Some(counter),
            _ => None,
        }
    }

    pub fn dice(&self) -> Option<&DiceWidget<R>> {
        match self.surface.get(self.ids.dice)? {
            DashWidget::Dice(dice) => Some(dice),
            _ => None,
        }
    }

    pub fn battery(&self) -> Option<&BatteryWidget> {
        match self.surface.get(self.ids.battery)? {
            DashWidget::Battery(battery) => Some(battery),
            _ => None,
        }
    }

    pub fn quote(&self) -> Option<&QuoteWidget> {
        match self.surface.get(self.ids.quote)? {
            DashWidget::Quote(quote) => Some(quote),
            _ => None,
        }
    }

    pub fn notification(&self) -> Option<&NotificationWidget> {
        match self.surface.get(self.ids.notification)? {
            DashWidget::Notification(card) => Some(card),
            _ => None,
        }
    }

    /// Arm every timer-driven widget and roll the dice once.
    pub fn start<H: Host, C: WallClock>(&mut self, host: &mut H, clock: &C) {
        info!(
            "Starting dashboard {}x{} on a {}x{} grid",
            self.config.window_width,
            self.config.window_height,
            self.config.blocks_x,
            self.config.blocks_y
        );
        self.surface.set_debug_overlay(self.config.grid_overlay, host);

        for widget in self.surface.iter_mut() {
            match widget {
                DashWidget::Clock(clock_widget) => clock_widget.start(host, clock),
                DashWidget::Counter(counter) => counter.start(host),
                DashWidget::Dice(dice) => dice.press(host),
                _ => {}
            }
        }
    }

    /// Reflow every widget for a new surface size.
    pub fn on_resize<H: Host>(&mut self, host: &mut H, width: u32, height: u32) {
        self.surface.on_resize(width, height);
        for widget in self.surface.iter_mut() {
            widget.on_reflow();
        }
        host.request_redraw(RedrawTarget::Surface);
    }

    /// Route a timer fire to its owner. Unknown handles are ignored.
    pub fn on_timer<H: Host, C: WallClock>(
        &mut self,
        handle: TimerHandle,
        host: &mut H,
        clock: &C,
    ) -> bool {
        let handled = self
            .surface
            .iter_mut()
            .any(|widget| widget.on_timer(handle, host, clock));
        if !handled {
            debug!("Timer {:?} has no owner", handle);
        }
        handled
    }

    /// Show or hide the grid separator overlay
    pub fn set_grid_overlay<H: Host>(&mut self, host: &mut H, enabled: bool) {
        debug!("Grid overlay {}", if enabled { "on" } else { "off" });
        self.config.grid_overlay = enabled;
        self.surface.set_debug_overlay(enabled, host);
    }

    /// Handle a pointer event from the host toolkit
    pub fn handle_touch<H: Host>(&mut self, host: &mut H, event: TouchEvent) -> bool {
        match event {
            TouchEvent::Press(point) => self.on_press(host, point.to_point()),
        }
    }

    /// Route a press to the topmost widget under `point`.
    ///
    /// The dice rolls and a visible notification is dismissed; presses
    /// elsewhere are ignored.
    pub fn on_press<H: Host>(&mut self, host: &mut H, point: Point) -> bool {
        let Some(id) = self.surface.widget_at(point) else {
            return false;
        };

        match self.surface.get_mut(id) {
            Some(DashWidget::Dice(dice)) => {
                dice.press(host);
                true
            }
            Some(DashWidget::Notification(card)) => card.dismiss(host),
            _ => false,
        }
    }

    /// Hand one feedback value to its widget
    pub fn apply_feedback<H: Host>(&mut self, host: &mut H, feedback: Feedback) {
        let ids = self.ids;
        match feedback {
            Feedback::Battery { level, charging } => {
                if let Some(DashWidget::Battery(battery)) = self.surface.get_mut(ids.battery) {
                    battery.set_values(host, level, charging);
                }
            }
            Feedback::Weather {
                icon,
                temperature,
                condition,
            } => {
                if let Some(DashWidget::Weather(weather)) = self.surface.get_mut(ids.weather) {
                    weather.update(host, &icon, temperature, &condition);
                }
            }
            Feedback::Quote(text) => {
                if let Some(DashWidget::Quote(quote)) = self.surface.get_mut(ids.quote) {
                    quote.update(host, &text);
                }
            }
            Feedback::Notification { title, body } => {
                if let Some(DashWidget::Notification(card)) =
                    self.surface.get_mut(ids.notification)
                {
                    card.update(host, &title, &body);
                }
            }
        }
    }

    /// Apply everything queued on `channel`; returns how many values were applied
    pub fn drain_feedback<H: Host>(&mut self, host: &mut H, channel: &FeedbackChannel) -> usize {
        let mut applied = 0;
        while let Ok(feedback) = channel.try_receive() {
            self.apply_feedback(host, feedback);
            applied += 1;
        }
        applied
    }

    /// Cancel every timer. Must run before the dashboard is dropped.
    pub fn shutdown<H: Host>(&mut self, host: &mut H) {
        for widget in self.surface.iter_mut() {
            widget.stop(host);
        }
        info!("Dashboard shut down");
    }

    /// Render the whole surface: paper, overlay lines, then widgets in
    /// registration order.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        display.clear(COLOR_PAPER)?;

        if self.surface.debug_overlay() {
            let style = PrimitiveStyle::with_stroke(COLOR_GRID, 1);
            for line in self.surface.grid_lines() {
                line.into_styled(style).draw(display)?;
            }
        }

        for widget in self.surface.iter() {
            widget.draw(display)?;
        }
        Ok(())
    }
}

fn place<R: RngCore>(
    surface: &mut LayoutSurface<DashWidget<R>, MAX_WIDGETS>,
    widget: DashWidget<R>,
) -> DashResult<WidgetId> {
    let placement = widget.managed().placement();
    let id = surface.register(widget, placement)?;
    if let Some(widget) = surface.get_mut(id) {
        widget.on_reflow();
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockReading, FixedClock};
    use crate::feedback::push_feedback;
    use crate::host::Scheduler;
    use crate::ui::PixelRect;
    use crate::widgets::RollPhase;
    use core::convert::Infallible;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn dashboard() -> Dashboard<SmallRng> {
        Dashboard::new(DashboardConfig::default(), SmallRng::seed_from_u64(11)).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::new(ClockReading::new(2024, 6, 1, 8, 30, 15))
    }

    /// Target that only counts ink pixels
    struct InkCounter {
        size: Size,
        ink: usize,
    }

    impl OriginDimensions for InkCounter {
        fn size(&self) -> Size {
            self.size
        }
    }

    impl DrawTarget for InkCounter {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.ink += pixels
                .into_iter()
                .filter(|Pixel(_, color)| *color != COLOR_PAPER)
                .count();
            Ok(())
        }
    }

    #[test]
    fn test_fixed_layout_rects() {
        let dash = dashboard();
        assert_eq!(dash.surface().len(), 9);

        let rect = |id| dash.surface().rect_of(id).unwrap();
        assert_eq!(rect(dash.ids.clock), PixelRect::new(10, 144, 342, 114));
        assert_eq!(rect(dash.ids.dice), PixelRect::new(372, 278, 161, 114));
        assert_eq!(rect(dash.ids.quote), PixelRect::new(10, 412, 704, 114));
        assert_eq!(rect(dash.ids.notification), rect(dash.ids.quote));
        assert_eq!(dash.quote().unwrap().managed().wrap_width(), Some(698));
        assert_eq!(dash.weather().unwrap().condition(), "Rainy");
    }

    #[test]
    fn test_start_arms_timers_and_rolls() {
        let mut host = Scheduler::new();
        let mut dash = dashboard();
        dash.start(&mut host, &clock());

        // clock boundary, counter tick, dice noise and shuffle
        assert_eq!(host.timers().len(), 4);
        assert_eq!(dash.dice().unwrap().animator().phase(), RollPhase::Shuffling);
        assert_eq!(dash.clock().unwrap().text(), "08:30\n01-06-2024");
        assert!(host.take_redraws().contains(&RedrawTarget::Surface));
    }

    #[test]
    fn test_timers_route_to_owners() {
        let mut host = Scheduler::new();
        let clock = clock();
        let mut dash = dashboard();
        dash.start(&mut host, &clock);

        host.advance_to(5_000);
        while let Some(handle) = host.pop_due() {
            assert!(dash.on_timer(handle, &mut host, &clock));
        }
        assert_eq!(dash.dice().unwrap().animator().phase(), RollPhase::Idle);

        let foreign = host
            .register_timer(embassy_time::Duration::from_millis(1), false)
            .unwrap();
        assert!(!dash.on_timer(foreign, &mut host, &clock));
    }

    #[test]
    fn test_press_routing() {
        let mut host = Scheduler::new();
        let mut dash = dashboard();

        assert!(dash.on_press(&mut host, Point::new(452, 335)));
        assert_eq!(dash.dice().unwrap().animator().phase(), RollPhase::Shuffling);

        // Padding gutter between cells
        assert!(!dash.on_press(&mut host, Point::new(5, 5)));
        // Battery ignores presses
        assert!(!dash.on_press(&mut host, Point::new(600, 300)));
    }

    #[test]
    fn test_touch_and_overlay() {
        let mut host = Scheduler::new();
        let mut dash = dashboard();

        let press = TouchEvent::Press(crate::ui::TouchPoint::new(452, 335));
        assert!(dash.handle_touch(&mut host, press));

        dash.set_grid_overlay(&mut host, false);
        assert!(!dash.surface().debug_overlay());
        assert!(!dash.config().grid_overlay);
    }

    #[test]
    fn test_feedback_reaches_widgets() {
        let mut host = Scheduler::new();
        let mut dash = dashboard();
        let channel = FeedbackChannel::new();

        push_feedback(&channel, Feedback::battery(120, true));
        push_feedback(&channel, Feedback::weather("~", 12, "Fog"));
        push_feedback(&channel, Feedback::notification("Mail", "2 new messages"));
        assert_eq!(dash.drain_feedback(&mut host, &channel), 3);
        assert_eq!(dash.drain_feedback(&mut host, &channel), 0);

        assert_eq!(dash.battery().unwrap().level(), 100);
        assert_eq!(dash.weather().unwrap().temperature(), 12);
        assert!(dash.notification().unwrap().is_visible());

        // The card covers the quote and a press dismisses it
        assert!(dash.on_press(&mut host, Point::new(300, 450)));
        assert!(!dash.notification().unwrap().is_visible());
    }

    #[test]
    fn test_resize_reflows_counter_capacity() {
        let mut host = Scheduler::new();
        let mut dash = dashboard();
        assert_eq!(dash.counter().unwrap().counter().total_dots(), 2);

        dash.on_resize(&mut host, 724, 536);
        assert_eq!(dash.counter().unwrap().counter().total_dots(), 2);

        dash.on_resize(&mut host, 362, 268);
        assert_eq!(dash.counter().unwrap().counter().total_dots(), 1);
        assert_eq!(host.take_redraws().as_slice(), &[RedrawTarget::Surface]);
    }

    #[test]
    fn test_shutdown_cancels_everything() {
        let mut host = Scheduler::new();
        let mut dash = dashboard();
        dash.start(&mut host, &clock());

        dash.shutdown(&mut host);
        assert!(host.timers().is_empty());
    }

    #[test]
    fn test_unknown_widget_lookup() {
        let dash = dashboard();
        assert_eq!(
            dash.widget(WidgetId(40)).err(),
            Some(DashError::UnknownWidget { id: 40 })
        );
        assert!(dash.widget(WidgetId(0)).is_ok());
    }

    #[test]
    fn test_draw_paints_ink() {
        let mut host = Scheduler::new();
        let mut dash = dashboard();
        dash.start(&mut host, &clock());

        let mut target = InkCounter {
            size: Size::new(724, 536),
            ink: 0,
        };
        dash.draw(&mut target).unwrap();
        assert!(target.ink > 0);
    }
}
