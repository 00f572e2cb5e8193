//! Progress-dot counter: a speaker grill whose fill level tracks a minute
//!
//! The counter ticks once per second under one of two timing policies:
//!
//! - **WallClockSynced**: the fill level follows the wall clock's second
//!   field, so the grid fills over each real minute and wraps on its own.
//! - **RelativeElapsed**: the counter counts its own ticks up to the period
//!   and then either restarts the cycle or stops ticking for good.
//!
//! Redraws are requested only when the fill level grows, so seconds that
//! collapse onto the same dot do not cost a redraw.

use embassy_time::Duration;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use super::grill::GrillGeometry;
use crate::clock::WallClock;
use crate::config::{COUNTER_PERIOD_SECS, COUNTER_TICK_MS, CounterConfig};
use crate::host::{Host, TimerHandle, cancel_slot};
use crate::ui::{Drawable, ManagedWidget, Placed, RedrawTarget, WidgetId};

const SECONDS_PER_MINUTE: u32 = 60;

/// Timing policy of a [`DotCounter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMode {
    /// Fill level follows the wall clock's second field
    WallClockSynced,
    /// Fill level follows the counter's own elapsed ticks
    RelativeElapsed,
}

/// Fill level for `seconds` out of `span`: `floor(total * seconds / span)`,
/// never above `total`.
pub fn fill_level(total_dots: u32, seconds: u32, span: u32) -> u32 {
    let span = span.max(1) as u64;
    ((total_dots as u64 * seconds as u64) / span).min(total_dots as u64) as u32
}

/// Progress-dot state machine.
#[derive(Debug)]
pub struct DotCounter {
    mode: CounterMode,
    reset_after_done: bool,
    period_seconds: u32,
    total_dots: u32,
    filled_dots: u32,
    prev_filled: u32,
    elapsed_seconds: u32,
    tick: Option<TimerHandle>,
}

impl DotCounter {
    pub fn new(mode: CounterMode, reset_after_done: bool) -> Self {
        Self {
            mode,
            reset_after_done,
            period_seconds: COUNTER_PERIOD_SECS,
            total_dots: 0,
            filled_dots: 0,
            prev_filled: 0,
            elapsed_seconds: 0,
            tick: None,
        }
    }

    pub fn from_config(config: &CounterConfig) -> Self {
        let mode = if config.sync_with_clock {
            CounterMode::WallClockSynced
        } else {
            CounterMode::RelativeElapsed
        };
        Self::new(mode, config.reset_after_done)
    }

    /// Start the 1 Hz tick, replacing any running one.
    pub fn start<H: Host>(&mut self, host: &mut H) {
        cancel_slot(host, &mut self.tick);
        self.tick = host.register_timer(Duration::from_millis(COUNTER_TICK_MS), true);
    }

    /// Stop ticking. Safe to call when already stopped.
    pub fn stop<H: Host>(&mut self, host: &mut H) {
        cancel_slot(host, &mut self.tick);
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.tick == Some(handle)
    }

    pub fn mode(&self) -> CounterMode {
        self.mode
    }

    pub fn total_dots(&self) -> u32 {
        self.total_dots
    }

    pub fn filled_dots(&self) -> u32 {
        self.filled_dots
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Update the dot capacity after a layout change.
    pub fn set_total_dots(&mut self, total_dots: u32) {
        self.total_dots = total_dots;
        self.filled_dots = self.filled_dots.min(total_dots);
        self.prev_filled = self.prev_filled.min(total_dots);
    }

    /// Advance one tick.
    ///
    /// With no dots to fill the tick updates nothing and requests no redraw.
    /// In relative mode, reaching the period restarts the cycle with a forced
    /// redraw when `reset_after_done` is set, and cancels the tick otherwise.
    pub fn on_tick<H: Host, C: WallClock>(&mut self, host: &mut H, clock: &C, widget: WidgetId) {
        let (seconds, span) = match self.mode {
            CounterMode::WallClockSynced => (clock.second() as u32 + 1, SECONDS_PER_MINUTE),
            CounterMode::RelativeElapsed => {
                self.elapsed_seconds = (self.elapsed_seconds + 1).min(self.period_seconds);
                (self.elapsed_seconds, self.period_seconds)
            }
        };

        if self.total_dots > 0 {
            let filled = fill_level(self.total_dots, seconds, span);
            if filled > self.prev_filled {
                host.request_redraw(RedrawTarget::Widget(widget));
            }
            self.prev_filled = filled;
            self.filled_dots = filled;
        }

        if self.mode == CounterMode::RelativeElapsed && seconds == self.period_seconds {
            if self.reset_after_done {
                debug!("Counter {:?} cycle complete, restarting", widget);
                self.elapsed_seconds = 0;
                self.prev_filled = 0;
                if self.total_dots > 0 {
                    host.request_redraw(RedrawTarget::Widget(widget));
                }
            } else {
                debug!("Counter {:?} cycle complete, stopping", widget);
                cancel_slot(host, &mut self.tick);
            }
        }
    }
}

/// Speaker grill driven by a [`DotCounter`].
pub struct CounterWidget {
    layout: ManagedWidget,
    radius: u32,
    counter: DotCounter,
}

impl CounterWidget {
    pub fn new(layout: ManagedWidget, radius: u32, counter: DotCounter) -> Self {
        Self {
            layout,
            radius,
            counter,
        }
    }

    pub fn counter(&self) -> &DotCounter {
        &self.counter
    }

    pub fn geometry(&self) -> GrillGeometry {
        GrillGeometry::for_rect(self.layout.rect(), self.radius)
    }

    pub fn start<H: Host>(&mut self, host: &mut H) {
        self.sync_capacity();
        self.counter.start(host);
    }

    pub fn stop<H: Host>(&mut self, host: &mut H) {
        self.counter.stop(host);
    }

    /// Handle a timer fire; returns whether the handle belonged to this widget.
    pub fn on_timer<H: Host, C: WallClock>(
        &mut self,
        handle: TimerHandle,
        host: &mut H,
        clock: &C,
    ) -> bool {
        if !self.counter.owns(handle) {
            return false;
        }
        self.sync_capacity();
        self.counter.on_tick(host, clock, self.layout.id());
        true
    }

    /// Recompute the dot capacity from the current rectangle
    pub fn sync_capacity(&mut self) {
        self.counter.set_total_dots(self.geometry().total_dots());
    }
}

impl Placed for CounterWidget {
    fn managed(&self) -> &ManagedWidget {
        &self.layout
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        &mut self.layout
    }
}

impl Drawable for CounterWidget {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.geometry().draw_dots(
            display,
            self.layout.rect().top_left(),
            self.counter.filled_dots(),
        )
    }

    fn bounds(&self) -> Option<Rectangle> {
        self.layout.rect().to_rectangle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockReading, FixedClock};
    use crate::host::{FullHost, Scheduler};

    const WIDGET: WidgetId = WidgetId(3);

    fn clock_at(second: u8) -> FixedClock {
        FixedClock::new(ClockReading::new(2024, 1, 1, 12, 0, second))
    }

    /// Run `ticks` timer fires through the scheduler, returning how many
    /// redraws were requested.
    fn run_ticks(
        counter: &mut DotCounter,
        host: &mut Scheduler,
        clock: &FixedClock,
        ticks: u64,
    ) -> usize {
        let mut redraws = 0;
        let start = host.timers().now_ms();
        for n in 1..=ticks {
            host.advance_to(start + n * COUNTER_TICK_MS);
            while let Some(handle) = host.pop_due() {
                if counter.owns(handle) {
                    counter.on_tick(host, clock, WIDGET);
                }
            }
            redraws += host.take_redraws().len();
        }
        redraws
    }

    #[test]
    fn test_fill_level_floors() {
        assert_eq!(fill_level(30, 1, 60), 0);
        assert_eq!(fill_level(30, 2, 60), 1);
        assert_eq!(fill_level(30, 59, 60), 29);
        assert_eq!(fill_level(30, 60, 60), 30);
        assert_eq!(fill_level(30, 90, 60), 30);
        assert_eq!(fill_level(7, 10, 0), 7);
    }

    #[test]
    fn test_synced_fill_is_monotonic_within_minute() {
        let mut host = Scheduler::new();
        let mut counter = DotCounter::new(CounterMode::WallClockSynced, true);
        counter.set_total_dots(30);
        counter.start(&mut host);

        let clock = clock_at(0);
        let mut previous = 0;
        for second in 0..60u8 {
            clock.set_second(second);
            counter.on_tick(&mut host, &clock, WIDGET);
            assert!(counter.filled_dots() >= previous);
            previous = counter.filled_dots();
        }
        assert_eq!(counter.filled_dots(), 30);
    }

    #[test]
    fn test_synced_redraws_only_on_growth() {
        let mut host = Scheduler::new();
        let mut counter = DotCounter::new(CounterMode::WallClockSynced, true);
        counter.set_total_dots(2);

        // seconds 1..=29 map to 0 dots, 30 to 1 dot
        for second in 0..29u8 {
            counter.on_tick(&mut host, &clock_at(second), WIDGET);
            assert!(!host.needs_redraw(), "no growth at second {}", second);
        }
        counter.on_tick(&mut host, &clock_at(29), WIDGET);
        assert_eq!(counter.filled_dots(), 1);
        assert_eq!(host.take_redraws().as_slice(), &[RedrawTarget::Widget(WIDGET)]);

        // Wrapping to a new minute lowers the fill without a redraw
        counter.on_tick(&mut host, &clock_at(0), WIDGET);
        assert_eq!(counter.filled_dots(), 0);
        assert!(!host.needs_redraw());
    }

    #[test]
    fn test_relative_cycle_with_auto_reset() {
        let mut host = Scheduler::new();
        let clock = clock_at(0);
        let mut counter = DotCounter::new(CounterMode::RelativeElapsed, true);
        counter.set_total_dots(30);
        counter.start(&mut host);

        run_ticks(&mut counter, &mut host, &clock, 30);
        assert_eq!(counter.filled_dots(), 15);

        run_ticks(&mut counter, &mut host, &clock, 30);
        assert_eq!(counter.filled_dots(), 30);
        assert_eq!(counter.elapsed_seconds(), 0);

        run_ticks(&mut counter, &mut host, &clock, 1);
        assert_eq!(counter.filled_dots(), 0);
        assert_eq!(counter.elapsed_seconds(), 1);
        assert!(counter.is_running());
    }

    #[test]
    fn test_relative_cycle_without_reset_stops_ticking() {
        let mut host = Scheduler::new();
        let clock = clock_at(0);
        let mut counter = DotCounter::new(CounterMode::RelativeElapsed, false);
        counter.set_total_dots(30);
        counter.start(&mut host);

        run_ticks(&mut counter, &mut host, &clock, 59);
        assert!(counter.is_running());
        assert_eq!(counter.filled_dots(), 29);

        run_ticks(&mut counter, &mut host, &clock, 1);
        assert_eq!(counter.filled_dots(), 30);
        assert!(!counter.is_running());
        assert!(host.timers().is_empty());

        // Tick 61 never fires
        let redraws = run_ticks(&mut counter, &mut host, &clock, 5);
        assert_eq!(redraws, 0);
        assert_eq!(counter.elapsed_seconds(), 60);
        assert_eq!(counter.filled_dots(), 30);
    }

    #[test]
    fn test_zero_dots_skips_fill_and_redraw() {
        let mut host = Scheduler::new();
        let clock = clock_at(0);
        let mut counter = DotCounter::new(CounterMode::RelativeElapsed, true);
        counter.start(&mut host);

        let redraws = run_ticks(&mut counter, &mut host, &clock, 60);
        assert_eq!(redraws, 0);
        assert_eq!(counter.filled_dots(), 0);
        // The cycle still restarts
        assert_eq!(counter.elapsed_seconds(), 0);
    }

    #[test]
    fn test_restart_replaces_running_timer() {
        let mut host = Scheduler::new();
        let mut counter = DotCounter::new(CounterMode::WallClockSynced, true);

        counter.start(&mut host);
        counter.start(&mut host);
        assert_eq!(host.timers().len(), 1);

        counter.stop(&mut host);
        counter.stop(&mut host);
        assert!(host.timers().is_empty());
    }

    #[test]
    fn test_full_host_leaves_counter_stopped() {
        let mut counter = DotCounter::new(CounterMode::RelativeElapsed, true);
        counter.start(&mut FullHost);
        assert!(!counter.is_running());
    }

    #[test]
    fn test_shrinking_capacity_clamps_fill() {
        let mut counter = DotCounter::new(CounterMode::WallClockSynced, true);
        let mut host = Scheduler::new();
        counter.set_total_dots(30);
        counter.on_tick(&mut host, &clock_at(59), WIDGET);
        assert_eq!(counter.filled_dots(), 30);

        counter.set_total_dots(4);
        assert_eq!(counter.filled_dots(), 4);
    }
}
