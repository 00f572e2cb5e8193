//! Time and date label with minute-boundary alignment
//!
//! Without seconds the clock waits for the next minute boundary with a
//! one-shot timer, updates once, and then ticks every 60 s. Once aligned it
//! never re-aligns, so it drifts with the host's timer accuracy.

use core::fmt::Write;

use embassy_time::Duration;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::String;
use log::debug;

use super::draw_text_block;
use crate::clock::{ClockReading, WallClock};
use crate::config::{CLOCK_MINUTE_CADENCE_MS, CLOCK_SECONDS_CADENCE_MS};
use crate::host::{Host, TimerHandle, cancel_slot};
use crate::ui::{Drawable, ManagedWidget, Placed, RedrawTarget};

/// Capacity of the formatted clock text
pub const CLOCK_TEXT_LEN: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignPhase {
    Stopped,
    /// One-shot pending until the next minute boundary
    AwaitingBoundary,
    /// Repeating at the display cadence
    Periodic,
}

/// Schedules clock refreshes, aligned to the minute when seconds are hidden.
#[derive(Debug)]
pub struct ClockAligner {
    show_seconds: bool,
    phase: AlignPhase,
    timer: Option<TimerHandle>,
}

impl ClockAligner {
    pub fn new(show_seconds: bool) -> Self {
        Self {
            show_seconds,
            phase: AlignPhase::Stopped,
            timer: None,
        }
    }

    pub fn phase(&self) -> AlignPhase {
        self.phase
    }

    pub fn show_seconds(&self) -> bool {
        self.show_seconds
    }

    /// Refresh interval once periodic
    pub fn cadence_ms(&self) -> u64 {
        if self.show_seconds {
            CLOCK_SECONDS_CADENCE_MS
        } else {
            CLOCK_MINUTE_CADENCE_MS
        }
    }

    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.timer == Some(handle)
    }

    /// Arm the first timer. With seconds shown the clock is periodic right
    /// away; otherwise it waits `(60 - second) s` for the next boundary.
    pub fn start<H: Host>(&mut self, host: &mut H, wall_second: u8) {
        cancel_slot(host, &mut self.timer);

        if self.show_seconds {
            self.enter_periodic(host);
            return;
        }

        let delay_ms = (60 - wall_second.min(59) as u64) * 1_000;
        debug!("Clock aligning to minute boundary in {} ms", delay_ms);
        self.timer = host.register_timer(Duration::from_millis(delay_ms), false);
        self.phase = self.armed_phase(AlignPhase::AwaitingBoundary);
    }

    pub fn stop<H: Host>(&mut self, host: &mut H) {
        cancel_slot(host, &mut self.timer);
        self.phase = AlignPhase::Stopped;
    }

    /// Dispatch a timer fire. Returns `true` when the handle belongs to this
    /// aligner, in which case the display must be refreshed.
    pub fn on_timer<H: Host>(&mut self, handle: TimerHandle, host: &mut H) -> bool {
        if !self.owns(handle) {
            return false;
        }

        if self.phase == AlignPhase::AwaitingBoundary {
            // The boundary one-shot is already retired
            self.timer = None;
            self.enter_periodic(host);
        }
        true
    }

    fn enter_periodic<H: Host>(&mut self, host: &mut H) {
        self.timer = host.register_timer(Duration::from_millis(self.cadence_ms()), true);
        self.phase = self.armed_phase(AlignPhase::Periodic);
    }

    fn armed_phase(&self, phase: AlignPhase) -> AlignPhase {
        if self.timer.is_some() {
            phase
        } else {
            AlignPhase::Stopped
        }
    }
}

/// Format `HH:MM[:SS]` over `DD-MM-YYYY`
pub fn format_clock(reading: &ClockReading, show_seconds: bool) -> String<CLOCK_TEXT_LEN> {
    let mut text = String::new();
    let _ = write!(text, "{:02}:{:02}", reading.hour, reading.minute);
    if show_seconds {
        let _ = write!(text, ":{:02}", reading.second);
    }
    let _ = write!(
        text,
        "\n{:02}-{:02}-{:04}",
        reading.day, reading.month, reading.year
    );
    text
}

/// Clock label driven by a [`ClockAligner`].
pub struct ClockWidget {
    layout: ManagedWidget,
    aligner: ClockAligner,
    text: String<CLOCK_TEXT_LEN>,
}

impl ClockWidget {
    pub fn new(layout: ManagedWidget, show_seconds: bool) -> Self {
        Self {
            layout,
            aligner: ClockAligner::new(show_seconds),
            text: String::new(),
        }
    }

    pub fn aligner(&self) -> &ClockAligner {
        &self.aligner
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Show the current time and arm the aligner
    pub fn start<H: Host, C: WallClock>(&mut self, host: &mut H, clock: &C) {
        let now = clock.now();
        self.show(host, &now);
        self.aligner.start(host, now.second);
    }

    pub fn stop<H: Host>(&mut self, host: &mut H) {
        self.aligner.stop(host);
    }

    pub fn on_timer<H: Host, C: WallClock>(
        &mut self,
        handle: TimerHandle,
        host: &mut H,
        clock: &C,
    ) -> bool {
        if !self.aligner.on_timer(handle, host) {
            return false;
        }
        self.show(host, &clock.now());
        true
    }

    fn show<H: Host>(&mut self, host: &mut H, reading: &ClockReading) {
        self.text = format_clock(reading, self.aligner.show_seconds());
        host.request_redraw(RedrawTarget::Widget(self.layout.id()));
    }
}

impl Placed for ClockWidget {
    fn managed(&self) -> &ManagedWidget {
        &self.layout
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        &mut self.layout
    }
}

impl Drawable for ClockWidget {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        match self.bounds() {
            Some(area) => draw_text_block(display, &self.text, &FONT_10X20, area),
            None => Ok(()),
        }
    }

    fn bounds(&self) -> Option<Rectangle> {
        self.layout.rect().to_rectangle()
    }
}
