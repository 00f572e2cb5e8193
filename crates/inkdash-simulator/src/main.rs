//! Desktop simulator for the inkdash e-reader dashboard.
//!
//! Renders the inkdash-core dashboard in an SDL2 window via
//! `embedded-graphics-simulator`. Timers run on the wall clock through the
//! core's [`Scheduler`]; a background thread pushes synthetic battery
//! readings so the feedback path can be exercised without hardware.
//!
//! # Key bindings
//!
//! | Key | Action                          |
//! |-----|---------------------------------|
//! | G   | Toggle grid overlay             |
//! | R   | Toggle half-size surface        |
//! | B   | Push a battery reading          |
//! | W   | Push a weather update           |
//! | T   | Push a quote                    |
//! | N   | Push a notification             |
//! | Q   | Quit                            |
//!
//! Mouse clicks are forwarded as touch events.

use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::{Datelike, Local, Timelike};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use inkdash_core::Dashboard;
use inkdash_core::clock::{ClockReading, WallClock};
use inkdash_core::config::DashboardConfig;
use inkdash_core::feedback::{FEEDBACK_CHANNEL, Feedback, push_feedback};
use inkdash_core::host::Scheduler;
use inkdash_core::ui::{TouchEvent, TouchPoint};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 1;

/// Target frame duration (~60 FPS, matching the dice ease tick).
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Interval between synthetic battery readings.
const MOCK_BATTERY_INTERVAL: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Host services
// ---------------------------------------------------------------------------

/// Wall clock backed by the local timezone.
struct LocalClock;

impl WallClock for LocalClock {
    fn now(&self) -> ClockReading {
        let now = Local::now();
        ClockReading::new(
            now.year(),
            now.month() as u8,
            now.day() as u8,
            now.hour() as u8,
            now.minute() as u8,
            now.second() as u8,
        )
    }
}

/// Seed for the dice, taken once at startup.
fn startup_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Push a slowly draining battery level from a background thread.
fn spawn_battery_poller() {
    thread::spawn(|| {
        let mut level: i32 = 100;
        loop {
            thread::sleep(MOCK_BATTERY_INTERVAL);
            level = if level <= 5 { 100 } else { level - 5 };
            push_feedback(&FEEDBACK_CHANNEL, Feedback::battery(level, level == 100));
        }
    });
}

/// Map a key to a synthetic feedback event.
fn keycode_to_feedback(keycode: Keycode, rng: &mut SmallRng) -> Option<Feedback> {
    match keycode {
        Keycode::B => Some(Feedback::battery(
            rng.random_range(0..=100),
            rng.random_bool(0.5),
        )),
        Keycode::W => Some(Feedback::weather("~", rng.random_range(-10..=35), "Windy")),
        Keycode::T => Some(Feedback::quote("Stay hungry, stay foolish.")),
        Keycode::N => Some(Feedback::notification(
            "Reminder",
            "Stand up and stretch. Tap to dismiss.",
        )),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();

    let config = DashboardConfig::default();
    let full_size = (config.window_width, config.window_height);

    info!("Starting inkdash simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        full_size.0, full_size.1, WINDOW_SCALE
    );
    info!("Keys: G=Grid  R=Resize  B=Battery  W=Weather  T=Quote  N=Notify  Q=Quit");

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(full_size.0, full_size.1));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("inkdash", &output_settings);

    let seed = startup_seed();
    let mut dashboard = match Dashboard::new(config, SmallRng::seed_from_u64(seed)) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            error!("Failed to build dashboard: {}", e);
            return;
        }
    };
    let mut mock_rng = SmallRng::seed_from_u64(seed ^ 0x5eed);

    let clock = LocalClock;
    let mut host = Scheduler::new();
    let started = Instant::now();

    dashboard.start(&mut host, &clock);
    spawn_battery_poller();

    let mut half_size = false;

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    if let Err(e) = dashboard.draw(&mut display) {
        error!("Draw error: {:?}", e);
    }
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::G => {
                        let enabled = !dashboard.config().grid_overlay;
                        dashboard.set_grid_overlay(&mut host, enabled);
                    }
                    Keycode::R => {
                        half_size = !half_size;
                        let (w, h) = if half_size {
                            (full_size.0 / 2, full_size.1 / 2)
                        } else {
                            full_size
                        };
                        dashboard.on_resize(&mut host, w, h);
                    }
                    other => {
                        if let Some(feedback) = keycode_to_feedback(other, &mut mock_rng) {
                            info!("Pushing {:?}", feedback);
                            push_feedback(&FEEDBACK_CHANNEL, feedback);
                        }
                    }
                },

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let touch = TouchEvent::Press(TouchPoint::new(point.x, point.y));
                    dashboard.handle_touch(&mut host, touch);
                }

                _ => {}
            }
        }

        // --- Timers -------------------------------------------------------
        host.advance_to(started.elapsed().as_millis() as u64);
        while let Some(handle) = host.pop_due() {
            dashboard.on_timer(handle, &mut host, &clock);
        }

        // --- Feedback -----------------------------------------------------
        dashboard.drain_feedback(&mut host, &FEEDBACK_CHANNEL);

        // --- Render -------------------------------------------------------
        if host.needs_redraw() {
            host.take_redraws();
            if let Err(e) = dashboard.draw(&mut display) {
                error!("Draw error: {:?}", e);
            }
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    dashboard.shutdown(&mut host);
    info!("Simulator exiting");
}
