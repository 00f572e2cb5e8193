//! Dashboard configuration and timing constants
//!
//! The on-device layout is literal: the widget set and grid coordinates are
//! fixed at compile time. [`DashboardConfig`] only carries the knobs that a
//! host may want to persist (window size, grid resolution, counter policy).

use serde::{Deserialize, Serialize};

// ============================================================================
// Grid
// ============================================================================

/// Default number of grid columns
pub const GRID_BLOCKS_X: u16 = 4;

/// Default number of grid rows
pub const GRID_BLOCKS_Y: u16 = 4;

/// Inset applied on every side of a widget's grid cell in pixels
pub const PADDING_PX: i32 = 10;

/// Maximum number of widgets a surface can hold
pub const MAX_WIDGETS: usize = 12;

// ============================================================================
// Window
// ============================================================================

/// Logical window width (landscape half-resolution of a 1448x1072 panel)
pub const WINDOW_WIDTH_PX: u32 = 724;

/// Logical window height
pub const WINDOW_HEIGHT_PX: u32 = 536;

// ============================================================================
// Dot counter
// ============================================================================

/// Interval between dot counter ticks in milliseconds
pub const COUNTER_TICK_MS: u64 = 1_000;

/// Length of one counter cycle in seconds
pub const COUNTER_PERIOD_SECS: u32 = 60;

// ============================================================================
// Dice roll
// ============================================================================

/// Noise redraw interval during the shuffle phase in milliseconds
pub const DICE_NOISE_MS: u64 = 80;

/// Duration of the shuffle phase in milliseconds
pub const DICE_SHUFFLE_MS: u64 = 1_200;

/// Ease tick interval during the settle phase (~60 FPS)
pub const DICE_EASE_MS: u64 = 16;

/// Fraction of the remaining distance covered by each ease tick
pub const DICE_EASING_FACTOR: f32 = 0.2;

/// Distance under which a dot snaps onto its target in pixels
pub const DICE_SNAP_DISTANCE_PX: f32 = 1.0;

/// Distance of the outer dice pips from the center, as a multiple of the radius
pub const DICE_PIP_SPREAD: f32 = 2.5;

/// Number of filler squares drawn per noise frame
pub const DICE_NOISE_SQUARES: usize = 30;

/// Default pip radius of the dice widget
pub const DICE_RADIUS_PX: u32 = 22;

// ============================================================================
// Clock
// ============================================================================

/// Clock cadence when seconds are displayed
pub const CLOCK_SECONDS_CADENCE_MS: u64 = 1_000;

/// Clock cadence once aligned to the minute boundary
pub const CLOCK_MINUTE_CADENCE_MS: u64 = 60_000;

// ============================================================================
// Text widgets
// ============================================================================

/// Horizontal inset subtracted from the quote's wrap width in pixels
pub const QUOTE_WRAP_INSET_PX: i32 = 6;

/// Quote shown until an external collaborator pushes another one
pub const DEFAULT_QUOTE: &str = "Two things are infinite: the universe and human stupidity; \
and I'm not sure about the universe.";

/// Radius of the decorative speaker grill dots
pub const GRILL_RADIUS_PX: u32 = 16;

/// Host-tunable dashboard settings.
///
/// `Default` reproduces the device layout.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DashboardConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub blocks_x: u16,
    pub blocks_y: u16,
    pub padding: i32,
    /// Draw grid separator lines over the dashboard
    pub grid_overlay: bool,
    /// Show seconds on the clock (skips minute alignment)
    pub clock_seconds: bool,
    pub counter: CounterConfig,
}

/// Timing policy of the progress-dot counter.
///
/// The two flags are independent; see `DotCounter::on_tick` for how they
/// interact at the end of a relative cycle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterConfig {
    /// Follow the wall clock's second field instead of counting ticks
    pub sync_with_clock: bool,
    /// Restart a relative cycle when it completes instead of stopping
    pub reset_after_done: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            sync_with_clock: true,
            reset_after_done: true,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH_PX,
            window_height: WINDOW_HEIGHT_PX,
            blocks_x: GRID_BLOCKS_X,
            blocks_y: GRID_BLOCKS_Y,
            padding: PADDING_PX,
            grid_overlay: true,
            clock_seconds: false,
            counter: CounterConfig::default(),
        }
    }
}
