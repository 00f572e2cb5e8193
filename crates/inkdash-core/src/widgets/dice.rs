//! Dice roll built from speaker-grill dots
//!
//! A press rolls a face uniformly from 1 to 6 and drives a three-phase
//! animation:
//!
//! ```text
//! Idle ──press──▶ Shuffling ──1200 ms──▶ Settling ──converged──▶ Idle
//!                  (noise every 80 ms)    (ease every 16 ms)
//! ```
//!
//! While settling every pip starts at the widget center and covers a fixed
//! fraction of its remaining distance per tick until it snaps onto its
//! target. A press in any phase cancels whatever timers are live and starts
//! a fresh roll.

use alloc::vec::Vec;

use embassy_time::Duration;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use log::{debug, info};
use rand::{Rng, RngCore};

use crate::config::{
    DICE_EASE_MS, DICE_EASING_FACTOR, DICE_NOISE_MS, DICE_NOISE_SQUARES, DICE_PIP_SPREAD,
    DICE_SHUFFLE_MS, DICE_SNAP_DISTANCE_PX,
};
use crate::host::{Host, TimerHandle, cancel_slot};
use crate::ui::colors::{COLOR_INK, COLOR_NOISE};
use crate::ui::{Drawable, ManagedWidget, Placed, RedrawTarget, WidgetId};

/// Maximum number of pips on a face
pub const MAX_PIPS: usize = 6;

/// Animation phase of a [`RollAnimator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollPhase {
    Idle,
    /// Noise frames until the shuffle one-shot fires
    Shuffling,
    /// Pips easing towards their face positions
    Settling,
}

/// A pip with its current and target centers, relative to the widget origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
}

impl Dot {
    fn at_center(cx: f32, cy: f32, (target_x, target_y): (f32, f32)) -> Self {
        Self {
            x: cx,
            y: cy,
            target_x,
            target_y,
        }
    }

    /// Move one easing step; returns whether the dot was still travelling.
    fn step(&mut self) -> bool {
        let dx = self.target_x - self.x;
        let dy = self.target_y - self.y;

        if dx * dx + dy * dy > DICE_SNAP_DISTANCE_PX * DICE_SNAP_DISTANCE_PX {
            self.x += dx * DICE_EASING_FACTOR;
            self.y += dy * DICE_EASING_FACTOR;
            true
        } else {
            self.snap();
            false
        }
    }

    fn snap(&mut self) {
        self.x = self.target_x;
        self.y = self.target_y;
    }

    pub fn is_settled(&self) -> bool {
        self.x == self.target_x && self.y == self.target_y
    }
}

/// Pip centers for `face` in a `width × height` area.
///
/// Outer pips sit `2.5 · radius` from the center on both axes. Faces outside
/// 1..=6 have no pips.
pub fn dice_positions(
    face: u8,
    width: i32,
    height: i32,
    radius: u32,
) -> heapless::Vec<(f32, f32), MAX_PIPS> {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let pad = radius as f32 * DICE_PIP_SPREAD;

    let (left, right, top, bottom) = (cx - pad, cx + pad, cy - pad, cy + pad);

    let pips: &[(f32, f32)] = match face {
        1 => &[(cx, cy)],
        2 => &[(left, top), (right, bottom)],
        3 => &[(left, top), (cx, cy), (right, bottom)],
        4 => &[(left, top), (right, top), (left, bottom), (right, bottom)],
        5 => &[(left, top), (right, top), (cx, cy), (left, bottom), (right, bottom)],
        6 => &[
            (left, top),
            (right, top),
            (left, cy),
            (right, cy),
            (left, bottom),
            (right, bottom),
        ],
        _ => &[],
    };

    heapless::Vec::from_slice(pips).unwrap_or_default()
}

/// Top-left corners of the filler squares shown while shuffling.
///
/// Squares of side `size` are placed uniformly so they stay inside the
/// widget; an area no larger than one square yields none.
pub fn noise_squares<R: RngCore>(
    rng: &mut R,
    width: i32,
    height: i32,
    size: u32,
) -> heapless::Vec<Point, DICE_NOISE_SQUARES> {
    let mut squares = heapless::Vec::new();
    let size = size as i32;
    if width <= size || height <= size {
        return squares;
    }

    while !squares.is_full() {
        let point = Point::new(
            rng.random_range(0..width - size),
            rng.random_range(0..height - size),
        );
        squares.push(point).ok();
    }
    squares
}

/// Roll state machine with an injected random source.
#[derive(Debug)]
pub struct RollAnimator<R> {
    rng: R,
    radius: u32,
    phase: RollPhase,
    face: u8,
    dots: Vec<Dot>,
    noise: heapless::Vec<Point, DICE_NOISE_SQUARES>,
    noise_timer: Option<TimerHandle>,
    shuffle_timer: Option<TimerHandle>,
    ease_timer: Option<TimerHandle>,
}

impl<R: RngCore> RollAnimator<R> {
    pub fn new(rng: R, radius: u32) -> Self {
        Self {
            rng,
            radius,
            phase: RollPhase::Idle,
            face: 1,
            dots: Vec::new(),
            noise: heapless::Vec::new(),
            noise_timer: None,
            shuffle_timer: None,
            ease_timer: None,
        }
    }

    pub fn phase(&self) -> RollPhase {
        self.phase
    }

    /// Face of the most recent roll
    pub fn face(&self) -> u8 {
        self.face
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn noise(&self) -> &[Point] {
        &self.noise
    }

    pub fn owns(&self, handle: TimerHandle) -> bool {
        [self.noise_timer, self.shuffle_timer, self.ease_timer].contains(&Some(handle))
    }

    /// Whether any of the animation timers is live
    pub fn is_animating(&self) -> bool {
        self.noise_timer.is_some() || self.shuffle_timer.is_some() || self.ease_timer.is_some()
    }

    /// Start a new roll for a `width × height` widget.
    pub fn press<H: Host>(&mut self, host: &mut H, width: i32, height: i32) {
        self.cancel_all(host);

        self.face = self.rng.random_range(1..=6);
        info!("Rolling dice -> {}", self.face);

        self.phase = RollPhase::Shuffling;
        self.noise = noise_squares(&mut self.rng, width, height, self.radius);
        self.noise_timer = host.register_timer(Duration::from_millis(DICE_NOISE_MS), true);
        self.shuffle_timer =
            host.register_timer(Duration::from_millis(DICE_SHUFFLE_MS), false);
        if self.shuffle_timer.is_none() {
            self.settle(host, width, height);
        }
    }

    /// Dispatch a timer fire. Returns whether the handle belonged to this
    /// animator.
    pub fn on_timer<H: Host>(
        &mut self,
        handle: TimerHandle,
        host: &mut H,
        width: i32,
        height: i32,
        widget: WidgetId,
    ) -> bool {
        if self.noise_timer == Some(handle) {
            self.noise = noise_squares(&mut self.rng, width, height, self.radius);
            host.request_redraw(RedrawTarget::Widget(widget));
        } else if self.shuffle_timer == Some(handle) {
            // One-shot: already retired by the host
            self.shuffle_timer = None;
            self.settle(host, width, height);
        } else if self.ease_timer == Some(handle) {
            self.ease(host, widget);
        } else {
            return false;
        }
        true
    }

    /// Cancel every live timer and return to idle, snapping any easing dot
    /// onto its pip. Safe to call repeatedly.
    pub fn cancel_all<H: Host>(&mut self, host: &mut H) {
        cancel_slot(host, &mut self.noise_timer);
        cancel_slot(host, &mut self.shuffle_timer);
        cancel_slot(host, &mut self.ease_timer);
        for dot in &mut self.dots {
            dot.snap();
        }
        self.noise.clear();
        self.phase = RollPhase::Idle;
    }

    fn settle<H: Host>(&mut self, host: &mut H, width: i32, height: i32) {
        cancel_slot(host, &mut self.noise_timer);
        self.noise.clear();

        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        self.dots = dice_positions(self.face, width, height, self.radius)
            .into_iter()
            .map(|target| Dot::at_center(cx, cy, target))
            .collect();

        debug!("Dice settling on {} pips", self.dots.len());
        self.phase = RollPhase::Settling;
        self.ease_timer = host.register_timer(Duration::from_millis(DICE_EASE_MS), true);
        if self.ease_timer.is_none() {
            self.cancel_all(host);
        }
    }

    fn ease<H: Host>(&mut self, host: &mut H, widget: WidgetId) {
        let mut moving = false;
        for dot in &mut self.dots {
            moving |= dot.step();
        }

        host.request_redraw(RedrawTarget::Widget(widget));

        if !moving {
            cancel_slot(host, &mut self.ease_timer);
            self.phase = RollPhase::Idle;
            debug!("Dice settled on {}", self.face);
        }
    }
}

/// Dice widget: a [`RollAnimator`] placed on the dashboard.
pub struct DiceWidget<R> {
    layout: ManagedWidget,
    animator: RollAnimator<R>,
}

impl<R: RngCore> DiceWidget<R> {
    pub fn new(layout: ManagedWidget, rng: R, radius: u32) -> Self {
        Self {
            layout,
            animator: RollAnimator::new(rng, radius),
        }
    }

    pub fn animator(&self) -> &RollAnimator<R> {
        &self.animator
    }

    /// Roll the dice
    pub fn press<H: Host>(&mut self, host: &mut H) {
        let rect = self.layout.rect();
        self.animator.press(host, rect.w, rect.h);
        host.request_redraw(RedrawTarget::Widget(self.layout.id()));
    }

    pub fn on_timer<H: Host>(&mut self, handle: TimerHandle, host: &mut H) -> bool {
        let rect = self.layout.rect();
        self.animator
            .on_timer(handle, host, rect.w, rect.h, self.layout.id())
    }

    pub fn stop<H: Host>(&mut self, host: &mut H) {
        self.animator.cancel_all(host);
    }
}

impl<R> Placed for DiceWidget<R> {
    fn managed(&self) -> &ManagedWidget {
        &self.layout
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        &mut self.layout
    }
}

impl<R: RngCore> Drawable for DiceWidget<R> {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let origin = self.layout.rect().top_left();
        let radius = self.animator.radius();

        if self.animator.phase() == RollPhase::Shuffling {
            let style = PrimitiveStyle::with_fill(COLOR_NOISE);
            for corner in self.animator.noise() {
                Rectangle::new(origin + *corner, Size::new(radius, radius))
                    .into_styled(style)
                    .draw(display)?;
            }
            return Ok(());
        }

        let style = PrimitiveStyle::with_fill(COLOR_INK);
        for dot in self.animator.dots() {
            Circle::with_center(origin + Point::new(dot.x as i32, dot.y as i32), radius * 2)
                .into_styled(style)
                .draw(display)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Option<Rectangle> {
        self.layout.rect().to_rectangle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FullHost, Scheduler};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const WIDGET: WidgetId = WidgetId(5);

    /// Scheduler that records every cancel it receives
    #[derive(Default)]
    struct RecordingHost {
        inner: Scheduler,
        cancels: Vec<TimerHandle>,
    }

    impl Host for RecordingHost {
        fn register_timer(&mut self, interval: Duration, repeating: bool) -> Option<TimerHandle> {
            self.inner.register_timer(interval, repeating)
        }

        fn cancel_timer(&mut self, handle: TimerHandle) {
            self.cancels.push(handle);
            self.inner.cancel_timer(handle);
        }

        fn request_redraw(&mut self, target: RedrawTarget) {
            self.inner.request_redraw(target);
        }
    }

    fn animator(seed: u64) -> RollAnimator<SmallRng> {
        RollAnimator::new(SmallRng::seed_from_u64(seed), 22)
    }

    /// Fire every timer due up to `until_ms`
    fn run_until(anim: &mut RollAnimator<SmallRng>, host: &mut RecordingHost, until_ms: u64) {
        host.inner.advance_to(until_ms);
        while let Some(handle) = host.inner.pop_due() {
            anim.on_timer(handle, host, 161, 114, WIDGET);
        }
    }

    #[test]
    fn test_face_one_is_centered() {
        let pips = dice_positions(1, 160, 120, 22);
        assert_eq!(pips.as_slice(), &[(80.0, 60.0)]);
    }

    #[test]
    fn test_face_six_is_two_symmetric_columns() {
        let pips = dice_positions(6, 160, 120, 20);
        assert_eq!(pips.len(), 6);

        let left: alloc::vec::Vec<_> = pips.iter().filter(|(x, _)| *x == 30.0).collect();
        let right: alloc::vec::Vec<_> = pips.iter().filter(|(x, _)| *x == 130.0).collect();
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 3);

        for ((_, ly), (_, ry)) in left.iter().zip(right.iter()) {
            assert_eq!(ly, ry);
        }
        let mut rows: alloc::vec::Vec<i32> = left.iter().map(|(_, y)| *y as i32).collect();
        rows.sort();
        assert_eq!(rows, [10, 60, 110]);
    }

    #[test]
    fn test_pip_counts_match_faces() {
        for face in 1..=6u8 {
            assert_eq!(dice_positions(face, 100, 100, 10).len(), face as usize);
        }
        assert!(dice_positions(0, 100, 100, 10).is_empty());
        assert!(dice_positions(7, 100, 100, 10).is_empty());
    }

    #[test]
    fn test_noise_stays_inside_widget() {
        let mut rng = SmallRng::seed_from_u64(7);
        let squares = noise_squares(&mut rng, 161, 114, 22);
        assert_eq!(squares.len(), DICE_NOISE_SQUARES);
        for corner in &squares {
            assert!((0..139).contains(&corner.x));
            assert!((0..92).contains(&corner.y));
        }

        assert!(noise_squares(&mut rng, 22, 100, 22).is_empty());
    }

    #[test]
    fn test_press_starts_shuffle() {
        let mut host = RecordingHost::default();
        let mut anim = animator(1);

        anim.press(&mut host, 161, 114);
        assert_eq!(anim.phase(), RollPhase::Shuffling);
        assert!((1..=6).contains(&anim.face()));
        assert_eq!(host.inner.timers().len(), 2);
        assert_eq!(anim.noise().len(), DICE_NOISE_SQUARES);
    }

    #[test]
    fn test_roll_converges_and_cancels_ease_once() {
        let mut host = RecordingHost::default();
        let mut anim = animator(42);
        anim.press(&mut host, 161, 114);

        run_until(&mut anim, &mut host, DICE_SHUFFLE_MS);
        assert_eq!(anim.phase(), RollPhase::Settling);
        assert_eq!(anim.dots().len(), anim.face() as usize);
        // Noise timer cancelled at the phase change
        assert_eq!(host.cancels.len(), 1);
        let ease = anim.ease_timer.unwrap();

        run_until(&mut anim, &mut host, DICE_SHUFFLE_MS + 2_000);
        assert_eq!(anim.phase(), RollPhase::Idle);
        assert!(!anim.is_animating());
        assert!(host.inner.timers().is_empty());
        assert!(anim.dots().iter().all(Dot::is_settled));
        assert_eq!(host.cancels.iter().filter(|h| **h == ease).count(), 1);
    }

    #[test]
    fn test_settling_requests_redraw_every_tick() {
        let mut host = RecordingHost::default();
        let mut anim = animator(3);
        anim.press(&mut host, 161, 114);
        run_until(&mut anim, &mut host, DICE_SHUFFLE_MS);
        host.inner.take_redraws();

        run_until(&mut anim, &mut host, DICE_SHUFFLE_MS + DICE_EASE_MS);
        assert_eq!(
            host.inner.take_redraws().as_slice(),
            &[RedrawTarget::Widget(WIDGET)]
        );
    }

    #[test]
    fn test_press_while_settling_restarts() {
        let mut host = RecordingHost::default();
        let mut anim = animator(9);
        anim.press(&mut host, 161, 114);
        run_until(&mut anim, &mut host, DICE_SHUFFLE_MS + 32);
        assert_eq!(anim.phase(), RollPhase::Settling);

        anim.press(&mut host, 161, 114);
        assert_eq!(anim.phase(), RollPhase::Shuffling);
        // Only the fresh noise and shuffle timers remain
        assert_eq!(host.inner.timers().len(), 2);
    }

    #[test]
    fn test_cancel_while_settling_snaps_dots() {
        let mut host = RecordingHost::default();
        let mut anim = animator(9);
        anim.press(&mut host, 161, 114);
        run_until(&mut anim, &mut host, DICE_SHUFFLE_MS + 32);
        assert_eq!(anim.phase(), RollPhase::Settling);

        anim.cancel_all(&mut host);
        assert_eq!(anim.phase(), RollPhase::Idle);
        assert_eq!(anim.dots().len(), anim.face() as usize);
        assert!(anim.dots().iter().all(Dot::is_settled));
        assert!(host.inner.timers().is_empty());
    }

    #[test]
    fn test_refused_timers_settle_immediately() {
        let mut anim = animator(4);
        anim.press(&mut FullHost, 161, 114);

        assert_eq!(anim.phase(), RollPhase::Idle);
        assert!(!anim.is_animating());
        assert_eq!(anim.dots().len(), anim.face() as usize);
        assert!(anim.dots().iter().all(Dot::is_settled));
    }

    #[test]
    fn test_foreign_handle_is_ignored() {
        let mut host = RecordingHost::default();
        let mut anim = animator(0);
        let foreign = host.register_timer(Duration::from_millis(5), false).unwrap();
        assert!(!anim.on_timer(foreign, &mut host, 100, 100, WIDGET));
        assert_eq!(anim.phase(), RollPhase::Idle);
    }
}
