//! Host toolkit boundary: timers and redraw requests
//!
//! The core never schedules or draws on its own. It asks the [`Host`] to
//! register and cancel timers and to redraw widgets; the host's event loop
//! later calls back with the [`TimerHandle`] that fired.
//!
//! [`Scheduler`] is the in-crate host used by the simulator and the tests. It
//! keeps timers in virtual milliseconds so a driver can replay time
//! deterministically.

use embassy_time::Duration;
use heapless::Vec;
use log::{trace, warn};

use crate::ui::core::RedrawTarget;

/// Maximum number of live timers in a [`TimerQueue`]
pub const MAX_TIMERS: usize = 32;

/// Maximum number of distinct pending redraw targets
pub const MAX_REDRAWS: usize = 16;

/// Opaque identifier of a registered timer.
///
/// Handles are never reused, so a stale handle can only miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

/// Effects the core produces towards the host toolkit.
pub trait Host {
    /// Schedule a timer firing after `interval`, repeatedly if `repeating`.
    ///
    /// Returns `None` when the host cannot take another timer; the caller's
    /// slot then stays empty and the owner reports itself stopped.
    fn register_timer(&mut self, interval: Duration, repeating: bool) -> Option<TimerHandle>;

    /// Cancel a timer. Unknown or already-cancelled handles are ignored.
    fn cancel_timer(&mut self, handle: TimerHandle);

    /// Ask for a redraw; the host coalesces requests.
    fn request_redraw(&mut self, target: RedrawTarget);
}

/// Cancel the timer in `slot`, if any, leaving the slot empty.
pub fn cancel_slot<H: Host>(host: &mut H, slot: &mut Option<TimerHandle>) {
    if let Some(handle) = slot.take() {
        host.cancel_timer(handle);
    }
}

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    handle: TimerHandle,
    deadline_ms: u64,
    interval_ms: u64,
    repeating: bool,
}

/// Timer registry keyed by [`TimerHandle`] with virtual-millisecond deadlines.
///
/// ## Dispatch
///
/// The driver calls [`advance_to`](Self::advance_to) with the current time and
/// then drains [`pop_due`](Self::pop_due) until it returns `None`, dispatching
/// each handle. One-shot timers are removed before they are returned;
/// repeating timers are re-armed one interval after their previous deadline,
/// so a late driver catches up tick by tick. While a handle is being
/// dispatched, [`now_ms`](Self::now_ms) is that timer's deadline, so timers
/// registered from a callback are scheduled relative to the firing time.
#[derive(Debug)]
pub struct TimerQueue {
    timers: Vec<TimerEntry, MAX_TIMERS>,
    next_id: u32,
    now_ms: u64,
    target_ms: u64,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    pub const fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
            now_ms: 0,
            target_ms: 0,
        }
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Earliest pending deadline, if any timer is live
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.deadline_ms).min()
    }

    /// Register a timer. Intervals shorter than 1 ms are raised to 1 ms.
    ///
    /// Returns `None` when all [`MAX_TIMERS`] slots are live.
    pub fn register(&mut self, interval: Duration, repeating: bool) -> Option<TimerHandle> {
        if self.timers.is_full() {
            warn!("Timer queue full, dropping {} ms timer", interval.as_millis());
            return None;
        }

        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let interval_ms = interval.as_millis().max(1);
        let entry = TimerEntry {
            handle,
            deadline_ms: self.now_ms + interval_ms,
            interval_ms,
            repeating,
        };

        self.timers.push(entry).ok()?;
        trace!(
            "Registered {:?}: {} ms, repeating={}",
            handle, interval_ms, repeating
        );
        Some(handle)
    }

    /// Remove a timer. Returns whether it was live.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.timers.iter().position(|t| t.handle == handle) {
            Some(index) => {
                self.timers.swap_remove(index);
                trace!("Cancelled {:?}", handle);
                true
            }
            None => false,
        }
    }

    /// Set the time up to which [`pop_due`](Self::pop_due) dispatches.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.target_ms = self.target_ms.max(now_ms);
    }

    /// Next due handle in deadline order, `None` once caught up.
    pub fn pop_due(&mut self) -> Option<TimerHandle> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline_ms <= self.target_ms)
            .min_by_key(|(_, t)| (t.deadline_ms, t.handle.0))
            .map(|(i, _)| i);

        let Some(index) = index else {
            self.now_ms = self.target_ms;
            return None;
        };

        let entry = self.timers[index];
        self.now_ms = entry.deadline_ms;

        if entry.repeating {
            self.timers[index].deadline_ms = entry.deadline_ms + entry.interval_ms;
        } else {
            self.timers.swap_remove(index);
        }
        Some(entry.handle)
    }
}

/// [`Host`] implementation backed by a [`TimerQueue`] and a coalesced set of
/// redraw requests.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: TimerQueue,
    redraws: Vec<RedrawTarget, MAX_REDRAWS>,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            timers: TimerQueue::new(),
            redraws: Vec::new(),
        }
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// See [`TimerQueue::advance_to`]
    pub fn advance_to(&mut self, now_ms: u64) {
        self.timers.advance_to(now_ms);
    }

    /// See [`TimerQueue::pop_due`]
    pub fn pop_due(&mut self) -> Option<TimerHandle> {
        self.timers.pop_due()
    }

    /// Whether any redraw is pending
    pub fn needs_redraw(&self) -> bool {
        !self.redraws.is_empty()
    }

    /// Take the pending redraw targets, oldest first
    pub fn take_redraws(&mut self) -> Vec<RedrawTarget, MAX_REDRAWS> {
        core::mem::take(&mut self.redraws)
    }
}

impl Host for Scheduler {
    fn register_timer(&mut self, interval: Duration, repeating: bool) -> Option<TimerHandle> {
        self.timers.register(interval, repeating)
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }

    fn request_redraw(&mut self, target: RedrawTarget) {
        if self.redraws.contains(&target) {
            return;
        }
        if self.redraws.push(target).is_err() {
            // Saturated: a full-surface redraw covers everything
            self.redraws.clear();
            self.redraws.push(RedrawTarget::Surface).ok();
        }
    }
}

/// Host whose timer queue is always full
#[cfg(test)]
pub(crate) struct FullHost;

#[cfg(test)]
impl Host for FullHost {
    fn register_timer(&mut self, _: Duration, _: bool) -> Option<TimerHandle> {
        None
    }

    fn cancel_timer(&mut self, _: TimerHandle) {}

    fn request_redraw(&mut self, _: RedrawTarget) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::core::WidgetId;

    fn drain(queue: &mut TimerQueue, now_ms: u64) -> alloc::vec::Vec<(TimerHandle, u64)> {
        queue.advance_to(now_ms);
        let mut fired = alloc::vec::Vec::new();
        while let Some(handle) = queue.pop_due() {
            fired.push((handle, queue.now_ms()));
        }
        fired
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut queue = TimerQueue::new();
        let handle = queue.register(Duration::from_millis(100), false).unwrap();

        assert!(drain(&mut queue, 99).is_empty());
        assert_eq!(drain(&mut queue, 100), [(handle, 100)]);
        assert!(drain(&mut queue, 1_000).is_empty());
        assert!(!queue.is_live(handle));
        assert_eq!(queue.now_ms(), 1_000);
    }

    #[test]
    fn test_repeating_catches_up_in_order() {
        let mut queue = TimerQueue::new();
        let fast = queue.register(Duration::from_millis(10), true).unwrap();
        let slow = queue.register(Duration::from_millis(25), true).unwrap();

        let fired = drain(&mut queue, 50);
        assert_eq!(
            fired,
            [
                (fast, 10),
                (fast, 20),
                (slow, 25),
                (fast, 30),
                (fast, 40),
                (fast, 50),
                (slow, 50),
            ]
        );
        assert_eq!(queue.next_deadline(), Some(60));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut queue = TimerQueue::new();
        let handle = queue.register(Duration::from_millis(5), true).unwrap();

        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert!(!queue.cancel(TimerHandle(999)));
        assert!(drain(&mut queue, 100).is_empty());
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut queue = TimerQueue::new();
        let first = queue.register(Duration::from_millis(5), false).unwrap();
        queue.cancel(first);
        let second = queue.register(Duration::from_millis(5), false).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_zero_interval_is_raised() {
        let mut queue = TimerQueue::new();
        let handle = queue.register(Duration::from_millis(0), true).unwrap();
        assert_eq!(drain(&mut queue, 2), [(handle, 1), (handle, 2)]);
    }

    #[test]
    fn test_registration_during_dispatch_uses_firing_time() {
        let mut queue = TimerQueue::new();
        let first = queue.register(Duration::from_millis(100), false).unwrap();

        queue.advance_to(1_000);
        assert_eq!(queue.pop_due(), Some(first));
        let chained = queue.register(Duration::from_millis(50), false).unwrap();

        assert_eq!(queue.pop_due(), Some(chained));
        assert_eq!(queue.now_ms(), 150);
        assert_eq!(queue.pop_due(), None);
        assert_eq!(queue.now_ms(), 1_000);
    }

    #[test]
    fn test_full_queue_refuses_registration() {
        let mut queue = TimerQueue::new();
        let first = queue.register(Duration::from_millis(10), true).unwrap();
        for _ in 1..MAX_TIMERS {
            assert!(queue.register(Duration::from_millis(10), true).is_some());
        }
        assert_eq!(queue.register(Duration::from_millis(10), true), None);
        assert_eq!(queue.len(), MAX_TIMERS);

        assert!(queue.cancel(first));
        assert!(queue.register(Duration::from_millis(10), false).is_some());
    }

    #[test]
    fn test_redraws_are_coalesced() {
        let mut host = Scheduler::new();
        host.request_redraw(RedrawTarget::Widget(WidgetId(2)));
        host.request_redraw(RedrawTarget::Widget(WidgetId(2)));
        host.request_redraw(RedrawTarget::Surface);

        assert!(host.needs_redraw());
        assert_eq!(
            host.take_redraws().as_slice(),
            &[RedrawTarget::Widget(WidgetId(2)), RedrawTarget::Surface]
        );
        assert!(!host.needs_redraw());
    }
}
