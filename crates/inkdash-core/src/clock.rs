//! Wall-clock access for the time-aware widgets
//!
//! The core never reads the system time itself. Hosts implement [`WallClock`]
//! (the simulator wraps `chrono::Local`); tests use [`FixedClock`].

use core::cell::Cell;

/// Broken-down local time as read from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockReading {
    pub year: i32,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// 0..=59; leap seconds are folded into 59
    pub second: u8,
}

impl ClockReading {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second: second.min(59),
        }
    }
}

/// Source of the current local time
pub trait WallClock {
    fn now(&self) -> ClockReading;

    /// Second-of-minute field of the current time (0..=59)
    fn second(&self) -> u8 {
        self.now().second.min(59)
    }
}

impl<T: WallClock + ?Sized> WallClock for &T {
    fn now(&self) -> ClockReading {
        (**self).now()
    }
}

/// Settable clock for deterministic tests and replays.
#[derive(Debug, Default)]
pub struct FixedClock {
    reading: Cell<ClockReading>,
}

impl FixedClock {
    pub fn new(reading: ClockReading) -> Self {
        Self {
            reading: Cell::new(reading),
        }
    }

    pub fn set(&self, reading: ClockReading) {
        self.reading.set(reading);
    }

    /// Replace only the second field
    pub fn set_second(&self, second: u8) {
        let mut reading = self.reading.get();
        reading.second = second.min(59);
        self.reading.set(reading);
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> ClockReading {
        self.reading.get()
    }
}
