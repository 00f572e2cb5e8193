//! Hardware-independent core library for inkdash
//!
//! This crate contains all platform-agnostic logic for the inkdash e-reader
//! dashboard: the block-grid layout engine, the host timer boundary, the
//! timer-driven widget state machines (dot counter, dice roll, clock
//! alignment) and the fixed dashboard that wires them together.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! the device and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod host;
pub mod ui;
pub mod widgets;

pub use dashboard::Dashboard;
pub use error::{DashError, DashResult};
