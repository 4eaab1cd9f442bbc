//! Monotonic ticks and blocking delays

use std::thread;
use std::time::Duration;

use embassy_time::{Instant, TICK_HZ};
use embedded_hal::delay::DelayNs;
use pulsematrix_hal::TickSource;

/// Tick source backed by the `embassy-time` std driver
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub const fn new() -> Self {
        Self
    }
}

impl TickSource for MonotonicClock {
    fn now_ticks(&mut self) -> u64 {
        Instant::now().as_ticks()
    }

    fn ticks_per_us(&self) -> u64 {
        (TICK_HZ / 1_000_000).max(1)
    }
}

/// Delay that parks the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl ThreadDelay {
    pub const fn new() -> Self {
        Self
    }
}

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
