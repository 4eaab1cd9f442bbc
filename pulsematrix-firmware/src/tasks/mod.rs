//! Worker threads
//!
//! Each worker owns its device handles and shares only the distance cell
//! and the stop flag with the other.

pub mod display;
pub mod ranging;

pub use display::display_task;
pub use ranging::ranging_task;

use std::thread;
use std::time::Duration;

use log::{info, warn};

use pulsematrix_core::sync::StopFlag;
use pulsematrix_hal_linux::sched::set_realtime_priority;

/// Longest uninterrupted sleep; bounds shutdown latency
pub const SLEEP_SLICE_MS: u32 = 20;

/// Sleep for `ms` unless a stop is requested first
///
/// Returns `false` if the stop flag was raised before or during the sleep.
pub fn sleep_unless_stopped(stop: &StopFlag, ms: u32) -> bool {
    let mut remaining = ms;
    while remaining > 0 {
        if stop.is_requested() {
            return false;
        }
        let slice = remaining.min(SLEEP_SLICE_MS);
        thread::sleep(Duration::from_millis(u64::from(slice)));
        remaining -= slice;
    }
    !stop.is_requested()
}

/// Move the calling worker to real-time scheduling if configured
pub fn apply_priority(task: &str, priority: Option<i32>) {
    let Some(priority) = priority else {
        return;
    };
    match set_realtime_priority(priority) {
        Ok(()) => info!("{}: SCHED_FIFO priority {}", task, priority),
        Err(e) => warn!("{}: could not set real-time priority {}: {}", task, priority, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_sleep_runs_to_completion() {
        let stop = StopFlag::new();
        let start = Instant::now();
        assert!(sleep_unless_stopped(&stop, 45));
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_sleep_returns_at_once_when_stopped() {
        let stop = StopFlag::new();
        stop.request();
        let start = Instant::now();
        assert!(!sleep_unless_stopped(&stop, 10_000));
        assert!(start.elapsed() < Duration::from_millis(1_000));
    }

    #[test]
    fn test_sleep_interrupted_midway() {
        let stop = std::sync::Arc::new(StopFlag::new());
        let raiser = {
            let stop = stop.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                stop.request();
            })
        };

        let start = Instant::now();
        assert!(!sleep_unless_stopped(&stop, 10_000));
        assert!(start.elapsed() < Duration::from_millis(5_000));
        raiser.join().unwrap();
    }

    #[test]
    fn test_zero_sleep() {
        assert!(sleep_unless_stopped(&StopFlag::new(), 0));
    }

    #[test]
    fn test_distance_cell_shared_between_workers() {
        let cell = std::sync::Arc::new(pulsematrix_core::sync::DistanceCell::default());
        let writer = {
            let cell = cell.clone();
            thread::spawn(move || {
                for i in 1..=100 {
                    cell.write(f64::from(i));
                }
            })
        };
        writer.join().unwrap();
        assert_eq!(cell.read(), 100.0);
    }
}
