//! Shared distance cell

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Latest measured distance, guarded by a mutex
///
/// Written only by the ranging loop, read by the display loop. The critical
/// section is a single copy of the value; no I/O happens under the lock.
pub struct DistanceCell {
    value: Mutex<CriticalSectionRawMutex, Cell<f64>>,
}

impl DistanceCell {
    /// Create a cell holding `initial_cm`
    pub const fn new(initial_cm: f64) -> Self {
        Self {
            value: Mutex::new(Cell::new(initial_cm)),
        }
    }

    /// Publish a new distance
    pub fn write(&self, cm: f64) {
        self.value.lock(|value| value.set(cm));
    }

    /// Most recently published distance
    pub fn read(&self) -> f64 {
        self.value.lock(|value| value.get())
    }
}

impl Default for DistanceCell {
    fn default() -> Self {
        Self::new(0.0)
    }
}
