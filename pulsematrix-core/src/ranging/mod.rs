//! Pulse timing to distance conversion
//!
//! The ranger answers a trigger with an echo pulse whose width is the
//! round-trip time of the ultrasonic burst. Both edges are timestamped with
//! a monotonic tick counter; the difference converts to distance.
//!
//! ```text
//!  trigger  ─┐▔▔┌───────────────────────────────
//!  echo     ──────────┌▔▔▔▔▔▔▔▔▔▔▔▔▔┐────────────
//!                     rise           fall
//!  distance = (fall - rise) / ticks_per_us × 0.017 cm/µs
//! ```

use core::fmt;

use crate::traits::RangingError;

/// Centimeters per microsecond of echo width
///
/// Speed of sound (~340 m/s = 0.034 cm/µs) already halved for the round trip.
pub const CM_PER_ECHO_US: f64 = 0.017;

/// Echo edge being waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Rising,
    Falling,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Rising => f.write_str("rising"),
            EdgeKind::Falling => f.write_str("falling"),
        }
    }
}

/// Timestamps of one observed echo pulse
///
/// Only constructed once both edges have actually been seen in the same
/// cycle, so a missed falling edge can never pair with an old timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseSample {
    /// Tick count at the rising edge
    pub rise_ticks: u64,
    /// Tick count at the falling edge
    pub fall_ticks: u64,
}

impl PulseSample {
    /// Create a sample from two edge timestamps
    pub const fn new(rise_ticks: u64, fall_ticks: u64) -> Self {
        Self {
            rise_ticks,
            fall_ticks,
        }
    }

    /// Pulse width in microseconds
    ///
    /// Rejects pulses whose falling edge is not strictly after the rising
    /// edge, and a zero tick rate.
    pub fn width_us(&self, ticks_per_us: u64) -> Result<f64, RangingError> {
        if self.fall_ticks <= self.rise_ticks || ticks_per_us == 0 {
            return Err(RangingError::MalformedPulse);
        }
        let elapsed = self.fall_ticks - self.rise_ticks;
        Ok(elapsed as f64 / ticks_per_us as f64)
    }

    /// Distance to the reflecting object in centimeters
    pub fn distance_cm(&self, ticks_per_us: u64) -> Result<f64, RangingError> {
        self.width_us(ticks_per_us).map(|us| us * CM_PER_ECHO_US)
    }
}
