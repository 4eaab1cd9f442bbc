//! Direction tracking with hysteresis

use crate::config::DisplayConfig;

/// Direction the figure on the display runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Object approaching
    #[default]
    Left,
    /// Object moving away
    Right,
}

/// Animation speed class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    /// Far object, long frame delay
    Slow,
    /// Near object, short frame delay
    Fast,
}

impl Speed {
    /// Classify a distance against the slow threshold
    ///
    /// Strictly above the threshold is slow; at or below is fast.
    pub fn for_distance(distance_cm: f64, slow_threshold_cm: f64) -> Self {
        if distance_cm > slow_threshold_cm {
            Speed::Slow
        } else {
            Speed::Fast
        }
    }
}

/// Inter-frame delay for a distance
pub fn frame_delay_ms(distance_cm: f64, config: &DisplayConfig) -> u32 {
    match Speed::for_distance(distance_cm, config.slow_threshold_cm) {
        Speed::Slow => config.slow_frame_ms,
        Speed::Fast => config.fast_frame_ms,
    }
}

/// Derives motion direction from consecutive distance samples
///
/// The change since the previous sample is compared against a band of
/// ±10% of the current distance. Inside the band (edges included) the
/// previous direction is kept so sensor noise does not flip the figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTracker {
    previous_cm: f64,
    direction: Direction,
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionTracker {
    /// Fraction of the current distance that counts as noise
    pub const BAND_DIVISOR: f64 = 10.0;

    /// Tracker starting at distance 0, facing left
    pub const fn new() -> Self {
        Self::with_state(0.0, Direction::Left)
    }

    /// Tracker resuming from a known state
    pub const fn with_state(previous_cm: f64, direction: Direction) -> Self {
        Self {
            previous_cm,
            direction,
        }
    }

    /// Feed the next distance and return the direction to animate
    pub fn update(&mut self, current_cm: f64) -> Direction {
        let diff = current_cm - self.previous_cm;
        let threshold = current_cm / Self::BAND_DIVISOR;

        if diff > threshold {
            self.direction = Direction::Right;
        } else if diff < -threshold {
            self.direction = Direction::Left;
        }

        self.previous_cm = current_cm;
        self.direction
    }

    /// Direction chosen by the last update
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Distance seen by the last update
    pub fn previous_cm(&self) -> f64 {
        self.previous_cm
    }
}
