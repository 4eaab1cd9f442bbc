//! Range sensor trait

use core::fmt;

use crate::ranging::EdgeKind;

/// Reasons a ranging cycle produced no distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangingError {
    /// No notification for this edge within the wait bound
    Timeout(EdgeKind),
    /// Pin read, write or poll failed
    Pin,
    /// Falling edge timestamp not after the rising edge
    MalformedPulse,
}

impl fmt::Display for RangingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangingError::Timeout(edge) => write!(f, "no {} edge before timeout", edge),
            RangingError::Pin => f.write_str("echo/trigger pin access failed"),
            RangingError::MalformedPulse => f.write_str("falling edge not after rising edge"),
        }
    }
}

/// Trait for distance sensors
///
/// One call performs one complete measurement. Implementations must never
/// return a distance derived from a partially observed pulse.
pub trait RangeSensor {
    /// Measure the distance to the nearest object in centimeters
    fn measure(&mut self) -> Result<f64, RangingError>;
}
