//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins. Unlike on-chip
//! registers, pins reached through an operating system can fail on every
//! access, so all operations return a `Result`.

/// Digital output pin
pub trait OutputPin {
    /// Error type for pin operations
    type Error;

    /// Set the pin high (logic 1)
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Set the pin low (logic 0)
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}

/// Digital input pin
///
/// Reads take `&mut self` because reading a file-backed pin moves its
/// cursor and consumes any pending edge notification.
pub trait InputPin {
    /// Error type for pin operations
    type Error;

    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Signal transition that raises a readiness notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Notifications disabled
    None,
    /// Low-to-high transition
    Rising,
    /// High-to-low transition
    Falling,
    /// Either transition
    Both,
}

impl Edge {
    /// Keyword used by the kernel's GPIO `edge` attribute
    pub const fn as_str(self) -> &'static str {
        match self {
            Edge::None => "none",
            Edge::Rising => "rising",
            Edge::Falling => "falling",
            Edge::Both => "both",
        }
    }
}

/// Outcome of a bounded wait for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeWait {
    /// The armed edge fired
    Ready,
    /// The wait bound elapsed without a notification
    TimedOut,
}

/// Input pin with edge-triggered readiness notification
///
/// Expected usage per measurement:
///
/// 1. [`rearm`](EdgeInput::rearm) to drop anything stale
/// 2. [`set_edge`](EdgeInput::set_edge) to pick the transition
/// 3. [`wait_for_edge`](EdgeInput::wait_for_edge)
/// 4. [`InputPin::is_high`] to consume the notification
pub trait EdgeInput: InputPin {
    /// Select which transition raises a notification
    fn set_edge(&mut self, edge: Edge) -> Result<(), Self::Error>;

    /// Rewind the readable handle and discard any pending notification
    fn rearm(&mut self) -> Result<(), Self::Error>;

    /// Block until the armed edge fires or `timeout_ms` elapses
    fn wait_for_edge(&mut self, timeout_ms: u32) -> Result<EdgeWait, Self::Error>;
}
