//! Monotonic tick source

/// Monotonic high-resolution counter
///
/// Used to timestamp edges. Only differences between two readings are
/// meaningful; [`ticks_per_us`](TickSource::ticks_per_us) converts them to
/// wall-clock time.
pub trait TickSource {
    /// Current counter value
    fn now_ticks(&mut self) -> u64;

    /// Counter increments per microsecond
    fn ticks_per_us(&self) -> u64;
}
