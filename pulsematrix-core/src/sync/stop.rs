//! Cooperative stop request

use core::sync::atomic::{AtomicBool, Ordering};

/// One-way flag asking both loops to wind down
///
/// Loops check it at their head and around every suspension point. Once
/// raised it stays raised.
#[derive(Debug, Default)]
pub struct StopFlag {
    requested: AtomicBool,
}

impl StopFlag {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Ask all loops to stop
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_latches() {
        let stop = StopFlag::new();
        assert!(!stop.is_requested());

        stop.request();
        assert!(stop.is_requested());

        stop.request();
        assert!(stop.is_requested());
    }
}
