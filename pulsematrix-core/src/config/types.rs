//! Configuration type definitions
//!
//! Every field defaults to the value the hardware was tuned with, so an
//! empty configuration file reproduces the stock behavior.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of the SPI device path
pub const MAX_DEVICE_PATH_LEN: usize = 64;

/// Shortest trigger pulse the ranger accepts (µs)
pub const MIN_TRIGGER_PULSE_US: u32 = 10;

/// Highest MAX7219 intensity step
pub const MAX_INTENSITY: u8 = 0x0F;

/// Ranging loop timing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RangingConfig {
    /// Bound on each edge wait (ms)
    pub edge_timeout_ms: u32,
    /// Pause between ranging cycles (ms)
    pub inter_sample_ms: u32,
    /// Trigger pulse width (µs)
    pub trigger_pulse_us: u32,
}

impl Default for RangingConfig {
    fn default() -> Self {
        Self {
            edge_timeout_ms: 3000,
            inter_sample_ms: 600,
            trigger_pulse_us: 20,
        }
    }
}

impl RangingConfig {
    /// Trigger pulse width raised to the sensor's minimum
    pub fn trigger_pulse_us(&self) -> u32 {
        self.trigger_pulse_us.max(MIN_TRIGGER_PULSE_US)
    }
}

/// Display bus and animation timing
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// spidev node the matrix is attached to
    pub spi_device: String<MAX_DEVICE_PATH_LEN>,
    /// Bus clock (Hz)
    pub spi_speed_hz: u32,
    /// Delay after each configuration write during init (ms)
    pub settle_ms: u32,
    /// Frame delay for far objects (ms)
    pub slow_frame_ms: u32,
    /// Frame delay for near objects (ms)
    pub fast_frame_ms: u32,
    /// Distances above this animate slowly (cm)
    pub slow_threshold_cm: f64,
    /// Brightness step, 0..=15
    pub intensity: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut spi_device = String::new();
        let _ = spi_device.push_str("/dev/spidev1.0");
        Self {
            spi_device,
            spi_speed_hz: 10_000_000,
            settle_ms: 100,
            slow_frame_ms: 600,
            fast_frame_ms: 60,
            slow_threshold_cm: 35.0,
            intensity: 0,
        }
    }
}

impl DisplayConfig {
    /// Intensity clamped to what the device accepts
    pub fn intensity(&self) -> u8 {
        self.intensity.min(MAX_INTENSITY)
    }
}

/// Thread scheduling hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulingConfig {
    /// Fixed real-time priority for both worker threads, `None` to skip
    pub realtime_priority: Option<i32>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            realtime_priority: Some(50),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub ranging: RangingConfig,
    pub display: DisplayConfig,
    pub scheduling: SchedulingConfig,
}
