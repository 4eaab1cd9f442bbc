//! Display animation loop
//!
//! Reads whatever distance was last published, picks a direction and a
//! pace, and plays the two frames of the running figure.

use std::sync::Arc;

use log::{debug, error, info, warn};

use pulsematrix_core::config::DisplayConfig;
use pulsematrix_core::display::frames_for;
use pulsematrix_core::motion::{frame_delay_ms, MotionTracker};
use pulsematrix_core::sync::{DistanceCell, StopFlag};
use pulsematrix_core::traits::MatrixDisplay;
use pulsematrix_drivers::display::Max7219;
use pulsematrix_hal_linux::{SpiConfig, Spidev, SysfsGpio, ThreadDelay};

use super::{apply_priority, sleep_unless_stopped};
use crate::board::CS_GPIO;

/// Play one direction's two frames
///
/// Returns `false` once a stop is requested; the cycle is cut short at the
/// next frame boundary.
pub fn animation_cycle<M: MatrixDisplay>(
    display: &mut M,
    tracker: &mut MotionTracker,
    cell: &DistanceCell,
    stop: &StopFlag,
    config: &DisplayConfig,
) -> bool {
    let distance = cell.read();
    let before = tracker.direction();
    let direction = tracker.update(distance);
    if direction != before {
        debug!("direction {:?} -> {:?} at {:.2} cm", before, direction, distance);
    }
    let delay_ms = frame_delay_ms(distance, config);

    for frame in frames_for(direction) {
        let failed = display.write_frame(frame);
        if failed > 0 {
            warn!("frame written with {} failed registers", failed);
        }
        if !sleep_unless_stopped(stop, delay_ms) {
            return false;
        }
    }
    true
}

/// Animate until stopped
pub fn run_display<M: MatrixDisplay>(
    display: &mut M,
    cell: &DistanceCell,
    stop: &StopFlag,
    config: &DisplayConfig,
) {
    let mut tracker = MotionTracker::new();
    while !stop.is_requested() {
        if !animation_cycle(display, &mut tracker, cell, stop, config) {
            break;
        }
    }
}

/// Display thread entry
///
/// If the bus cannot be opened the thread logs and exits; ranging carries
/// on without a display.
pub fn display_task(
    gpio: SysfsGpio,
    config: DisplayConfig,
    cell: Arc<DistanceCell>,
    stop: Arc<StopFlag>,
    priority: Option<i32>,
) {
    info!("Display task started");
    apply_priority("display", priority);

    let spi_config = SpiConfig {
        frequency: config.spi_speed_hz,
        ..Default::default()
    };
    let spi = match Spidev::open(config.spi_device.as_str(), spi_config) {
        Ok(spi) => spi,
        Err(e) => {
            error!("can't open device {}: {}", config.spi_device, e);
            return;
        }
    };
    let cs = match gpio.output(CS_GPIO) {
        Ok(pin) => pin,
        Err(e) => {
            error!("display: {}", e);
            return;
        }
    };

    let mut display = Max7219::new(spi, cs, ThreadDelay::new(), config.settle_ms);
    display.initialize(config.intensity());

    run_display(&mut display, &cell, &stop, &config);

    let failed = display.power_down();
    if failed > 0 {
        warn!("display power-down: {} register writes failed", failed);
    }
    info!("Display task stopped");
}
