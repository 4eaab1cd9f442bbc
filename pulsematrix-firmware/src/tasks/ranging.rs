//! Ranging loop
//!
//! Measures once per cycle and publishes good samples to the distance
//! cell. Dropped samples leave the previous distance in place.

use std::sync::Arc;

use log::{debug, info, warn};

use pulsematrix_core::config::RangingConfig;
use pulsematrix_core::sync::{DistanceCell, StopFlag};
use pulsematrix_core::traits::RangeSensor;
use pulsematrix_drivers::sensor::HcSr04;
use pulsematrix_hal_linux::{
    GpioError, MonotonicClock, SysfsEdgeInput, SysfsGpio, SysfsOutput, ThreadDelay,
};

use super::{apply_priority, sleep_unless_stopped};
use crate::board::{ECHO_GPIO, TRIGGER_GPIO};

/// One measurement; publishes and returns the distance on success
pub fn ranging_step<S: RangeSensor>(sensor: &mut S, cell: &DistanceCell) -> Option<f64> {
    match sensor.measure() {
        Ok(distance) => {
            cell.write(distance);
            info!("Distance is {:.2} cm", distance);
            Some(distance)
        }
        Err(e) => {
            warn!("sample dropped: {}", e);
            None
        }
    }
}

/// Measure every `inter_sample_ms` until stopped
///
/// The pause follows every cycle, failed or not, so errors never spin.
pub fn run_ranging<S: RangeSensor>(
    sensor: &mut S,
    cell: &DistanceCell,
    stop: &StopFlag,
    config: &RangingConfig,
) {
    while !stop.is_requested() {
        ranging_step(sensor, cell);
        if !sleep_unless_stopped(stop, config.inter_sample_ms) {
            break;
        }
    }
}

/// Open the trigger and echo pins
fn open_pins(gpio: &SysfsGpio) -> Result<(SysfsOutput, SysfsEdgeInput), GpioError> {
    let trigger = gpio.output(TRIGGER_GPIO)?;
    let echo = gpio.edge_input(ECHO_GPIO)?;
    Ok((trigger, echo))
}

/// Open the ranger pins, retrying every `inter_sample_ms`
///
/// Pin attributes can lag behind export (udev permission rules), so a
/// failed open is logged and retried. Returns `None` once stopped.
pub fn open_pins_retrying(
    gpio: &SysfsGpio,
    stop: &StopFlag,
    config: &RangingConfig,
) -> Option<(SysfsOutput, SysfsEdgeInput)> {
    let mut attempts: u32 = 0;
    loop {
        if stop.is_requested() {
            return None;
        }
        match open_pins(gpio) {
            Ok(pins) => {
                if attempts > 0 {
                    info!("ranging: pins opened after {} retries", attempts);
                }
                return Some(pins);
            }
            Err(e) => {
                if attempts == 0 {
                    warn!("ranging: {}, retrying", e);
                } else {
                    debug!("ranging: {}", e);
                }
                attempts = attempts.saturating_add(1);
            }
        }
        if !sleep_unless_stopped(stop, config.inter_sample_ms) {
            return None;
        }
    }
}

/// Ranging thread entry
pub fn ranging_task(
    gpio: SysfsGpio,
    config: RangingConfig,
    cell: Arc<DistanceCell>,
    stop: Arc<StopFlag>,
    priority: Option<i32>,
) {
    info!("Ranging task started");
    apply_priority("ranging", priority);

    let Some((trigger, echo)) = open_pins_retrying(&gpio, &stop, &config) else {
        info!("Ranging task stopped");
        return;
    };

    let mut sensor = HcSr04::new(trigger, echo, MonotonicClock::new(), ThreadDelay::new(), config);
    run_ranging(&mut sensor, &cell, &stop, &config);
    sensor.shutdown();

    info!("Ranging task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsematrix_core::ranging::EdgeKind;
    use pulsematrix_core::traits::RangingError;
    use std::collections::VecDeque;

    /// Sensor replaying scripted results, raising stop when they run out
    struct ScriptedSensor<'a> {
        results: VecDeque<Result<f64, RangingError>>,
        stop: &'a StopFlag,
        calls: usize,
    }

    impl<'a> ScriptedSensor<'a> {
        fn new(stop: &'a StopFlag, results: impl IntoIterator<Item = Result<f64, RangingError>>) -> Self {
            Self {
                results: results.into_iter().collect(),
                stop,
                calls: 0,
            }
        }
    }

    impl RangeSensor for ScriptedSensor<'_> {
        fn measure(&mut self) -> Result<f64, RangingError> {
            self.calls += 1;
            let result = self
                .results
                .pop_front()
                .unwrap_or(Err(RangingError::Timeout(EdgeKind::Rising)));
            if self.results.is_empty() {
                self.stop.request();
            }
            result
        }
    }

    fn fast_config() -> RangingConfig {
        RangingConfig {
            inter_sample_ms: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_step_publishes_distance() {
        let stop = StopFlag::new();
        let cell = DistanceCell::default();
        let mut sensor = ScriptedSensor::new(&stop, [Ok(42.5), Ok(0.0)]);

        assert_eq!(ranging_step(&mut sensor, &cell), Some(42.5));
        assert_eq!(cell.read(), 42.5);
    }

    #[test]
    fn test_timeout_keeps_previous_distance() {
        let stop = StopFlag::new();
        let cell = DistanceCell::new(17.0);
        let mut sensor = ScriptedSensor::new(&stop, [Err(RangingError::Timeout(EdgeKind::Rising))]);

        assert_eq!(ranging_step(&mut sensor, &cell), None);
        assert_eq!(cell.read(), 17.0);
    }

    #[test]
    fn test_malformed_pulse_never_published() {
        let stop = StopFlag::new();
        let cell = DistanceCell::new(8.0);
        let mut sensor = ScriptedSensor::new(&stop, [Err(RangingError::MalformedPulse)]);

        assert_eq!(ranging_step(&mut sensor, &cell), None);
        assert_eq!(cell.read(), 8.0);
    }

    #[test]
    fn test_loop_survives_errors_until_stopped() {
        let stop = StopFlag::new();
        let cell = DistanceCell::default();
        let mut sensor = ScriptedSensor::new(
            &stop,
            [
                Ok(30.0),
                Err(RangingError::Timeout(EdgeKind::Falling)),
                Err(RangingError::Pin),
                Ok(31.5),
                Err(RangingError::Timeout(EdgeKind::Rising)),
            ],
        );

        run_ranging(&mut sensor, &cell, &stop, &fast_config());

        assert_eq!(sensor.calls, 5);
        assert_eq!(cell.read(), 31.5);
    }

    #[test]
    fn test_loop_does_not_start_when_stopped() {
        let stop = StopFlag::new();
        stop.request();
        let cell = DistanceCell::default();
        let mut sensor = ScriptedSensor::new(&stop, [Ok(1.0)]);

        run_ranging(&mut sensor, &cell, &stop, &fast_config());

        assert_eq!(sensor.calls, 0);
        assert_eq!(cell.read(), 0.0);
    }

    fn pin_dir(root: &std::path::Path, gpio: u32) -> std::path::PathBuf {
        let dir = root.join(format!("gpio{}", gpio));
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("value"), "0").unwrap();
        std::fs::write(dir.join("edge"), "none").unwrap();
        dir
    }

    #[test]
    fn test_pins_opened_once_echo_appears() {
        let root = tempfile::tempdir().unwrap();
        pin_dir(root.path(), TRIGGER_GPIO);
        let gpio = SysfsGpio::with_root(root.path());
        let stop = StopFlag::new();
        let config = RangingConfig {
            inter_sample_ms: 10,
            ..Default::default()
        };

        // Echo attributes show up after the first attempt has failed
        let late = {
            let root = root.path().to_path_buf();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(40));
                pin_dir(&root, ECHO_GPIO);
            })
        };

        let (trigger, echo) = open_pins_retrying(&gpio, &stop, &config).unwrap();
        late.join().unwrap();

        assert_eq!(trigger.gpio(), TRIGGER_GPIO);
        assert_eq!(echo.gpio(), ECHO_GPIO);
        assert!(!stop.is_requested());
    }

    #[test]
    fn test_pin_retry_ends_on_stop() {
        let root = tempfile::tempdir().unwrap();
        let gpio = SysfsGpio::with_root(root.path());
        let stop = std::sync::Arc::new(StopFlag::new());
        let config = RangingConfig {
            inter_sample_ms: 10,
            ..Default::default()
        };

        let raiser = {
            let stop = stop.clone();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(40));
                stop.request();
            })
        };

        assert!(open_pins_retrying(&gpio, &stop, &config).is_none());
        raiser.join().unwrap();
    }

    #[test]
    fn test_silent_echo_keeps_previous_distance() {
        let root = tempfile::tempdir().unwrap();
        pin_dir(root.path(), TRIGGER_GPIO);
        pin_dir(root.path(), ECHO_GPIO);
        let gpio = SysfsGpio::with_root(root.path());
        let config = RangingConfig {
            edge_timeout_ms: 50,
            ..Default::default()
        };
        let (trigger, echo) = open_pins(&gpio).unwrap();
        let mut sensor = HcSr04::new(trigger, echo, MonotonicClock::new(), ThreadDelay::new(), config);
        let cell = DistanceCell::new(23.0);

        assert_eq!(ranging_step(&mut sensor, &cell), None);
        assert_eq!(cell.read(), 23.0);
        assert_eq!(
            sensor.measure(),
            Err(RangingError::Timeout(EdgeKind::Rising))
        );
    }
}
