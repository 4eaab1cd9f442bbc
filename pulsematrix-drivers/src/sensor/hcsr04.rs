//! HC-SR04 style ultrasonic ranger
//!
//! A pulse of at least 10 µs on the trigger pin starts a burst; the echo
//! pin then goes high for as long as the sound took to come back. Both
//! echo edges are caught with edge-triggered readiness waits and
//! timestamped from a monotonic tick source.

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;

use pulsematrix_core::config::RangingConfig;
use pulsematrix_core::ranging::{EdgeKind, PulseSample};
use pulsematrix_core::traits::{RangeSensor, RangingError};
use pulsematrix_hal::{Edge, EdgeInput, EdgeWait, OutputPin, TickSource};

/// Ultrasonic ranger on a trigger output and an edge-capable echo input
pub struct HcSr04<TRIG, ECHO, CLK, D> {
    trigger: TRIG,
    echo: ECHO,
    clock: CLK,
    delay: D,
    config: RangingConfig,
}

impl<TRIG, ECHO, CLK, D> HcSr04<TRIG, ECHO, CLK, D>
where
    TRIG: OutputPin,
    TRIG::Error: Debug,
    ECHO: EdgeInput,
    ECHO::Error: Debug,
    CLK: TickSource,
    D: DelayNs,
{
    /// Create a new ranger
    ///
    /// The trigger is driven low so the first measurement starts from idle.
    pub fn new(trigger: TRIG, echo: ECHO, clock: CLK, delay: D, config: RangingConfig) -> Self {
        let mut sensor = Self {
            trigger,
            echo,
            clock,
            delay,
            config,
        };
        if let Err(e) = sensor.trigger.set_low() {
            log::warn!("trigger idle-low failed: {:?}", e);
        }
        sensor
    }

    /// Disable echo notifications and leave the trigger low
    pub fn shutdown(&mut self) {
        if let Err(e) = self.echo.set_edge(Edge::None) {
            log::warn!("echo edge disable failed: {:?}", e);
        }
        if let Err(e) = self.trigger.set_low() {
            log::warn!("trigger release failed: {:?}", e);
        }
    }

    /// Release the pins, clock and delay
    pub fn release(self) -> (TRIG, ECHO, CLK, D) {
        (self.trigger, self.echo, self.clock, self.delay)
    }

    /// Drop stale notifications, then arm for `edge`
    fn arm(&mut self, edge: Edge) -> Result<(), RangingError> {
        self.echo.rearm().map_err(|e| {
            log::debug!("echo rearm failed: {:?}", e);
            RangingError::Pin
        })?;
        self.echo.set_edge(edge).map_err(|e| {
            log::debug!("echo edge '{}' failed: {:?}", edge.as_str(), e);
            RangingError::Pin
        })
    }

    /// Pulse the trigger high for the configured width
    fn fire(&mut self) -> Result<(), RangingError> {
        self.trigger.set_high().map_err(|e| {
            log::debug!("trigger high failed: {:?}", e);
            RangingError::Pin
        })?;
        self.delay.delay_us(self.config.trigger_pulse_us());
        self.trigger.set_low().map_err(|e| {
            log::debug!("trigger low failed: {:?}", e);
            RangingError::Pin
        })
    }

    /// Wait for the armed edge and timestamp it
    ///
    /// The pin value is read afterwards to consume the notification.
    fn capture(&mut self, kind: EdgeKind) -> Result<u64, RangingError> {
        match self.echo.wait_for_edge(self.config.edge_timeout_ms) {
            Ok(EdgeWait::Ready) => {
                let ticks = self.clock.now_ticks();
                self.echo.is_high().map_err(|e| {
                    log::debug!("echo read after {} edge failed: {:?}", kind, e);
                    RangingError::Pin
                })?;
                Ok(ticks)
            }
            Ok(EdgeWait::TimedOut) => Err(RangingError::Timeout(kind)),
            Err(e) => {
                log::debug!("echo poll for {} edge failed: {:?}", kind, e);
                Err(RangingError::Pin)
            }
        }
    }
}

impl<TRIG, ECHO, CLK, D> RangeSensor for HcSr04<TRIG, ECHO, CLK, D>
where
    TRIG: OutputPin,
    TRIG::Error: Debug,
    ECHO: EdgeInput,
    ECHO::Error: Debug,
    CLK: TickSource,
    D: DelayNs,
{
    fn measure(&mut self) -> Result<f64, RangingError> {
        self.arm(Edge::Rising)?;
        self.fire()?;
        let rise_ticks = self.capture(EdgeKind::Rising)?;

        self.arm(Edge::Falling)?;
        let fall_ticks = self.capture(EdgeKind::Falling)?;

        PulseSample::new(rise_ticks, fall_ticks).distance_cm(self.clock.ticks_per_us())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use pulsematrix_hal::InputPin;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        TrigHigh,
        TrigLow,
        Rearm,
        SetEdge(Edge),
        Wait,
        Read,
        DelayUs(u32),
    }

    type Log = RefCell<heapless::Vec<Event, 64>>;

    fn record(log: &Log, event: Event) {
        let _ = log.borrow_mut().push(event);
    }

    struct MockTrigger<'a> {
        log: &'a Log,
    }

    impl OutputPin for MockTrigger<'_> {
        type Error = ();

        fn set_high(&mut self) -> Result<(), ()> {
            record(self.log, Event::TrigHigh);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), ()> {
            record(self.log, Event::TrigLow);
            Ok(())
        }
    }

    /// Echo pin answering waits from a script
    struct MockEcho<'a> {
        log: &'a Log,
        waits: &'a [Result<EdgeWait, ()>],
        next: usize,
    }

    impl InputPin for MockEcho<'_> {
        type Error = ();

        fn is_high(&mut self) -> Result<bool, ()> {
            record(self.log, Event::Read);
            Ok(true)
        }
    }

    impl EdgeInput for MockEcho<'_> {
        fn set_edge(&mut self, edge: Edge) -> Result<(), ()> {
            record(self.log, Event::SetEdge(edge));
            Ok(())
        }

        fn rearm(&mut self) -> Result<(), ()> {
            record(self.log, Event::Rearm);
            Ok(())
        }

        fn wait_for_edge(&mut self, timeout_ms: u32) -> Result<EdgeWait, ()> {
            assert_eq!(timeout_ms, 3000);
            record(self.log, Event::Wait);
            let result = self.waits.get(self.next).copied().unwrap_or(Ok(EdgeWait::TimedOut));
            self.next += 1;
            result
        }
    }

    /// Clock returning scripted tick values
    struct MockClock<'a> {
        ticks: &'a [u64],
        next: usize,
        rate: u64,
    }

    impl TickSource for MockClock<'_> {
        fn now_ticks(&mut self) -> u64 {
            let t = self.ticks[self.next];
            self.next += 1;
            t
        }

        fn ticks_per_us(&self) -> u64 {
            self.rate
        }
    }

    struct MockDelay<'a> {
        log: &'a Log,
    }

    impl DelayNs for MockDelay<'_> {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_us(&mut self, us: u32) {
            record(self.log, Event::DelayUs(us));
        }
    }

    fn sensor<'a>(
        log: &'a Log,
        waits: &'a [Result<EdgeWait, ()>],
        ticks: &'a [u64],
    ) -> HcSr04<MockTrigger<'a>, MockEcho<'a>, MockClock<'a>, MockDelay<'a>> {
        let sensor = HcSr04::new(
            MockTrigger { log },
            MockEcho {
                log,
                waits,
                next: 0,
            },
            MockClock {
                ticks,
                next: 0,
                rate: 400,
            },
            MockDelay { log },
            RangingConfig::default(),
        );
        log.borrow_mut().clear();
        sensor
    }

    #[test]
    fn test_measure_one_microsecond_echo() {
        let log = Log::default();
        let waits = [Ok(EdgeWait::Ready), Ok(EdgeWait::Ready)];
        let mut sensor = sensor(&log, &waits, &[0, 400]);

        let distance = sensor.measure().unwrap();
        assert!((distance - 0.017).abs() < 1e-12);
    }

    #[test]
    fn test_measure_sequence() {
        let log = Log::default();
        let waits = [Ok(EdgeWait::Ready), Ok(EdgeWait::Ready)];
        let mut sensor = sensor(&log, &waits, &[1_000, 401_000]);

        sensor.measure().unwrap();

        assert_eq!(
            log.borrow().as_slice(),
            &[
                Event::Rearm,
                Event::SetEdge(Edge::Rising),
                Event::TrigHigh,
                Event::DelayUs(20),
                Event::TrigLow,
                Event::Wait,
                Event::Read,
                Event::Rearm,
                Event::SetEdge(Edge::Falling),
                Event::Wait,
                Event::Read,
            ]
        );
    }

    #[test]
    fn test_rising_timeout() {
        let log = Log::default();
        let waits = [Ok(EdgeWait::TimedOut)];
        let mut sensor = sensor(&log, &waits, &[]);

        assert_eq!(
            sensor.measure(),
            Err(RangingError::Timeout(EdgeKind::Rising))
        );
    }

    #[test]
    fn test_falling_timeout_discards_cycle() {
        let log = Log::default();
        // First cycle completes, second loses its falling edge
        let waits = [
            Ok(EdgeWait::Ready),
            Ok(EdgeWait::Ready),
            Ok(EdgeWait::Ready),
            Ok(EdgeWait::TimedOut),
        ];
        let mut sensor = sensor(&log, &waits, &[0, 4_000, 10_000]);

        assert!(sensor.measure().is_ok());
        assert_eq!(
            sensor.measure(),
            Err(RangingError::Timeout(EdgeKind::Falling))
        );
    }

    #[test]
    fn test_poll_error_is_pin_error() {
        let log = Log::default();
        let waits = [Err(())];
        let mut sensor = sensor(&log, &waits, &[]);

        assert_eq!(sensor.measure(), Err(RangingError::Pin));
    }

    #[test]
    fn test_backwards_clock_rejected() {
        let log = Log::default();
        let waits = [Ok(EdgeWait::Ready), Ok(EdgeWait::Ready)];
        let mut sensor = sensor(&log, &waits, &[5_000, 4_000]);

        assert_eq!(sensor.measure(), Err(RangingError::MalformedPulse));
    }

    #[test]
    fn test_short_trigger_pulse_raised_to_minimum() {
        let log = Log::default();
        let waits = [Ok(EdgeWait::TimedOut)];
        let mut sensor = HcSr04::new(
            MockTrigger { log: &log },
            MockEcho {
                log: &log,
                waits: &waits,
                next: 0,
            },
            MockClock {
                ticks: &[],
                next: 0,
                rate: 400,
            },
            MockDelay { log: &log },
            RangingConfig {
                trigger_pulse_us: 3,
                ..Default::default()
            },
        );

        let _ = sensor.measure();
        assert!(log.borrow().contains(&Event::DelayUs(10)));
    }

    #[test]
    fn test_shutdown_disables_edge() {
        let log = Log::default();
        let mut sensor = sensor(&log, &[], &[]);

        sensor.shutdown();

        assert_eq!(
            log.borrow().as_slice(),
            &[Event::SetEdge(Edge::None), Event::TrigLow]
        );
    }
}
