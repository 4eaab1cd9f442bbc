//! Property tests for direction hysteresis and speed selection

use proptest::prelude::*;

use pulsematrix_core::config::DisplayConfig;
use pulsematrix_core::motion::{frame_delay_ms, Direction, MotionTracker};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Left), Just(Direction::Right)]
}

proptest! {
    #[test]
    fn in_band_changes_never_flip(
        start in 1.0f64..400.0,
        initial in direction(),
        steps in prop::collection::vec(-0.9f64..0.9, 1..50),
    ) {
        let mut tracker = MotionTracker::with_state(start, initial);
        let mut previous = start;

        for fraction in steps {
            // Choose current so that |current - previous| < current / 10
            let current = previous / (1.0 - fraction / 10.0);
            prop_assume!(current > 0.0);
            let direction = tracker.update(current);
            prop_assert_eq!(direction, initial);
            previous = current;
        }
    }

    #[test]
    fn leaving_band_sets_direction(previous in 1.0f64..400.0, initial in direction()) {
        let mut tracker = MotionTracker::with_state(previous, initial);
        // diff = previous, threshold = previous / 5
        prop_assert_eq!(tracker.update(previous * 2.0), Direction::Right);

        let mut tracker = MotionTracker::with_state(previous, initial);
        // diff = -previous / 2, threshold = previous / 20
        prop_assert_eq!(tracker.update(previous / 2.0), Direction::Left);
    }

    #[test]
    fn speed_follows_threshold(distance in 0.0f64..500.0) {
        let config = DisplayConfig::default();
        let delay = frame_delay_ms(distance, &config);
        if distance > 35.0 {
            prop_assert_eq!(delay, config.slow_frame_ms);
        } else {
            prop_assert_eq!(delay, config.fast_frame_ms);
        }
    }
}
