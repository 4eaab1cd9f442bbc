//! Motion tracking
//!
//! Turns the stream of distance samples into a direction and an
//! animation speed for the display.

pub mod tracker;

pub use tracker::{frame_delay_ms, Direction, MotionTracker, Speed};
