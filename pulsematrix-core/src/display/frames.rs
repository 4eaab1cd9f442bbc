//! Fixed frame tables
//!
//! Each direction has two frames; alternating them makes the figure run.
//! The left-facing frames are the right-facing ones mirrored top to bottom.

use super::{reg, DIGIT_COUNT};
use crate::motion::Direction;

/// One `[register, data]` write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub register: u8,
    pub data: u8,
}

impl RegisterWrite {
    pub const fn new(register: u8, data: u8) -> Self {
        Self { register, data }
    }

    /// Outbound bus frame
    pub const fn to_bytes(self) -> [u8; 2] {
        [self.register, self.data]
    }
}

/// One complete pattern: a write to every digit register, in order
pub type Frame = [RegisterWrite; DIGIT_COUNT];

const fn frame(rows: [u8; DIGIT_COUNT]) -> Frame {
    let mut writes = [RegisterWrite::new(0, 0); DIGIT_COUNT];
    let mut i = 0;
    while i < DIGIT_COUNT {
        writes[i] = RegisterWrite::new(reg::DIGIT_0 + i as u8, rows[i]);
        i += 1;
    }
    writes
}

/// Running right (object moving away)
pub const RIGHT_FRAMES: [Frame; 2] = [
    frame([0x08, 0x90, 0xF0, 0x10, 0x10, 0x37, 0xDF, 0x98]),
    frame([0x20, 0x10, 0x70, 0xD0, 0x10, 0x97, 0xFF, 0x18]),
];

/// Running left (object approaching)
pub const LEFT_FRAMES: [Frame; 2] = [
    frame([0x98, 0xDF, 0x37, 0x10, 0x10, 0xF0, 0x90, 0x08]),
    frame([0x18, 0xFF, 0x97, 0x10, 0xD0, 0x70, 0x10, 0x20]),
];

/// The two animation frames for a direction
pub const fn frames_for(direction: Direction) -> &'static [Frame; 2] {
    match direction {
        Direction::Left => &LEFT_FRAMES,
        Direction::Right => &RIGHT_FRAMES,
    }
}

/// All digit registers cleared
pub const fn blank_frame() -> Frame {
    frame([0; DIGIT_COUNT])
}

/// Power-up configuration, in order
///
/// Pulses display-test on and off to reset the latch state, disables
/// BCD decoding, sets brightness, scans all 8 rows and leaves shutdown.
pub const fn init_sequence(intensity: u8) -> [RegisterWrite; 6] {
    [
        RegisterWrite::new(reg::DISPLAY_TEST, 0x01),
        RegisterWrite::new(reg::DISPLAY_TEST, 0x00),
        RegisterWrite::new(reg::DECODE_MODE, 0x00),
        RegisterWrite::new(reg::INTENSITY, intensity),
        RegisterWrite::new(reg::SCAN_LIMIT, 0x07),
        RegisterWrite::new(reg::SHUTDOWN, 0x01),
    ]
}
