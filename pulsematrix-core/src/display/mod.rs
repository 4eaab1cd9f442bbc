//! Display register map and frame tables
//!
//! The matrix controller is addressed with 2-byte `[register, data]`
//! words. Digit registers 1..=8 each hold one row of the 8x8 matrix.

pub mod frames;

pub use frames::{
    blank_frame, frames_for, init_sequence, Frame, RegisterWrite, LEFT_FRAMES, RIGHT_FRAMES,
};

/// Number of digit (row) registers
pub const DIGIT_COUNT: usize = 8;

/// MAX7219 register addresses
pub mod reg {
    pub const DIGIT_0: u8 = 0x01;
    pub const DIGIT_7: u8 = 0x08;
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;
}
