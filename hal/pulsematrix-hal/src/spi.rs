//! SPI bus abstractions
//!
//! Provides the full-duplex transfer primitive used to talk to the display.

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Transfer data (simultaneous read/write)
    ///
    /// Writes data from `write` while reading into `read`. Both buffers must
    /// be the same length. Returns the number of bytes the controller reports
    /// as transferred, which can be less than requested.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<usize, Self::Error>;
}

/// SPI configuration
///
/// Applied to every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock mode
    pub mode: Mode,
    /// Word size in bits
    pub bits_per_word: u8,
    /// Delay after the transaction before chip-select changes (µs)
    pub delay_us: u16,
    /// Release chip-select after each transaction
    pub cs_change: bool,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 10_000_000, // 10 MHz
            mode: Mode::Mode0,
            bits_per_word: 8,
            delay_us: 1,
            cs_change: true,
        }
    }
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl Mode {
    /// CPOL/CPHA bits as `(CPOL << 1) | CPHA`
    pub const fn bits(self) -> u8 {
        match self {
            Mode::Mode0 => 0b00,
            Mode::Mode1 => 0b01,
            Mode::Mode2 => 0b10,
            Mode::Mode3 => 0b11,
        }
    }
}
