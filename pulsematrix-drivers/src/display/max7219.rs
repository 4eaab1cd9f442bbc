//! MAX7219 LED Matrix Driver
//!
//! Driver for an 8x8 LED matrix behind a MAX7219 over SPI. Every register
//! write is one 2-byte transaction framed by a manually driven chip-select
//! line: some controllers do not assert CS per transaction on their own.

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;

use pulsematrix_core::display::{blank_frame, init_sequence, reg, RegisterWrite};
use pulsematrix_core::traits::{DisplayError, MatrixDisplay};
use pulsematrix_hal::{OutputPin, SpiBus};

/// Issue one `[register, data]` frame as a single full-duplex transaction
///
/// Fails when the controller reports fewer bytes than the frame holds. The
/// received bytes are discarded. Callers own chip-select framing.
pub fn transfer<SPI>(spi: &mut SPI, write: RegisterWrite) -> Result<(), DisplayError>
where
    SPI: SpiBus,
    SPI::Error: Debug,
{
    let tx = write.to_bytes();
    let mut rx = [0u8; 2];

    match spi.transfer(&mut rx, &tx) {
        Ok(sent) if sent >= tx.len() => Ok(()),
        Ok(sent) => {
            log::warn!(
                "can't send spi message: reg 0x{:02x}, {} of {} bytes",
                write.register,
                sent,
                tx.len()
            );
            Err(DisplayError::ShortTransfer {
                sent,
                expected: tx.len(),
            })
        }
        Err(e) => {
            log::warn!("can't send spi message: reg 0x{:02x}: {:?}", write.register, e);
            Err(DisplayError::Bus)
        }
    }
}

/// Chip-select held low for the lifetime of the guard
///
/// Released (driven high) on drop, so every exit path of a register write
/// leaves the line idle.
struct ChipSelect<'a, P: OutputPin> {
    pin: &'a mut P,
}

impl<'a, P: OutputPin> ChipSelect<'a, P> {
    fn assert(pin: &'a mut P) -> Result<Self, DisplayError> {
        if pin.set_low().is_err() {
            log::warn!("chip-select assert failed");
            let _ = pin.set_high();
            return Err(DisplayError::ChipSelect);
        }
        Ok(Self { pin })
    }
}

impl<P: OutputPin> Drop for ChipSelect<'_, P> {
    fn drop(&mut self) {
        if self.pin.set_high().is_err() {
            log::warn!("chip-select release failed");
        }
    }
}

/// MAX7219 driver
pub struct Max7219<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
    /// Wait after each configuration write (ms)
    settle_ms: u32,
}

impl<SPI, CS, D> Max7219<SPI, CS, D>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CS: OutputPin,
    D: DelayNs,
{
    /// Create a new driver
    ///
    /// - `spi`: Bus the device sits on
    /// - `cs`: Manually driven chip-select (active low)
    /// - `delay`: Blocking delay for configuration settling
    /// - `settle_ms`: Wait after each configuration write
    pub fn new(spi: SPI, cs: CS, delay: D, settle_ms: u32) -> Self {
        Self {
            spi,
            cs,
            delay,
            settle_ms,
        }
    }

    /// Bring the device from power-on into a blank, running state
    ///
    /// Each configuration write is followed by the settle delay; the device
    /// is slow to latch. The blank pass settles once at the end. Returns the
    /// number of writes that failed.
    pub fn initialize(&mut self, intensity: u8) -> usize {
        let mut failed = 0;

        for write in init_sequence(intensity) {
            if self.write_register(write.register, write.data).is_err() {
                failed += 1;
            }
            self.delay.delay_ms(self.settle_ms);
        }

        failed += self.write_frame(&blank_frame());
        self.delay.delay_ms(self.settle_ms);

        if failed > 0 {
            log::warn!("display init: {} register writes failed", failed);
        } else {
            log::info!("display initialized");
        }
        failed
    }

    /// Blank the matrix and enter shutdown mode
    pub fn power_down(&mut self) -> usize {
        let mut failed = self.write_frame(&blank_frame());
        if self.write_register(reg::SHUTDOWN, 0x00).is_err() {
            failed += 1;
        }
        failed
    }

    /// Release the bus, chip-select and delay
    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }
}

impl<SPI, CS, D> MatrixDisplay for Max7219<SPI, CS, D>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CS: OutputPin,
{
    fn write_register(&mut self, register: u8, data: u8) -> Result<(), DisplayError> {
        let _cs = ChipSelect::assert(&mut self.cs)?;
        transfer(&mut self.spi, RegisterWrite::new(register, data))
    }
}
