//! Matrix display trait

use core::fmt;

use crate::display::{Frame, RegisterWrite};

/// Errors that can occur on a single register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Controller moved fewer bytes than the frame holds
    ShortTransfer {
        /// Bytes the controller reported
        sent: usize,
        /// Bytes in the outbound frame
        expected: usize,
    },
    /// Bus transaction failed outright
    Bus,
    /// Chip-select line could not be asserted
    ChipSelect,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::ShortTransfer { sent, expected } => {
                write!(f, "short transfer ({} of {} bytes)", sent, expected)
            }
            DisplayError::Bus => f.write_str("bus transaction failed"),
            DisplayError::ChipSelect => f.write_str("chip-select assert failed"),
        }
    }
}

/// Trait for register-addressed matrix displays
pub trait MatrixDisplay {
    /// Write one data byte to one register
    fn write_register(&mut self, register: u8, data: u8) -> Result<(), DisplayError>;

    /// Write every register of a frame in order
    ///
    /// A failed write is skipped; the remaining registers are still
    /// written. Returns the number of writes that failed.
    fn write_frame(&mut self, frame: &Frame) -> usize {
        write_all(self, frame)
    }
}

/// Write a sequence of registers, skipping failures
pub fn write_all<D: MatrixDisplay + ?Sized>(display: &mut D, writes: &[RegisterWrite]) -> usize {
    let mut failed = 0;
    for write in writes {
        if let Err(e) = display.write_register(write.register, write.data) {
            log::debug!("register 0x{:02x} skipped: {}", write.register, e);
            failed += 1;
        }
    }
    failed
}
