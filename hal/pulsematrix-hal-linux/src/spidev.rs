//! spidev SPI bus
//!
//! Full-duplex transfers through `SPI_IOC_MESSAGE(1)` on a
//! `/dev/spidevB.C` node. Mode, word size and clock ceiling are written to
//! the device once at open.

use std::fs::{File, OpenOptions};
use std::io;
use std::mem::size_of;
use std::os::fd::AsRawFd;
use std::path::Path;

use pulsematrix_hal::{SpiBus, SpiConfig};

const SPI_IOC_MAGIC: u32 = b'k' as u32;

/// `_IOW(SPI_IOC_MAGIC, nr, size)`
const fn iow(nr: u32, size: usize) -> u32 {
    (1 << 30) | ((size as u32) << 16) | (SPI_IOC_MAGIC << 8) | nr
}

const SPI_IOC_MESSAGE_1: u32 = iow(0, size_of::<SpiIocTransfer>());
const SPI_IOC_WR_MODE: u32 = iow(1, size_of::<u8>());
const SPI_IOC_WR_BITS_PER_WORD: u32 = iow(3, size_of::<u8>());
const SPI_IOC_WR_MAX_SPEED_HZ: u32 = iow(4, size_of::<u32>());

/// Kernel `struct spi_ioc_transfer`
#[repr(C)]
#[derive(Debug, Default)]
struct SpiIocTransfer {
    tx_buf: u64,
    rx_buf: u64,
    len: u32,
    speed_hz: u32,
    delay_usecs: u16,
    bits_per_word: u8,
    cs_change: u8,
    tx_nbits: u8,
    rx_nbits: u8,
    word_delay_usecs: u8,
    pad: u8,
}

/// An open spidev node
#[derive(Debug)]
pub struct Spidev {
    file: File,
    config: SpiConfig,
}

impl Spidev {
    /// Open and configure a spidev node
    pub fn open(path: impl AsRef<Path>, config: SpiConfig) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let dev = Self { file, config };
        dev.configure()?;
        log::debug!(
            "{}: mode {}, {} bits, {} Hz",
            path.display(),
            dev.config.mode.bits(),
            dev.config.bits_per_word,
            dev.config.frequency
        );
        Ok(dev)
    }

    fn configure(&self) -> io::Result<()> {
        let mode = self.config.mode.bits();
        let bits = self.config.bits_per_word;
        let speed = self.config.frequency;
        self.ioctl_write(SPI_IOC_WR_MODE, &mode)?;
        self.ioctl_write(SPI_IOC_WR_BITS_PER_WORD, &bits)?;
        self.ioctl_write(SPI_IOC_WR_MAX_SPEED_HZ, &speed)
    }

    fn ioctl_write<T>(&self, request: u32, value: &T) -> io::Result<()> {
        // SAFETY: `request` encodes a write of `size_of::<T>()` bytes and
        // `value` points at a live `T` for the duration of the call.
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                request as _,
                value as *const T,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl SpiBus for Spidev {
    type Error = io::Error;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> io::Result<usize> {
        if read.len() != write.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "read and write buffers differ in length",
            ));
        }
        let len = u32::try_from(write.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "transfer too long"))?;

        let xfer = SpiIocTransfer {
            tx_buf: write.as_ptr() as u64,
            rx_buf: read.as_mut_ptr() as u64,
            len,
            speed_hz: self.config.frequency,
            delay_usecs: self.config.delay_us,
            bits_per_word: self.config.bits_per_word,
            cs_change: u8::from(self.config.cs_change),
            ..Default::default()
        };

        // SAFETY: both buffers are valid for `len` bytes and outlive the
        // call; the kernel reads `write` and fills `read`.
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                SPI_IOC_MESSAGE_1 as _,
                &xfer as *const SpiIocTransfer,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ret as usize)
    }
}
