//! sysfs GPIO
//!
//! Pins are exported through `/sys/class/gpio/export` and then driven
//! through their `direction`, `value` and `edge` attributes. A value
//! attribute opened non-blocking reports `POLLPRI` when the configured edge
//! fires; reading the value clears the notification.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use pulsematrix_hal::{Edge, EdgeInput, EdgeWait, InputPin, OutputPin};
use thiserror::Error;

/// Default sysfs GPIO class directory
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// GPIO errors
#[derive(Debug, Error)]
pub enum GpioError {
    /// An attribute could not be opened, read or written
    #[error("gpio{gpio}: {op} failed: {source}")]
    Io {
        gpio: u32,
        op: &'static str,
        #[source]
        source: io::Error,
    },
    /// The value attribute held something other than `0` or `1`
    #[error("gpio{gpio}: unexpected value byte {value:#04x}")]
    InvalidValue { gpio: u32, value: u8 },
    /// `poll` woke without the edge notification
    #[error("gpio{gpio}: poll woke without an edge (revents {revents:#x})")]
    SpuriousWakeup { gpio: u32, revents: i16 },
}

impl GpioError {
    fn io(gpio: u32, op: &'static str) -> impl FnOnce(io::Error) -> GpioError {
        move |source| GpioError::Io { gpio, op, source }
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinDirection {
    In,
    Out,
}

impl PinDirection {
    /// Keyword used by the `direction` attribute
    pub const fn as_str(self) -> &'static str {
        match self {
            PinDirection::In => "in",
            PinDirection::Out => "out",
        }
    }
}

/// Controller for the sysfs GPIO class directory
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsGpio {
    /// Controller for `/sys/class/gpio`
    pub fn new() -> Self {
        Self::with_root(SYSFS_GPIO_ROOT)
    }

    /// Controller rooted somewhere else (tests, chroots)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pin_dir(&self, gpio: u32) -> PathBuf {
        self.root.join(format!("gpio{}", gpio))
    }

    fn attr(&self, gpio: u32, name: &str) -> PathBuf {
        self.pin_dir(gpio).join(name)
    }

    /// Make a pin available to userspace
    ///
    /// A pin that is already exported is left as is.
    pub fn export(&self, gpio: u32) -> Result<(), GpioError> {
        if self.pin_dir(gpio).exists() {
            log::debug!("gpio{} already exported", gpio);
            return Ok(());
        }
        write_attr(&self.root.join("export"), &gpio.to_string())
            .map_err(GpioError::io(gpio, "export"))
    }

    /// Hand a pin back to the kernel
    pub fn unexport(&self, gpio: u32) -> Result<(), GpioError> {
        if !self.pin_dir(gpio).exists() {
            return Ok(());
        }
        write_attr(&self.root.join("unexport"), &gpio.to_string())
            .map_err(GpioError::io(gpio, "unexport"))
    }

    /// Set pin direction
    pub fn set_direction(&self, gpio: u32, direction: PinDirection) -> Result<(), GpioError> {
        write_attr(&self.attr(gpio, "direction"), direction.as_str())
            .map_err(GpioError::io(gpio, "set direction"))
    }

    /// Drive an output pin
    pub fn set_value(&self, gpio: u32, high: bool) -> Result<(), GpioError> {
        write_attr(&self.attr(gpio, "value"), if high { "1" } else { "0" })
            .map_err(GpioError::io(gpio, "set value"))
    }

    /// Read a pin
    pub fn get_value(&self, gpio: u32) -> Result<bool, GpioError> {
        let mut file = File::open(self.attr(gpio, "value")).map_err(GpioError::io(gpio, "open value"))?;
        read_level(&mut file, gpio)
    }

    /// Select which transition raises a notification
    pub fn set_edge(&self, gpio: u32, edge: Edge) -> Result<(), GpioError> {
        write_attr(&self.attr(gpio, "edge"), edge.as_str()).map_err(GpioError::io(gpio, "set edge"))
    }

    /// Keep an output pin's value attribute open for fast writes
    pub fn output(&self, gpio: u32) -> Result<SysfsOutput, GpioError> {
        let file = OpenOptions::new()
            .write(true)
            .open(self.attr(gpio, "value"))
            .map_err(GpioError::io(gpio, "open value"))?;
        Ok(SysfsOutput { gpio, file })
    }

    /// Open an input pin for edge-triggered reads
    ///
    /// The value attribute is opened non-blocking so it can be polled.
    pub fn edge_input(&self, gpio: u32) -> Result<SysfsEdgeInput, GpioError> {
        let value = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(self.attr(gpio, "value"))
            .map_err(GpioError::io(gpio, "open value"))?;
        Ok(SysfsEdgeInput {
            gpio,
            value,
            edge_path: self.attr(gpio, "edge"),
        })
    }
}

/// Replace an attribute's contents
fn write_attr(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(contents.as_bytes())
}

/// Read the level from the start of a value attribute
fn read_level(file: &mut File, gpio: u32) -> Result<bool, GpioError> {
    file.seek(SeekFrom::Start(0))
        .map_err(GpioError::io(gpio, "seek value"))?;
    let mut byte = [0u8; 1];
    file.read_exact(&mut byte)
        .map_err(GpioError::io(gpio, "read value"))?;
    match byte[0] {
        b'0' => Ok(false),
        b'1' => Ok(true),
        value => Err(GpioError::InvalidValue { gpio, value }),
    }
}

/// Output pin with its value attribute held open
#[derive(Debug)]
pub struct SysfsOutput {
    gpio: u32,
    file: File,
}

impl SysfsOutput {
    /// GPIO number
    pub fn gpio(&self) -> u32 {
        self.gpio
    }

    fn write_level(&mut self, level: &[u8]) -> Result<(), GpioError> {
        let gpio = self.gpio;
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(GpioError::io(gpio, "seek value"))?;
        self.file
            .write_all(level)
            .map_err(GpioError::io(gpio, "write value"))
    }
}

impl OutputPin for SysfsOutput {
    type Error = GpioError;

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.write_level(b"1")
    }

    fn set_low(&mut self) -> Result<(), GpioError> {
        self.write_level(b"0")
    }
}

/// Input pin with a pollable value handle
#[derive(Debug)]
pub struct SysfsEdgeInput {
    gpio: u32,
    value: File,
    edge_path: PathBuf,
}

impl SysfsEdgeInput {
    /// GPIO number
    pub fn gpio(&self) -> u32 {
        self.gpio
    }
}

impl InputPin for SysfsEdgeInput {
    type Error = GpioError;

    fn is_high(&mut self) -> Result<bool, GpioError> {
        read_level(&mut self.value, self.gpio)
    }
}

impl EdgeInput for SysfsEdgeInput {
    fn set_edge(&mut self, edge: Edge) -> Result<(), GpioError> {
        write_attr(&self.edge_path, edge.as_str()).map_err(GpioError::io(self.gpio, "set edge"))
    }

    fn rearm(&mut self) -> Result<(), GpioError> {
        let gpio = self.gpio;
        // Reading to the end clears a pending POLLPRI
        self.value
            .seek(SeekFrom::Start(0))
            .map_err(GpioError::io(gpio, "seek value"))?;
        let mut scratch = [0u8; 8];
        loop {
            match self.value.read(&mut scratch) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(GpioError::io(gpio, "drain value")(e)),
            }
        }
        self.value
            .seek(SeekFrom::Start(0))
            .map_err(GpioError::io(gpio, "seek value"))?;
        Ok(())
    }

    fn wait_for_edge(&mut self, timeout_ms: u32) -> Result<EdgeWait, GpioError> {
        let mut fds = libc::pollfd {
            fd: self.value.as_raw_fd(),
            events: libc::POLLPRI | libc::POLLERR,
            revents: 0,
        };
        let timeout = i32::try_from(timeout_ms).unwrap_or(i32::MAX);

        // SAFETY: `fds` is a single valid pollfd that outlives the call and
        // the descriptor stays open for as long as `self.value` does.
        let ret = unsafe { libc::poll(&mut fds, 1, timeout) };

        if ret < 0 {
            return Err(GpioError::io(self.gpio, "poll")(io::Error::last_os_error()));
        }
        if ret == 0 {
            return Ok(EdgeWait::TimedOut);
        }
        if fds.revents & libc::POLLPRI != 0 {
            Ok(EdgeWait::Ready)
        } else {
            Err(GpioError::SpuriousWakeup {
                gpio: self.gpio,
                revents: fds.revents,
            })
        }
    }
}
