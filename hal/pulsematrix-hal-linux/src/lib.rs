//! Linux userspace HAL for pulsematrix
//!
//! This crate implements the `pulsematrix-hal` traits on a Linux board
//! through the kernel's userspace interfaces:
//!
//! - GPIO through the sysfs class interface, with `poll(2)` on the value
//!   attribute for edge notification
//! - SPI through spidev `ioctl` transfers
//! - Monotonic ticks from `embassy-time`'s std driver
//! - Blocking delays on `std::thread::sleep`
//! - Real-time scheduling hints via `pthread_setschedparam`

pub mod clock;
pub mod sched;
pub mod spidev;
pub mod sysfs;

// Re-export shared traits from pulsematrix-hal for convenience
pub use pulsematrix_hal::{Edge, EdgeInput, EdgeWait, InputPin, OutputPin, SpiBus, SpiConfig, TickSource};

pub use clock::{MonotonicClock, ThreadDelay};
pub use spidev::Spidev;
pub use sysfs::{GpioError, PinDirection, SysfsEdgeInput, SysfsGpio, SysfsOutput};
