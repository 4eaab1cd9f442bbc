//! Pulsematrix Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the ranging and display logic is
//! written against. Platform crates implement them; drivers and the
//! application only ever see the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (pulsematrix-firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pulsematrix-hal (this crate - traits)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ pulsematrix-hal-  │
//!           │  linux (sysfs,    │
//!           │  spidev)          │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::EdgeInput`] - Input with edge-triggered readiness notification
//! - [`spi::SpiBus`] - Full-duplex SPI transfers
//! - [`timer::TickSource`] - Monotonic high-resolution tick counter

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use gpio::{Edge, EdgeInput, EdgeWait, InputPin, OutputPin};
pub use spi::{Mode, SpiBus, SpiConfig};
pub use timer::TickSource;
