//! Display drivers

pub mod max7219;

pub use max7219::{transfer, Max7219};
