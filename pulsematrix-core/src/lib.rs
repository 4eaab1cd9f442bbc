//! Board-agnostic core logic for the distance-reactive display
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Sensor and display traits with their error types
//! - Pulse timing to distance conversion
//! - The shared distance cell and the cooperative stop flag
//! - Motion direction tracking (hysteresis) and animation speed
//! - Display register map and frame tables
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod motion;
pub mod ranging;
pub mod sync;
pub mod traits;
