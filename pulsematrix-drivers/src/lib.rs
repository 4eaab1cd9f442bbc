//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pulsematrix-core, written against the pulsematrix-hal pin and bus
//! traits:
//!
//! - Display drivers (MAX7219 8x8 LED matrix)
//! - Range sensors (HC-SR04 style single-pin echo ranger)

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;
