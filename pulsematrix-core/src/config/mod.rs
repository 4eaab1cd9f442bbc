//! Configuration types
//!
//! Board-agnostic configuration structures. Pin assignments are fixed by
//! the board and deliberately absent here.

pub mod types;

pub use types::*;
