//! Configuration handling
//!
//! Configuration types live in `pulsematrix-core`; this module only loads
//! them.

pub mod loader;

pub use loader::load_config;
