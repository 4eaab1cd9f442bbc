//! Hardware abstraction traits
//!
//! These traits define the interface between the application loops
//! and device drivers.

pub mod display;
pub mod ranging;

pub use display::{DisplayError, MatrixDisplay};
pub use ranging::{RangeSensor, RangingError};
