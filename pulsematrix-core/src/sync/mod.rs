//! Cross-thread state
//!
//! The ranging and display loops share exactly two things: the latest
//! distance and the request to stop.

pub mod distance;
pub mod stop;

pub use distance::DistanceCell;
pub use stop::StopFlag;
