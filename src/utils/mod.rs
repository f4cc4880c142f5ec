//! Utility helpers: math extensions and step profiling.

pub mod math;
pub mod profiling;

pub use math::*;
pub use profiling::StepProfile;
