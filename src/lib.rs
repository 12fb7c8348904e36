//! camera-control library crate.
//!
//! Pure camera-control logic for a preview screen: mapping taps into sensor
//! metering regions, selecting capture parameters from a device's reported
//! capabilities, choosing output sizes, and a controller that drives a
//! capture session through those decisions.

pub mod camera;
pub mod config;
pub mod session;
