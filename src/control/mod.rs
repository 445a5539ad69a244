//! Decision logic: calibration, classification, and actuation.
//!
//! Pure domain code. Hardware is reached only through the port traits in
//! [`crate::app::ports`] and blocking waits through `embedded_hal`'s
//! `DelayNs`, so everything here runs unchanged against host mocks.

pub mod calibration;
pub mod classifier;
pub mod pump;
pub mod trigger;
