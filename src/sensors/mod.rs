//! Sensor drivers.
//!
//! Each driver implements one hardware port from [`crate::app::ports`].
//! The [`HardwareAdapter`](crate::adapters::hardware::HardwareAdapter)
//! owns them; the background sampler builds its own probe.

pub mod moisture;
pub mod temperature;
