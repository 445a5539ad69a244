//! Application core: pure domain orchestration, zero I/O.
//!
//! [`service::ControlLoop`] drives calibration and the periodic cycle.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
