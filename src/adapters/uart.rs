//! Serial telemetry link.
//!
//! Implements [`FrameWriter`] over the telemetry UART configured by
//! hw_init. On host builds the write is accepted and discarded.

use crate::app::ports::FrameWriter;
use crate::drivers::hw_init;
use crate::error::TelemetryError;

#[derive(Default)]
pub struct UartWriter;

impl UartWriter {
    pub fn new() -> Self {
        Self
    }
}

impl FrameWriter for UartWriter {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), TelemetryError> {
        match hw_init::uart_write(frame) {
            Some(n) if n == frame.len() => Ok(()),
            _ => Err(TelemetryError::WriteFailed),
        }
    }
}
