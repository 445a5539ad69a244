//! Telemetry reporter: encode every event and push it out as one frame.
//!
//! Transmission is fire-and-forget. A frame that cannot be encoded or
//! written is logged and dropped; the control loop never sees the error.

use log::{debug, warn};

use crate::app::events::TelemetryEvent;
use crate::app::ports::{EventSink, FrameWriter};
use crate::config::TelemetryEncoding;
use crate::error::TelemetryError;

use super::codec::{self, Frame};

pub struct TelemetryReporter<W: FrameWriter> {
    writer: W,
    encoding: TelemetryEncoding,
    sent: u32,
    dropped: u32,
}

impl<W: FrameWriter> TelemetryReporter<W> {
    pub fn new(writer: W, encoding: TelemetryEncoding) -> Self {
        Self {
            writer,
            encoding,
            sent: 0,
            dropped: 0,
        }
    }

    pub fn set_encoding(&mut self, encoding: TelemetryEncoding) {
        self.encoding = encoding;
    }

    /// Encode and send one event in an explicit encoding.
    pub fn send(&mut self, event: &TelemetryEvent, encoding: TelemetryEncoding) -> Result<(), TelemetryError> {
        let frame = codec::encode(event, encoding)?;
        echo(&frame);
        self.writer.write_frame(&frame)
    }

    /// Frames written since boot.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Frames lost to encode or write failures since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: FrameWriter> EventSink for TelemetryReporter<W> {
    fn report(&mut self, event: &TelemetryEvent) {
        match self.send(event, self.encoding) {
            Ok(()) => self.sent = self.sent.wrapping_add(1),
            Err(e) => {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("TELEMETRY | frame dropped: {}", e);
            }
        }
    }
}

fn echo(frame: &Frame) {
    match core::str::from_utf8(frame) {
        Ok(text) => debug!("TELEMETRY | {}", text.trim_end()),
        Err(_) => debug!("TELEMETRY | {} bytes", frame.len()),
    }
}
