//! Telemetry frame encoders.
//!
//! Wire formats:
//!
//! ```text
//! Plain       "<TAG> <value...>" '-'
//!             AIR 51600-   WATER 25000-   PUMP_ON-   PUMP_OFF-   M 30000 WET_SOIL-
//!
//! Structured  {json record} '\n'
//!             {"air":51600.0}   {"pump":"on"}
//!             {"moisture":41.8,"level":"WET_SOIL","temp":24.5}
//! ```
//!
//! Frames are built in a fixed-capacity buffer; an event that does not fit
//! is rejected with [`TelemetryError::FrameOverflow`] rather than truncated.

use core::fmt::Write;

use heapless::{String, Vec};
use serde::Serialize;

use crate::app::events::{Reference, TelemetryEvent};
use crate::config::TelemetryEncoding;
use crate::error::TelemetryError;

/// Maximum encoded frame length including the delimiter.
pub const MAX_FRAME_LEN: usize = 96;

/// Terminator for plain-text frames.
pub const PLAIN_DELIMITER: u8 = b'-';

/// Terminator for structured frames.
pub const STRUCTURED_DELIMITER: u8 = b'\n';

/// One encoded, delimiter-terminated frame.
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

#[derive(Serialize)]
struct AirRecord {
    air: f32,
}

#[derive(Serialize)]
struct WaterRecord {
    water: f32,
}

#[derive(Serialize)]
struct PumpRecord {
    pump: &'static str,
}

#[derive(Serialize)]
struct SampleRecord {
    moisture: Option<f32>,
    level: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temp: Option<f32>,
}

/// Encode `event` in the requested wire format.
pub fn encode(event: &TelemetryEvent, encoding: TelemetryEncoding) -> Result<Frame, TelemetryError> {
    match encoding {
        TelemetryEncoding::Plain => encode_plain(event),
        TelemetryEncoding::Structured => encode_structured(event),
    }
}

pub fn encode_plain(event: &TelemetryEvent) -> Result<Frame, TelemetryError> {
    let mut text: String<MAX_FRAME_LEN> = String::new();
    let written = match event {
        TelemetryEvent::CalibrationReported { reference: Reference::Air, value } => {
            write!(text, "AIR {}", value)
        }
        TelemetryEvent::CalibrationReported { reference: Reference::Water, value } => {
            write!(text, "WATER {}", value)
        }
        TelemetryEvent::PumpStarted => text.write_str("PUMP_ON"),
        TelemetryEvent::PumpStopped => text.write_str("PUMP_OFF"),
        TelemetryEvent::MoistureSample { raw, level, .. } => write!(text, "M {} {}", raw, level),
    };
    written.map_err(|_| TelemetryError::FrameOverflow)?;

    terminate(text.as_bytes(), PLAIN_DELIMITER)
}

pub fn encode_structured(event: &TelemetryEvent) -> Result<Frame, TelemetryError> {
    let body = match *event {
        TelemetryEvent::CalibrationReported { reference: Reference::Air, value } => {
            serde_json::to_vec(&AirRecord { air: value })
        }
        TelemetryEvent::CalibrationReported { reference: Reference::Water, value } => {
            serde_json::to_vec(&WaterRecord { water: value })
        }
        TelemetryEvent::PumpStarted => serde_json::to_vec(&PumpRecord { pump: "on" }),
        TelemetryEvent::PumpStopped => serde_json::to_vec(&PumpRecord { pump: "off" }),
        TelemetryEvent::MoistureSample { level, percentage, temperature, .. } => {
            serde_json::to_vec(&SampleRecord {
                moisture: percentage,
                level: level.name(),
                temp: temperature,
            })
        }
    }
    .map_err(|_| TelemetryError::Serialize)?;

    terminate(&body, STRUCTURED_DELIMITER)
}

fn terminate(body: &[u8], delimiter: u8) -> Result<Frame, TelemetryError> {
    let mut frame = Frame::from_slice(body).map_err(|()| TelemetryError::FrameOverflow)?;
    frame.push(delimiter).map_err(|_| TelemetryError::FrameOverflow)?;
    Ok(frame)
}
