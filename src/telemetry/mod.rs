//! Telemetry framing and reporting.
//!
//! [`codec`] turns a [`TelemetryEvent`](crate::app::events::TelemetryEvent)
//! into one delimiter-terminated frame in either wire encoding;
//! [`reporter`] is the [`EventSink`](crate::app::ports::EventSink) that
//! encodes each event and pushes the frame to a
//! [`FrameWriter`](crate::app::ports::FrameWriter).

pub mod codec;
pub mod reporter;
