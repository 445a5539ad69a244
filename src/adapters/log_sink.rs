//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by mirroring telemetry events to the ESP-IDF
//! logger (USB-CDC console in production). Paired with the serial
//! [`TelemetryReporter`](crate::telemetry::reporter::TelemetryReporter)
//! through the tuple fan-out sink.

use log::info;

use crate::app::events::{Reference, TelemetryEvent};
use crate::app::ports::EventSink;

/// Adapter that logs every [`TelemetryEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn report(&mut self, event: &TelemetryEvent) {
        match event {
            TelemetryEvent::CalibrationReported { reference, value } => {
                let name = match reference {
                    Reference::Air => "air",
                    Reference::Water => "water",
                };
                info!("CALIB | {}={:.0}", name, value);
            }
            TelemetryEvent::PumpStarted => info!("PUMP  | on"),
            TelemetryEvent::PumpStopped => info!("PUMP  | off"),
            TelemetryEvent::MoistureSample { raw, level, percentage, temperature } => {
                match (percentage, temperature) {
                    (Some(p), Some(t)) => {
                        info!("SAMPLE | raw={:.0} | {} | {:.1}% | T={:.1}\u{00b0}C", raw, level, p, t)
                    }
                    (Some(p), None) => info!("SAMPLE | raw={:.0} | {} | {:.1}%", raw, level, p),
                    (None, Some(t)) => info!("SAMPLE | raw={:.0} | {} | T={:.1}\u{00b0}C", raw, level, t),
                    (None, None) => info!("SAMPLE | raw={:.0} | {}", raw, level),
                }
            }
        }
    }
}
