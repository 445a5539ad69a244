//! Outbound telemetry events.
//!
//! The control loop emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide how they are framed: plain text, JSON records, or the log.

use crate::control::classifier::MoistureLevel;

/// Which reference state a calibration report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// Dry-air baseline.
    Air,
    /// Water-immersion baseline.
    Water,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryEvent {
    /// One of the two baselines in effect after calibration.
    /// Always reported once per reference, after any default substitution.
    CalibrationReported { reference: Reference, value: f32 },

    /// The pump relay was energised.
    PumpStarted,

    /// The pump relay was de-energised.
    PumpStopped,

    /// One classified moisture sample.
    MoistureSample {
        raw: f32,
        level: MoistureLevel,
        percentage: Option<f32>,
        temperature: Option<f32>,
    },
}
