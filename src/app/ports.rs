//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (ADC, relay, button, LEDs, serial link) implement these
//! traits. The [`ControlLoop`](super::service::ControlLoop) consumes them via
//! generics, so the domain core never touches hardware directly. Blocking
//! waits go through [`embedded_hal::delay::DelayNs`], which the core takes
//! alongside these ports.
//!
//! None of the hardware ports has an error channel: a malfunctioning sensor
//! simply returns a value that may classify degenerately, and actuator
//! faults are fatal outside this crate.

use crate::error::TelemetryError;

use super::events::TelemetryEvent;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One raw moisture conversion per call. Averaging is the caller's job.
pub trait SamplePort {
    /// Raw code in `0..=MAX_READING` (higher = drier).
    fn read_raw(&mut self) -> u16;
}

/// Secondary analog channel reporting ambient temperature.
pub trait TemperaturePort {
    /// Degrees Celsius, or `None` when no sensor is fitted.
    fn read_celsius(&mut self) -> Option<f32>;
}

/// Momentary input used to confirm calibration phases.
pub trait ConfirmPort {
    fn is_asserted(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Pump relay. Digital drive, no readback.
pub trait ActuatorPort {
    fn set_pump(&mut self, energized: bool);
}

/// Status indicators.
pub trait IndicatorPort {
    /// Activity LED: lit while the firmware runs.
    fn set_activity(&mut self, on: bool);

    /// Board LED: feedback during calibration.
    fn set_board(&mut self, on: bool);

    /// Flip the board LED.
    fn toggle_board(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Telemetry ports (driven adapter: domain → serial / logging)
// ───────────────────────────────────────────────────────────────

/// The domain reports structured [`TelemetryEvent`]s through this port.
/// Fire-and-forget: implementations swallow (and log) their own failures.
pub trait EventSink {
    fn report(&mut self, event: &TelemetryEvent);
}

/// Raw outbound link for already-encoded, delimiter-terminated frames.
pub trait FrameWriter {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), TelemetryError>;
}

// Fan-out: report to two sinks (e.g. serial reporter plus log mirror).
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn report(&mut self, event: &TelemetryEvent) {
        self.0.report(event);
        self.1.report(event);
    }
}
