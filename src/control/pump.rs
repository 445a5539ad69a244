//! Pump actuation state machine.
//!
//! ```text
//!   Idle ──(level < NORMAL)──▶ Running ──(dwell elapses)──▶ Idle
//! ```
//!
//! A cycle is a fixed-length pulse: once started it always runs the full
//! dwell and always ends with the relay de-energised. Nothing aborts it
//! early, and triggers arriving while it runs are dropped rather than
//! queued.
//!
//! The controller is the only writer of the relay. It lives on the task
//! that runs the control loop.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::app::events::TelemetryEvent;
use crate::app::ports::{ActuatorPort, EventSink};

use super::classifier::MoistureLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Idle,
    Running,
}

pub struct PumpController {
    state: PumpState,
    dwell_ms: u32,
    cycles: u32,
}

impl PumpController {
    pub fn new(dwell_ms: u32) -> Self {
        Self {
            state: PumpState::Idle,
            dwell_ms,
            cycles: 0,
        }
    }

    /// Run one full pump cycle if `level` calls for water.
    ///
    /// Blocks for the dwell. Returns whether a cycle ran.
    pub fn maybe_activate(
        &mut self,
        level: MoistureLevel,
        hw: &mut impl ActuatorPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.try_start(level, hw, sink) {
            return false;
        }
        delay.delay_ms(self.dwell_ms);
        self.finish(hw, sink);
        true
    }

    /// Energise the relay and enter `Running`, unless already running or
    /// the soil is not dry. Returns whether the pump started.
    pub fn try_start(
        &mut self,
        level: MoistureLevel,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> bool {
        if self.state == PumpState::Running {
            debug!("Pump trigger ignored: cycle already running");
            return false;
        }
        if !level.needs_water() {
            return false;
        }

        hw.set_pump(true);
        self.state = PumpState::Running;
        self.cycles = self.cycles.wrapping_add(1);
        info!("Pump ON for {} ms ({})", self.dwell_ms, level);
        sink.report(&TelemetryEvent::PumpStarted);
        true
    }

    /// De-energise the relay and return to `Idle`. No-op when idle.
    pub fn finish(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if self.state != PumpState::Running {
            return;
        }
        hw.set_pump(false);
        self.state = PumpState::Idle;
        info!("Pump OFF");
        sink.report(&TelemetryEvent::PumpStopped);
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PumpState::Running
    }

    pub fn dwell_ms(&self) -> u32 {
        self.dwell_ms
    }

    /// Cycles started since boot.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }
}
