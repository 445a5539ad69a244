//! Mock hardware for integration tests.
//!
//! Every port call is recorded against a simulated clock that only moves
//! when the code under test delays, so dwell and settle timing can be
//! asserted exactly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use humetron::app::events::TelemetryEvent;
use humetron::app::ports::{
    ActuatorPort, ConfirmPort, EventSink, FrameWriter, IndicatorPort, SamplePort, TemperaturePort,
};
use humetron::error::TelemetryError;

// ── Simulated clock ───────────────────────────────────────────

#[derive(Clone, Default)]
pub struct SimClock {
    now_ns: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl SimClock {
    pub fn now_ms(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }

    fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get() + ns);
    }
}

/// `DelayNs` that advances the simulated clock instead of sleeping.
pub struct SimDelay {
    clock: SimClock,
}

impl SimDelay {
    pub fn new(clock: &SimClock) -> Self {
        Self { clock: clock.clone() }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ns(u64::from(ms) * 1_000_000);
    }
}

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HwCall {
    Pump(bool),
    Activity(bool),
    Board(bool),
    ToggleBoard,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    clock: SimClock,
    /// `(from_ms, raw)` steps; the last step at or before "now" applies.
    moisture: Vec<(u64, u16)>,
    /// `[press_ms, release_ms)` windows during which the button is held.
    presses: Vec<(u64, u64)>,
    pub temperature: Option<f32>,
    pub calls: Vec<(u64, HwCall)>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            moisture: vec![(0, 40_000)],
            presses: Vec::new(),
            temperature: None,
            calls: Vec::new(),
            reads: 0,
        }
    }

    /// From `from_ms` on, every read returns `raw`.
    pub fn moisture_from(&mut self, from_ms: u64, raw: u16) -> &mut Self {
        self.moisture.push((from_ms, raw));
        self.moisture.sort_by_key(|&(t, _)| t);
        self
    }

    pub fn press(&mut self, press_ms: u64, release_ms: u64) -> &mut Self {
        self.presses.push((press_ms, release_ms));
        self
    }

    /// Timestamped relay writes.
    pub fn pump_writes(&self) -> Vec<(u64, bool)> {
        self.calls
            .iter()
            .filter_map(|&(t, c)| match c {
                HwCall::Pump(on) => Some((t, on)),
                _ => None,
            })
            .collect()
    }

    pub fn pump_on(&self) -> bool {
        self.pump_writes().last().is_some_and(|&(_, on)| on)
    }

    pub fn toggles(&self) -> usize {
        self.calls.iter().filter(|(_, c)| *c == HwCall::ToggleBoard).count()
    }

    fn record(&mut self, call: HwCall) {
        self.calls.push((self.clock.now_ms(), call));
    }
}

impl SamplePort for MockHardware {
    fn read_raw(&mut self) -> u16 {
        self.reads += 1;
        let now = self.clock.now_ms();
        self.moisture
            .iter()
            .rev()
            .find(|&&(t, _)| t <= now)
            .map_or(0, |&(_, raw)| raw)
    }
}

impl TemperaturePort for MockHardware {
    fn read_celsius(&mut self) -> Option<f32> {
        self.temperature
    }
}

impl ConfirmPort for MockHardware {
    fn is_asserted(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.presses.iter().any(|&(down, up)| (down..up).contains(&now))
    }
}

impl ActuatorPort for MockHardware {
    fn set_pump(&mut self, energized: bool) {
        self.record(HwCall::Pump(energized));
    }
}

impl IndicatorPort for MockHardware {
    fn set_activity(&mut self, on: bool) {
        self.record(HwCall::Activity(on));
    }

    fn set_board(&mut self, on: bool) {
        self.record(HwCall::Board(on));
    }

    fn toggle_board(&mut self) {
        self.record(HwCall::ToggleBoard);
    }
}

// ── Sinks ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<TelemetryEvent>,
}

impl EventSink for RecordingSink {
    fn report(&mut self, event: &TelemetryEvent) {
        self.events.push(*event);
    }
}

/// Serial link capturing the raw byte stream.
#[derive(Clone, Default)]
pub struct Wire {
    pub bytes: Rc<RefCell<Vec<u8>>>,
}

#[allow(dead_code)]
impl Wire {
    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.borrow().clone()).unwrap()
    }
}

impl FrameWriter for Wire {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), TelemetryError> {
        self.bytes.borrow_mut().extend_from_slice(frame);
        Ok(())
    }
}
