//! Application service: the hexagonal core.
//!
//! [`ControlLoop`] owns the calibrator, classifier, and pump controller.
//! It calibrates once at startup, then repeats the sample, classify,
//! report, actuate cycle on a fixed period. All I/O flows through port
//! traits injected at call sites, so the whole loop runs against mocks.
//!
//! ```text
//!  SamplePort ─────▶ ┌───────────────────────────┐ ──▶ EventSink
//!  TemperaturePort ─▶│        ControlLoop         │
//!  ConfirmPort ─────▶│ Calibrate · Classify · Pump│
//!  ActuatorPort ◀────│                            │
//!  IndicatorPort ◀───└───────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::calibration::{Calibration, CalibrationBaseline, Calibrator};
use crate::control::classifier::{ClassificationResult, MoistureClassifier};
use crate::control::pump::PumpController;
use crate::control::trigger::PumpTrigger;
use crate::sensors::moisture::read_average;

use super::events::TelemetryEvent;
use super::ports::{
    ActuatorPort, ConfirmPort, EventSink, IndicatorPort, SamplePort, TemperaturePort,
};

pub const DEVICE_NAME: &str = "Humetron";

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop {
    config: SystemConfig,
    calibrator: Calibrator,
    classifier: MoistureClassifier,
    pump: PumpController,
    /// Defaults until [`start`](Self::start) runs; immutable afterwards.
    baseline: CalibrationBaseline,
    calibration: Option<Calibration>,
    tick_count: u64,
}

impl ControlLoop {
    /// Construct the loop from configuration.
    ///
    /// Does **not** calibrate. Call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let calibrator = Calibrator::new(&config);
        let baseline = calibrator.default_baseline();
        Self {
            classifier: MoistureClassifier::new(config.wants_percentage()),
            pump: PumpController::new(config.pump_dwell_ms),
            calibrator,
            baseline,
            calibration: None,
            tick_count: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot sequence: activity indicator on, relay off, then one calibration.
    pub fn start<H>(
        &mut self,
        hw: &mut H,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Calibration
    where
        H: SamplePort + ConfirmPort + IndicatorPort + ActuatorPort,
    {
        hw.set_activity(true);
        hw.set_pump(false);
        info!("Calibrating {}...", DEVICE_NAME);

        let calibration = self.calibrator.calibrate(hw, delay, sink);
        self.baseline = calibration.baseline;
        self.calibration = Some(calibration);
        info!(
            "Baseline locked: air={} water={} interval={} ({:?})",
            calibration.baseline.air(),
            calibration.baseline.water(),
            calibration.baseline.interval(),
            calibration.source,
        );
        calibration
    }

    // ── Cycle ─────────────────────────────────────────────────

    /// One inline cycle: average, classify, report, maybe pump.
    ///
    /// Blocks for the settle delays and, if the pump runs, the full dwell.
    /// Returns `None` when the cycle was skipped.
    pub fn tick<H>(
        &mut self,
        hw: &mut H,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Option<ClassificationResult>
    where
        H: SamplePort + TemperaturePort + ActuatorPort,
    {
        self.tick_count += 1;
        let Some(raw) = read_average(
            hw,
            delay,
            self.config.readings_per_sample,
            self.config.settle_delay_ms,
        ) else {
            warn!("No readings configured, skipping cycle {}", self.tick_count);
            return None;
        };

        let result = self.classifier.classify(raw, &self.baseline);
        self.act_on(result, hw, delay, sink);
        Some(result)
    }

    /// One background-mode cycle: report the newest published sample, then
    /// pump if a dry sample raised the trigger. Returns the reported sample,
    /// or `None` when the sampler published nothing since the last cycle.
    pub fn tick_triggered<H>(
        &mut self,
        trigger: &PumpTrigger,
        hw: &mut H,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Option<ClassificationResult>
    where
        H: TemperaturePort + ActuatorPort,
    {
        self.tick_count += 1;
        let latest = trigger.take_latest();
        let dry = trigger.take();
        let reported = latest.or(dry)?;
        self.report(reported, hw, sink);
        if let Some(dry) = dry {
            self.pump.maybe_activate(dry.level, hw, delay, sink);
        }
        Some(reported)
    }

    fn act_on<H>(
        &mut self,
        result: ClassificationResult,
        hw: &mut H,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) where
        H: TemperaturePort + ActuatorPort,
    {
        self.report(result, hw, sink);
        self.pump.maybe_activate(result.level, hw, delay, sink);
    }

    fn report<H: TemperaturePort>(
        &self,
        result: ClassificationResult,
        hw: &mut H,
        sink: &mut impl EventSink,
    ) {
        let temperature = hw.read_celsius();
        info!("Moisture {} ({})", result.raw, result.level);
        sink.report(&TelemetryEvent::MoistureSample {
            raw: result.raw,
            level: result.level,
            percentage: result.percentage,
            temperature,
        });
    }

    /// Inline mode forever: tick, then sleep one period.
    pub fn run<H>(&mut self, hw: &mut H, delay: &mut impl DelayNs, sink: &mut impl EventSink) -> !
    where
        H: SamplePort + TemperaturePort + ActuatorPort,
    {
        loop {
            let _ = self.tick(hw, delay, sink);
            delay.delay_ms(self.config.sample_period_ms);
        }
    }

    /// Background mode forever: consume the published samples once per period.
    pub fn run_triggered<H>(
        &mut self,
        trigger: &PumpTrigger,
        hw: &mut H,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> !
    where
        H: TemperaturePort + ActuatorPort,
    {
        loop {
            let _ = self.tick_triggered(trigger, hw, delay, sink);
            delay.delay_ms(self.config.sample_period_ms);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn baseline(&self) -> CalibrationBaseline {
        self.baseline
    }

    /// Startup calibration outcome, once [`start`](Self::start) has run.
    pub fn calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    pub fn pump(&self) -> &PumpController {
        &self.pump
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
