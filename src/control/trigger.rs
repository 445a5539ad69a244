//! Background sampling variant.
//!
//! A sampler thread owns its own probe, classifies continuously against the
//! startup baseline, and publishes every result to a [`PumpTrigger`]. The
//! latest result is kept for reporting; dry results also raise the pump
//! request. The control loop consumes both once per period and remains the
//! only owner of the relay.
//!
//! ```text
//! ┌──────────────────┐ publish(result) ┌──────────────┐ take_latest() ┌──────────────┐
//! │ BackgroundSampler│────────────────▶│  PumpTrigger │──────────────▶│ ControlLoop  │
//! │ (sampler thread) │                 │  (Signals)   │    take()     │ (main task)  │
//! └──────────────────┘                 └──────────────┘               └──────────────┘
//! ```
//!
//! The trigger is the only cross-task mutable state. Each take reads and
//! clears under one critical section so a publish can never be lost between
//! the two, and repeated publishes before a take collapse into the latest one.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::app::ports::SamplePort;
use crate::config::SystemConfig;
use crate::sensors::moisture::read_average;

use super::calibration::CalibrationBaseline;
use super::classifier::{ClassificationResult, MoistureClassifier};

/// Stack for the sampler thread; it only averages and classifies.
const SAMPLER_STACK_BYTES: usize = 8192;

/// Latest sample plus the latest dry-soil sample awaiting the control loop.
pub struct PumpTrigger {
    signal: Signal<CriticalSectionRawMutex, ClassificationResult>,
    latest: Signal<CriticalSectionRawMutex, ClassificationResult>,
}

impl PumpTrigger {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            latest: Signal::new(),
        }
    }

    /// Record a sample; dry ones also raise the trigger.
    pub fn publish(&self, result: ClassificationResult) {
        self.latest.signal(result);
        if result.level.needs_water() {
            self.raise(result);
        }
    }

    /// Most recent sample of any level since the last call.
    pub fn take_latest(&self) -> Option<ClassificationResult> {
        self.latest.try_take()
    }

    /// Set the trigger, replacing any pending sample.
    pub fn raise(&self, result: ClassificationResult) {
        self.signal.signal(result);
    }

    /// Read and clear in one step. Main task only.
    pub fn take(&self) -> Option<ClassificationResult> {
        self.signal.try_take()
    }

    pub fn is_raised(&self) -> bool {
        self.signal.signaled()
    }
}

impl Default for PumpTrigger {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BackgroundSampler<S, D> {
    source: S,
    delay: D,
    baseline: CalibrationBaseline,
    classifier: MoistureClassifier,
    readings: u8,
    settle_ms: u32,
    poll_ms: u32,
}

impl<S: SamplePort, D: DelayNs> BackgroundSampler<S, D> {
    pub fn new(source: S, delay: D, baseline: CalibrationBaseline, config: &SystemConfig) -> Self {
        Self {
            source,
            delay,
            baseline,
            classifier: MoistureClassifier::new(config.wants_percentage()),
            readings: config.readings_per_sample,
            settle_ms: config.settle_delay_ms,
            poll_ms: config.background_poll_ms,
        }
    }

    /// Take one averaged sample and publish it.
    pub fn step(&mut self, trigger: &PumpTrigger) -> Option<ClassificationResult> {
        let raw = read_average(&mut self.source, &mut self.delay, self.readings, self.settle_ms)?;
        let result = self.classifier.classify(raw, &self.baseline);
        if result.level.needs_water() {
            debug!("Sampler: {} at {}, raising trigger", result.level, raw);
        }
        trigger.publish(result);
        Some(result)
    }

    /// Sample forever at the configured period.
    pub fn run(mut self, trigger: &PumpTrigger) -> ! {
        info!("Background sampler started ({} ms period)", self.poll_ms);
        loop {
            let _ = self.step(trigger);
            self.delay.delay_ms(self.poll_ms);
        }
    }
}

/// Move the sampler onto its own thread.
pub fn spawn_sampler<S, D>(
    sampler: BackgroundSampler<S, D>,
    trigger: Arc<PumpTrigger>,
) -> std::io::Result<JoinHandle<()>>
where
    S: SamplePort + Send + 'static,
    D: DelayNs + Send + 'static,
{
    thread::Builder::new()
        .name("sampler".into())
        .stack_size(SAMPLER_STACK_BYTES)
        .spawn(move || {
            sampler.run(&trigger);
        })
}
