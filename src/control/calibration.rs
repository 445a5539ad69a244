//! Two-point baseline calibration.
//!
//! The probe reads higher as the soil dries, so the dry-air reference sits
//! above the water-immersion reference. Calibration captures both, derives
//! the band width (`interval`, one third of the span), and rejects spans
//! narrower than the configured minimum by substituting the default pair.
//!
//! ## Manual acquisition
//!
//! Each phase keeps sampling while the board LED blinks, until the confirm
//! button has been held for the debounce window. The average taken on the
//! iteration that confirmed is the one that counts. A phase only arms after
//! the button has been seen released, so one long press cannot confirm both.
//!
//! ```text
//!  AwaitRelease ──released──▶ Waiting ──asserted──▶ Debouncing ──held ≥ debounce──▶ Confirmed
//!                                ▲                      │
//!                                └──────released────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::events::{Reference, TelemetryEvent};
use crate::app::ports::{ConfirmPort, EventSink, IndicatorPort, SamplePort};
use crate::config::{CalibrationMode, SystemConfig};
use crate::sensors::moisture::read_average;

// ---------------------------------------------------------------------------
// Baseline value
// ---------------------------------------------------------------------------

/// Calibrated reference pair plus the derived band width.
///
/// Built once at startup and immutable afterwards; the control loop hands it
/// by reference to everything that classifies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBaseline {
    air: f32,
    water: f32,
    interval: f32,
}

impl CalibrationBaseline {
    /// `interval = (air - water) / 3`, no validation.
    pub fn from_pair(air: f32, water: f32) -> Self {
        Self {
            air,
            water,
            interval: (air - water) / 3.0,
        }
    }

    pub fn air(&self) -> f32 {
        self.air
    }

    pub fn water(&self) -> f32 {
        self.water
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }
}

/// Where the baseline in effect came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineSource {
    /// Both phases measured and the span passed the guard.
    Measured,
    /// Measured span was too narrow; defaults substituted.
    Substituted,
    /// Default calibration mode; nothing was sensed.
    Defaulted,
}

/// Outcome of [`Calibrator::calibrate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub baseline: CalibrationBaseline,
    pub source: BaselineSource,
}

// ---------------------------------------------------------------------------
// Confirm gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    AwaitRelease,
    Waiting,
    Debouncing { since_ms: u32 },
    Confirmed,
}

/// Debounced confirmation edge for one calibration phase.
pub struct ConfirmGate {
    state: GateState,
    debounce_ms: u32,
}

impl ConfirmGate {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            state: GateState::AwaitRelease,
            debounce_ms,
        }
    }

    /// Feed the current input level at `now_ms` (phase-relative time).
    pub fn update(&mut self, asserted: bool, now_ms: u32) -> GateState {
        self.state = match self.state {
            GateState::AwaitRelease if !asserted => GateState::Waiting,
            GateState::Waiting if asserted => {
                if self.debounce_ms == 0 {
                    GateState::Confirmed
                } else {
                    GateState::Debouncing { since_ms: now_ms }
                }
            }
            GateState::Debouncing { .. } if !asserted => GateState::Waiting,
            GateState::Debouncing { since_ms }
                if now_ms.wrapping_sub(since_ms) >= self.debounce_ms =>
            {
                GateState::Confirmed
            }
            other => other,
        };
        self.state
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == GateState::Confirmed
    }
}

// ---------------------------------------------------------------------------
// Calibrator
// ---------------------------------------------------------------------------

pub struct Calibrator {
    mode: CalibrationMode,
    readings: u8,
    settle_ms: u32,
    blink_ms: u32,
    debounce_ms: u32,
    phase_gap_ms: u32,
    min_interval: f32,
    default_air: f32,
    default_water: f32,
}

impl Calibrator {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            mode: config.calibration_mode,
            readings: config.calibration_readings,
            settle_ms: config.settle_delay_ms,
            blink_ms: config.blink_period_ms,
            debounce_ms: config.confirm_debounce_ms,
            phase_gap_ms: config.phase_gap_ms,
            min_interval: config.min_interval,
            default_air: config.default_air_baseline,
            default_water: config.default_water_baseline,
        }
    }

    /// The fixed fallback pair.
    pub fn default_baseline(&self) -> CalibrationBaseline {
        CalibrationBaseline::from_pair(self.default_air, self.default_water)
    }

    /// Establish the baseline for this run and report both references.
    ///
    /// Never fails: a rejected measurement is replaced by the defaults,
    /// which are then reported like any other baseline.
    pub fn calibrate<H>(
        &self,
        hw: &mut H,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Calibration
    where
        H: SamplePort + ConfirmPort + IndicatorPort,
    {
        let calibration = match self.mode {
            CalibrationMode::Default => {
                info!("Calibration skipped, using default baselines");
                Calibration {
                    baseline: self.default_baseline(),
                    source: BaselineSource::Defaulted,
                }
            }
            CalibrationMode::Manual => {
                let air = self.acquire_phase(hw, delay, self.default_air);
                info!("Air measure registered ({})", air);
                hw.set_board(true);
                delay.delay_ms(self.phase_gap_ms);

                let water = self.acquire_phase(hw, delay, self.default_water);
                info!("Water measure registered ({})", water);

                self.guard(CalibrationBaseline::from_pair(air, water))
            }
        };

        sink.report(&TelemetryEvent::CalibrationReported {
            reference: Reference::Air,
            value: calibration.baseline.air(),
        });
        sink.report(&TelemetryEvent::CalibrationReported {
            reference: Reference::Water,
            value: calibration.baseline.water(),
        });
        hw.set_board(false);
        calibration
    }

    /// Minimum-spread check. Runs once; the defaults are never re-checked
    /// here because config validation already guarantees them.
    pub fn guard(&self, measured: CalibrationBaseline) -> Calibration {
        info!("Calibration range size: {}", measured.interval());
        if measured.interval().is_nan() || measured.interval() < self.min_interval {
            warn!(
                "Invalid interval {} < {}, using default values",
                measured.interval(),
                self.min_interval
            );
            return Calibration {
                baseline: self.default_baseline(),
                source: BaselineSource::Substituted,
            };
        }
        Calibration {
            baseline: measured,
            source: BaselineSource::Measured,
        }
    }

    /// Simulated time one acquisition iteration accounts for.
    fn iteration_ms(&self) -> u32 {
        u32::from(self.readings)
            .saturating_mul(self.settle_ms)
            .saturating_add(self.blink_ms)
    }

    /// Sample until the confirm gate closes; returns the last average.
    fn acquire_phase<H>(&self, hw: &mut H, delay: &mut impl DelayNs, fallback: f32) -> f32
    where
        H: SamplePort + ConfirmPort + IndicatorPort,
    {
        let mut gate = ConfirmGate::new(self.debounce_ms);
        let iteration_ms = self.iteration_ms();
        let mut elapsed_ms: u32 = 0;
        let mut last = None;

        loop {
            hw.toggle_board();
            if let Some(avg) = read_average(hw, delay, self.readings, self.settle_ms) {
                last = Some(avg);
            }
            delay.delay_ms(self.blink_ms);
            elapsed_ms = elapsed_ms.wrapping_add(iteration_ms);

            let asserted = hw.is_asserted();
            if gate.update(asserted, elapsed_ms) == GateState::Confirmed {
                break;
            }
        }

        last.unwrap_or(fallback)
    }
}
