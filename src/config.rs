//! System configuration parameters
//!
//! All tunable parameters for the Humetron controller.
//! Values can be overridden at build time with a JSON document (see
//! [`SystemConfig::from_json`]); nothing is persisted across power cycles.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for the settle, blink, debounce, and phase-gap delays.
pub const MAX_SHORT_DELAY_MS: u32 = 10_000;

/// How the startup baselines are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Two-phase air/water acquisition gated by the confirm button.
    Manual,
    /// Skip sensing and use the configured default baseline pair.
    Default,
}

/// Wire encoding used by the telemetry reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryEncoding {
    /// `"<TAG> <value...>"` terminated by `-`.
    Plain,
    /// JSON key/value record terminated by `\n`.
    Structured,
}

/// Where moisture acquisition runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// The control loop samples, classifies, and actuates on one task.
    Inline,
    /// A sampler thread raises a trigger consumed by the control loop.
    Background,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Modes ---
    pub calibration_mode: CalibrationMode,
    pub telemetry_encoding: TelemetryEncoding,
    pub sampling_mode: SamplingMode,

    // --- Timing ---
    /// Control loop period between samples (milliseconds)
    pub sample_period_ms: u32,
    /// How long the pump stays energised once triggered (milliseconds)
    pub pump_dwell_ms: u32,
    /// Settling delay after each individual ADC read (milliseconds)
    pub settle_delay_ms: u32,
    /// Indicator toggle period while a calibration phase waits (milliseconds)
    pub blink_period_ms: u32,
    /// Confirm button must stay asserted this long to count (milliseconds)
    pub confirm_debounce_ms: u32,
    /// Pause with the indicator lit between the air and water phases (milliseconds)
    pub phase_gap_ms: u32,
    /// Background sampler period (milliseconds)
    pub background_poll_ms: u32,

    // --- Acquisition ---
    /// Reads averaged for each control-loop sample
    pub readings_per_sample: u8,
    /// Reads averaged for each calibration iteration
    pub calibration_readings: u8,

    // --- Calibration ---
    /// Smallest acceptable band width (raw units)
    pub min_interval: f32,
    /// Dry-air reference used when calibration is skipped or rejected
    pub default_air_baseline: f32,
    /// Water reference used when calibration is skipped or rejected
    pub default_water_baseline: f32,

    // --- Telemetry ---
    /// Attach the 0–100 moisture percentage to samples (always on for structured)
    pub report_percentage: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            calibration_mode: CalibrationMode::Manual,
            telemetry_encoding: TelemetryEncoding::Plain,
            sampling_mode: SamplingMode::Inline,

            sample_period_ms: 30_000,
            pump_dwell_ms: 5_000,
            settle_delay_ms: 100,
            blink_period_ms: 50,
            confirm_debounce_ms: 50,
            phase_gap_ms: 500,
            background_poll_ms: 1_000,

            readings_per_sample: 3,
            calibration_readings: 1,

            min_interval: 1000.0,
            default_air_baseline: 51_600.0,
            default_water_baseline: 25_000.0,

            report_percentage: false,
        }
    }
}

impl SystemConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults,
    /// then validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply an optional override, falling back to the defaults when it is
    /// absent or rejected.
    pub fn from_override(json: Option<&str>) -> Self {
        let Some(json) = json else {
            info!("Config: built-in defaults");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => {
                info!("Config: override applied");
                config
            }
            Err(e) => {
                warn!("Config override rejected ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Reject out-of-range values instead of clamping them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1_000..=3_600_000).contains(&self.sample_period_ms) {
            return Err(ConfigError::ValidationFailed("sample_period_ms out of 1s..1h"));
        }
        if !(1..=60_000).contains(&self.pump_dwell_ms) {
            return Err(ConfigError::ValidationFailed("pump_dwell_ms out of 1ms..60s"));
        }
        if self.settle_delay_ms > MAX_SHORT_DELAY_MS {
            return Err(ConfigError::ValidationFailed("settle_delay_ms out of 0..10s"));
        }
        if self.blink_period_ms > MAX_SHORT_DELAY_MS {
            return Err(ConfigError::ValidationFailed("blink_period_ms out of 0..10s"));
        }
        if self.confirm_debounce_ms > MAX_SHORT_DELAY_MS {
            return Err(ConfigError::ValidationFailed("confirm_debounce_ms out of 0..10s"));
        }
        if self.phase_gap_ms > MAX_SHORT_DELAY_MS {
            return Err(ConfigError::ValidationFailed("phase_gap_ms out of 0..10s"));
        }
        if self.readings_per_sample == 0 {
            return Err(ConfigError::ValidationFailed("readings_per_sample must be >= 1"));
        }
        if self.calibration_readings == 0 {
            return Err(ConfigError::ValidationFailed("calibration_readings must be >= 1"));
        }
        if !(1..=3_600_000).contains(&self.background_poll_ms) {
            return Err(ConfigError::ValidationFailed("background_poll_ms out of 1ms..1h"));
        }
        if !self.min_interval.is_finite() || self.min_interval <= 0.0 {
            return Err(ConfigError::ValidationFailed("min_interval must be > 0"));
        }
        let (air, water) = (self.default_air_baseline, self.default_water_baseline);
        if !air.is_finite() || !water.is_finite() || water < 0.0 || air <= water {
            return Err(ConfigError::ValidationFailed("default baselines need air > water >= 0"));
        }
        if (air - water) / 3.0 < self.min_interval {
            return Err(ConfigError::ValidationFailed("default baselines narrower than min_interval"));
        }
        Ok(())
    }

    /// Whether samples should carry a percentage for the configured encoding.
    pub fn wants_percentage(&self) -> bool {
        self.report_percentage || self.telemetry_encoding == TelemetryEncoding::Structured
    }
}
