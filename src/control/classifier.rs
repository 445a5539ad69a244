//! Moisture classification.
//!
//! Maps an averaged raw reading onto one of four ordered levels using the
//! calibrated baselines. The span between the water and air baselines is cut
//! into three bands of width `interval`:
//!
//! ```text
//!   water        water+iv       air-iv         air
//!     │── WET ──────│── NORMAL ────│── DRY ───────│
//!   ≤ water, ≥ air, or exactly on a band edge → SUPER_WET
//! ```
//!
//! Every comparison is strict, so band edges fall through to `SuperWet`.
//! Values drier than the air baseline also land there.

use core::fmt;

use super::calibration::CalibrationBaseline;

/// Categorical soil condition. Ordered `Dry < Normal < Wet < SuperWet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MoistureLevel {
    Dry = 0,
    Normal = 1,
    Wet = 2,
    SuperWet = 3,
}

impl MoistureLevel {
    /// Wire name used in telemetry frames.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dry => "DRY_SOIL",
            Self::Normal => "NORMAL_SOIL",
            Self::Wet => "WET_SOIL",
            Self::SuperWet => "SUPER_WET_SOIL",
        }
    }

    /// Whether this level calls for irrigation.
    pub fn needs_water(self) -> bool {
        self < Self::Normal
    }
}

impl fmt::Display for MoistureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classified sample. Transient, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub raw: f32,
    pub level: MoistureLevel,
    pub percentage: Option<f32>,
}

/// Band lookup in priority order; first match wins.
pub fn level_for(raw: f32, baseline: &CalibrationBaseline) -> MoistureLevel {
    let water = baseline.water();
    let air = baseline.air();
    let iv = baseline.interval();

    if raw > water && raw < water + iv {
        MoistureLevel::Wet
    } else if raw > water + iv && raw < air - iv {
        MoistureLevel::Normal
    } else if raw > air - iv && raw < air {
        MoistureLevel::Dry
    } else {
        MoistureLevel::SuperWet
    }
}

/// `100 - raw * 100 / air`. Deliberately unclamped: readings drier than the
/// air baseline go negative, and callers that display it clamp themselves.
pub fn percentage(raw: f32, air: f32) -> f32 {
    100.0 - (raw * 100.0 / air)
}

/// Classifier with its output options.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoistureClassifier {
    with_percentage: bool,
}

impl MoistureClassifier {
    pub fn new(with_percentage: bool) -> Self {
        Self { with_percentage }
    }

    pub fn classify(&self, raw: f32, baseline: &CalibrationBaseline) -> ClassificationResult {
        ClassificationResult {
            raw,
            level: level_for(raw, baseline),
            percentage: self.with_percentage.then(|| percentage(raw, baseline.air())),
        }
    }
}
