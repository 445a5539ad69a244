//! Capacitive soil moisture probe.
//!
//! The probe's output voltage drops as moisture rises, so raw codes are
//! "drier = higher". Codes are normalised to the 16-bit range regardless
//! of the ADC's native width, so baselines and thresholds are portable
//! between boards.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH4 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use embedded_hal::delay::DelayNs;

use crate::app::ports::SamplePort;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Full-scale raw code.
pub const MAX_READING: u16 = u16::MAX;

static SIM_MOISTURE_ADC: AtomicU16 = AtomicU16::new(40_000);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_moisture_raw(raw: u16) {
    SIM_MOISTURE_ADC.store(raw, Ordering::Relaxed);
}

/// Average `count` consecutive reads, waiting `settle_ms` after each one so
/// the analog front-end stabilises.
///
/// Returns `None` for `count == 0`; the caller skips the cycle.
pub fn read_average(
    source: &mut impl SamplePort,
    delay: &mut impl DelayNs,
    count: u8,
    settle_ms: u32,
) -> Option<f32> {
    if count < 1 {
        return None;
    }
    let mut sum: u32 = 0;
    for _ in 0..count {
        sum += u32::from(source.read_raw());
        delay.delay_ms(settle_ms);
    }
    Some(sum as f32 / f32::from(count))
}

/// Widen a 12-bit conversion to the 16-bit scale by bit replication.
pub fn widen_12bit(raw: u16) -> u16 {
    let raw = raw & 0x0FFF;
    (raw << 4) | (raw >> 8)
}

pub struct MoistureProbe {
    _adc_gpio: i32,
}

impl MoistureProbe {
    pub fn new(adc_gpio: i32) -> Self {
        Self { _adc_gpio: adc_gpio }
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        widen_12bit(hw_init::adc1_read(hw_init::ADC1_CH_MOISTURE))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_MOISTURE_ADC.load(Ordering::Relaxed)
    }
}

impl SamplePort for MoistureProbe {
    fn read_raw(&mut self) -> u16 {
        self.read_adc()
    }
}
