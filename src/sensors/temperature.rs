//! Ambient temperature from a secondary analog channel.
//!
//! Uses the fixed linear transfer of the on-die style sensor:
//! `T = 27 - (V - 0.706) / 0.001721`, with `V` derived from the 16-bit
//! normalised code against a 3.3 V reference.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH5 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use crate::app::ports::TemperaturePort;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::sensors::moisture::widen_12bit;

// 0.706 V at 27 °C → 14020 counts.
static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(14_020);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_raw(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

const V_REF: f32 = 3.3;
const FULL_SCALE: f32 = 65_535.0;
const V_AT_27C: f32 = 0.706;
const SLOPE_V_PER_C: f32 = 0.001_721;

/// Convert a 16-bit normalised code to degrees Celsius.
pub fn raw_to_celsius(raw: u16) -> f32 {
    let voltage = f32::from(raw) * V_REF / FULL_SCALE;
    27.0 - (voltage - V_AT_27C) / SLOPE_V_PER_C
}

pub struct TemperatureSensor {
    /// `None` when the board has no temperature channel fitted.
    adc_gpio: Option<i32>,
}

impl TemperatureSensor {
    pub fn new(adc_gpio: Option<i32>) -> Self {
        Self { adc_gpio }
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        widen_12bit(hw_init::adc1_read(hw_init::ADC1_CH_TEMP))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_TEMP_ADC.load(Ordering::Relaxed)
    }
}

impl TemperaturePort for TemperatureSensor {
    fn read_celsius(&mut self) -> Option<f32> {
        self.adc_gpio?;
        Some(raw_to_celsius(self.read_adc()))
    }
}
