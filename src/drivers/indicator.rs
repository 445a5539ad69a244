//! Indicator LEDs.
//!
//! Two plain GPIO LEDs: the activity LED is lit for as long as the firmware
//! runs, and the board LED gives calibration feedback (blinking while a
//! phase waits, solid between phases).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIOs via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct Led {
    gpio: i32,
    lit: bool,
}

impl Led {
    pub fn new(gpio: i32) -> Self {
        hw_init::gpio_write(gpio, false);
        Self { gpio, lit: false }
    }

    pub fn set(&mut self, lit: bool) {
        hw_init::gpio_write(self.gpio, lit);
        self.lit = lit;
    }

    pub fn toggle(&mut self) {
        self.set(!self.lit);
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
