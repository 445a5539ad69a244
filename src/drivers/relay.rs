//! Pump relay driver.
//!
//! A single digital output drives the relay coil (active HIGH). The driver
//! is a dumb actuator; the fixed-dwell rule lives in
//! [`PumpController`](crate::control::pump::PumpController).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct RelayDriver {
    gpio: i32,
    energized: bool,
    switch_count: u32,
}

impl RelayDriver {
    /// Starts de-energised and drives the pin low immediately.
    pub fn new(gpio: i32) -> Self {
        hw_init::gpio_write(gpio, false);
        Self {
            gpio,
            energized: false,
            switch_count: 0,
        }
    }

    pub fn set(&mut self, energized: bool) {
        hw_init::gpio_write(self.gpio, energized);
        if energized != self.energized {
            self.switch_count = self.switch_count.wrapping_add(1);
        }
        self.energized = energized;
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }

    /// Number of on/off transitions since boot.
    pub fn switch_count(&self) -> u32 {
        self.switch_count
    }
}
