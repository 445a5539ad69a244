//! Calibration confirm button.
//!
//! Momentary switch to 3V3 with the internal pull-down enabled: the input
//! reads HIGH only while the button is held. The driver reports the raw
//! level; debouncing and the press-then-release gesture belong to
//! [`ConfirmGate`](crate::control::calibration::ConfirmGate).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: polls the GPIO level via hw_init.
//! On host/test: reads from a static `AtomicBool` for injection.

use core::sync::atomic::AtomicBool;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use crate::app::ports::ConfirmPort;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_BUTTON_HELD: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_button_held(held: bool) {
    SIM_BUTTON_HELD.store(held, Ordering::Relaxed);
}

pub struct ConfirmButton {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    gpio: i32,
}

impl ConfirmButton {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    #[cfg(target_os = "espidf")]
    fn level(&self) -> bool {
        hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn level(&self) -> bool {
        SIM_BUTTON_HELD.load(Ordering::Relaxed)
    }
}

impl ConfirmPort for ConfirmButton {
    fn is_asserted(&mut self) -> bool {
        self.level()
    }
}
