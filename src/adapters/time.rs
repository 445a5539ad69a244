//! Blocking delay and uptime for the firmware tasks.
//!
//! - **`target_os = "espidf"`**: `std::thread::sleep` maps onto a FreeRTOS
//!   task delay, so a waiting task yields the core. Uptime wraps
//!   `esp_timer_get_time()`.
//! - **`not(target_os = "espidf")`**: the same sleep on the host thread,
//!   with `std::time::Instant` for uptime.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// [`DelayNs`] backed by the OS scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDelay;

impl SystemDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for SystemDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Monotonic uptime source.
pub struct Uptime {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Uptime {
    fn default() -> Self {
        Self::new()
    }
}

impl Uptime {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Seconds since boot.
    #[cfg(target_os = "espidf")]
    pub fn secs(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads the monotonic RTC counter.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000
    }

    /// Seconds since this source was created.
    #[cfg(not(target_os = "espidf"))]
    pub fn secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}
