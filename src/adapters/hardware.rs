//! Hardware adapter: bridges real peripherals to the domain port traits.
//!
//! Owns the probe, the temperature channel, the confirm button, the relay,
//! and both LEDs, exposing them through the sensor, input, actuator, and
//! indicator ports. This is the only module the control loop reaches
//! hardware through. On non-espidf targets the drivers fall back to their
//! simulation stubs.

use crate::app::ports::{ActuatorPort, ConfirmPort, IndicatorPort, SamplePort, TemperaturePort};
use crate::drivers::button::ConfirmButton;
use crate::drivers::indicator::Led;
use crate::drivers::relay::RelayDriver;
use crate::pins;
use crate::sensors::moisture::MoistureProbe;
use crate::sensors::temperature::TemperatureSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    probe: MoistureProbe,
    temperature: TemperatureSensor,
    button: ConfirmButton,
    relay: RelayDriver,
    activity_led: Led,
    board_led: Led,
}

impl HardwareAdapter {
    pub fn new(
        probe: MoistureProbe,
        temperature: TemperatureSensor,
        button: ConfirmButton,
        relay: RelayDriver,
        activity_led: Led,
        board_led: Led,
    ) -> Self {
        Self {
            probe,
            temperature,
            button,
            relay,
            activity_led,
            board_led,
        }
    }

    /// Adapter wired to the board's default pin map.
    pub fn from_pins() -> Self {
        Self::new(
            MoistureProbe::new(pins::MOISTURE_ADC_GPIO),
            TemperatureSensor::new(Some(pins::TEMP_ADC_GPIO)),
            ConfirmButton::new(pins::CONFIRM_BUTTON_GPIO),
            RelayDriver::new(pins::RELAY_GPIO),
            Led::new(pins::ACTIVITY_LED_GPIO),
            Led::new(pins::BOARD_LED_GPIO),
        )
    }
}

// ── Sensor and input ports ────────────────────────────────────

impl SamplePort for HardwareAdapter {
    fn read_raw(&mut self) -> u16 {
        self.probe.read_raw()
    }
}

impl TemperaturePort for HardwareAdapter {
    fn read_celsius(&mut self) -> Option<f32> {
        self.temperature.read_celsius()
    }
}

impl ConfirmPort for HardwareAdapter {
    fn is_asserted(&mut self) -> bool {
        self.button.is_asserted()
    }
}

// ── Output ports ──────────────────────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_pump(&mut self, energized: bool) {
        self.relay.set(energized);
    }
}

impl IndicatorPort for HardwareAdapter {
    fn set_activity(&mut self, on: bool) {
        self.activity_led.set(on);
    }

    fn set_board(&mut self, on: bool) {
        self.board_led.set(on);
    }

    fn toggle_board(&mut self) {
        self.board_led.toggle();
    }
}
