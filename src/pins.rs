//! GPIO / peripheral pin assignments for the Humetron controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Pump relay
// ---------------------------------------------------------------------------

/// Digital output: relay coil driving the pump (active HIGH).
pub const RELAY_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Activity LED, lit for as long as the firmware is running.
pub const ACTIVITY_LED_GPIO: i32 = 18;
/// On-board LED, blinks while a calibration phase waits for confirmation.
pub const BOARD_LED_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Momentary confirm button, pulled down, HIGH while pressed.
pub const CONFIRM_BUTTON_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive soil moisture probe. ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const MOISTURE_ADC_GPIO: i32 = 5;
/// Ambient temperature sensor. ADC1 channel 5 (GPIO 6 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Telemetry UART
// ---------------------------------------------------------------------------

/// UART port carrying telemetry frames to the logging host.
pub const TELEMETRY_UART_PORT: i32 = 1;
pub const TELEMETRY_UART_TX_GPIO: i32 = 4;
pub const TELEMETRY_UART_RX_GPIO: i32 = 7;
pub const TELEMETRY_UART_BAUD: i32 = 115_200;
