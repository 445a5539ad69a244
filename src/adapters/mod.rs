//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                     | Connects to          |
//! |-------------|--------------------------------|----------------------|
//! | `hardware`  | SamplePort, TemperaturePort    | ESP32 ADC1           |
//! |             | ConfirmPort                    | GPIO input           |
//! |             | ActuatorPort, IndicatorPort    | GPIO outputs         |
//! | `log_sink`  | EventSink                      | Serial log output    |
//! | `time`      | embedded-hal `DelayNs`         | FreeRTOS task delay  |
//! | `uart`      | FrameWriter                    | Telemetry UART       |

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod uart;
