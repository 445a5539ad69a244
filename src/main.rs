//! Humetron Firmware: Main Entry Point
//!
//! Hexagonal architecture on a single blocking control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          TelemetryReporter<UartWriter>        │
//! │  (Sample+Temp+Confirm     LogEventSink                         │
//! │   +Actuator+Indicator)    (EventSink fan-out)    SystemDelay   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlLoop (pure logic)                  │    │
//! │  │  Calibrator · MoistureClassifier · PumpController      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  BackgroundSampler thread ──PumpTrigger──▶ main task (opt.)    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};

use humetron::adapters::hardware::HardwareAdapter;
use humetron::adapters::log_sink::LogEventSink;
use humetron::adapters::time::{SystemDelay, Uptime};
use humetron::adapters::uart::UartWriter;
use humetron::app::service::{ControlLoop, DEVICE_NAME};
use humetron::config::{SamplingMode, SystemConfig};
use humetron::control::trigger::{spawn_sampler, BackgroundSampler, PumpTrigger};
use humetron::drivers::hw_init;
use humetron::pins;
use humetron::sensors::moisture::MoistureProbe;
use humetron::telemetry::reporter::TelemetryReporter;

fn init_hardware() -> humetron::error::Result<()> {
    hw_init::init_peripherals()?;
    Ok(())
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  {} v{}                      ║", DEVICE_NAME, env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = init_hardware() {
        // Peripheral init failure is critical: log and halt with the
        // relay still in its reset (off) state.
        error!("{}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration (build-time override or defaults) ────
    let config = SystemConfig::from_override(option_env!("HUMETRON_CONFIG"));
    info!(
        "Config: calibration={:?} encoding={:?} sampling={:?} period={}ms dwell={}ms",
        config.calibration_mode,
        config.telemetry_encoding,
        config.sampling_mode,
        config.sample_period_ms,
        config.pump_dwell_ms,
    );

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::from_pins();
    let mut delay = SystemDelay::new();
    let mut sink = (
        TelemetryReporter::new(UartWriter::new(), config.telemetry_encoding),
        LogEventSink::new(),
    );
    let uptime = Uptime::new();

    // ── 5. Startup calibration ────────────────────────────────
    let mut control = ControlLoop::new(config.clone());
    let calibration = control.start(&mut hw, &mut delay, &mut sink);
    info!("Calibration finished after {}s ({:?})", uptime.secs(), calibration.source);

    // ── 6. Control loop ───────────────────────────────────────
    match config.sampling_mode {
        SamplingMode::Inline => {
            info!("Entering control loop ({} ms period)", config.sample_period_ms);
            control.run(&mut hw, &mut delay, &mut sink)
        }
        SamplingMode::Background => {
            let trigger = Arc::new(PumpTrigger::new());
            let sampler = BackgroundSampler::new(
                MoistureProbe::new(pins::MOISTURE_ADC_GPIO),
                SystemDelay::new(),
                calibration.baseline,
                &config,
            );
            let _sampler = spawn_sampler(sampler, Arc::clone(&trigger))?;
            info!(
                "Entering triggered control loop ({} ms period, sampler every {} ms)",
                config.sample_period_ms, config.background_poll_ms
            );
            control.run_triggered(&trigger, &mut hw, &mut delay, &mut sink)
        }
    }
}
