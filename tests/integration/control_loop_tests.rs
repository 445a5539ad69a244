//! End-to-end control loop: boot, calibrate, sample, actuate, report.

use humetron::app::events::TelemetryEvent;
use humetron::app::service::ControlLoop;
use humetron::config::{CalibrationMode, SystemConfig, TelemetryEncoding};
use humetron::control::calibration::CalibrationBaseline;
use humetron::control::classifier::MoistureLevel;
use humetron::control::pump::PumpState;
use humetron::control::trigger::{BackgroundSampler, PumpTrigger};
use humetron::telemetry::reporter::TelemetryReporter;

use crate::mock_hw::{HwCall, MockHardware, RecordingSink, SimClock, SimDelay, Wire};

fn default_mode() -> SystemConfig {
    SystemConfig {
        calibration_mode: CalibrationMode::Default,
        ..SystemConfig::default()
    }
}

struct Rig {
    clock: SimClock,
    hw: MockHardware,
    delay: SimDelay,
    wire: Wire,
    sink: (TelemetryReporter<Wire>, RecordingSink),
}

impl Rig {
    fn new(encoding: TelemetryEncoding) -> Self {
        let clock = SimClock::default();
        let wire = Wire::default();
        Self {
            hw: MockHardware::new(&clock),
            delay: SimDelay::new(&clock),
            sink: (TelemetryReporter::new(wire.clone(), encoding), RecordingSink::default()),
            wire,
            clock,
        }
    }

    fn events(&self) -> &[TelemetryEvent] {
        &self.sink.1.events
    }
}

#[test]
fn boot_lights_activity_and_forces_relay_off_before_calibrating() {
    let mut rig = Rig::new(TelemetryEncoding::Plain);
    let mut control = ControlLoop::new(default_mode());
    control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);

    assert_eq!(rig.hw.calls[0], (0, HwCall::Activity(true)));
    assert_eq!(rig.hw.calls[1], (0, HwCall::Pump(false)));
    assert!(control.calibration().is_some());
    assert_eq!(control.baseline(), CalibrationBaseline::from_pair(51_600.0, 25_000.0));
    assert_eq!(rig.wire.text(), "AIR 51600-WATER 25000-");
}

#[test]
fn dry_soil_runs_exactly_one_dwell() {
    let mut rig = Rig::new(TelemetryEncoding::Plain);
    rig.hw.moisture_from(0, 50_000);
    let mut control = ControlLoop::new(default_mode());
    control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);

    let result = control.tick(&mut rig.hw, &mut rig.delay, &mut rig.sink).unwrap();

    assert_eq!(result.level, MoistureLevel::Dry);
    // Three reads with 100 ms settle each, then a 5 s dwell.
    assert_eq!(rig.hw.pump_writes(), vec![(0, false), (300, true), (5_300, false)]);
    assert_eq!(rig.clock.now_ms(), 5_300);
    assert_eq!(control.pump().state(), PumpState::Idle);
    assert_eq!(
        rig.wire.text(),
        "AIR 51600-WATER 25000-M 50000 DRY_SOIL-PUMP_ON-PUMP_OFF-"
    );
}

#[test]
fn wet_and_normal_soil_leave_the_relay_alone() {
    for (raw, level, frame) in [
        (30_000, MoistureLevel::Wet, "M 30000 WET_SOIL-"),
        (40_000, MoistureLevel::Normal, "M 40000 NORMAL_SOIL-"),
        (60_000, MoistureLevel::SuperWet, "M 60000 SUPER_WET_SOIL-"),
    ] {
        let mut rig = Rig::new(TelemetryEncoding::Plain);
        rig.hw.moisture_from(0, raw);
        let mut control = ControlLoop::new(default_mode());
        control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);

        let result = control.tick(&mut rig.hw, &mut rig.delay, &mut rig.sink).unwrap();

        assert_eq!(result.level, level);
        assert_eq!(rig.hw.pump_writes(), vec![(0, false)]);
        assert!(rig.wire.text().ends_with(frame), "{}", rig.wire.text());
        assert!(!rig.events().contains(&TelemetryEvent::PumpStarted));
    }
}

#[test]
fn periodic_cycles_pump_once_per_dry_sample() {
    let mut rig = Rig::new(TelemetryEncoding::Plain);
    rig.hw.moisture_from(0, 50_000).moisture_from(40_000, 30_000);
    let config = default_mode();
    let period = config.sample_period_ms;
    let mut control = ControlLoop::new(config);
    control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);

    for _ in 0..3 {
        control.tick(&mut rig.hw, &mut rig.delay, &mut rig.sink);
        embedded_hal::delay::DelayNs::delay_ms(&mut rig.delay, period);
    }

    // Cycle 1 at t=0 is dry; cycle 2 starts at 35.3 s, still dry; cycle 3
    // starts at 70.6 s, by which time the soil is wet.
    assert_eq!(control.pump().cycles(), 2);
    assert_eq!(control.tick_count(), 3);
    assert!(!rig.hw.pump_on());
    let starts = rig.events().iter().filter(|e| **e == TelemetryEvent::PumpStarted).count();
    let stops = rig.events().iter().filter(|e| **e == TelemetryEvent::PumpStopped).count();
    assert_eq!((starts, stops), (2, 2));
}

#[test]
fn structured_encoding_reports_percentage_and_temperature() {
    let mut rig = Rig::new(TelemetryEncoding::Structured);
    rig.hw.moisture_from(0, 25_800);
    rig.hw.temperature = Some(24.5);
    let config = SystemConfig {
        telemetry_encoding: TelemetryEncoding::Structured,
        ..default_mode()
    };
    let mut control = ControlLoop::new(config);
    control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);

    let result = control.tick(&mut rig.hw, &mut rig.delay, &mut rig.sink).unwrap();
    assert_eq!(result.percentage, Some(50.0));

    let text = rig.wire.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    let sample: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(sample["moisture"], 50.0);
    assert_eq!(sample["level"], "WET_SOIL");
    assert_eq!(sample["temp"], 24.5);
}

#[test]
fn zero_readings_skip_the_cycle() {
    let mut rig = Rig::new(TelemetryEncoding::Plain);
    rig.hw.moisture_from(0, 50_000);
    let config = SystemConfig {
        readings_per_sample: 0,
        ..default_mode()
    };
    let mut control = ControlLoop::new(config);
    control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);
    let before = rig.events().len();

    assert!(control.tick(&mut rig.hw, &mut rig.delay, &mut rig.sink).is_none());
    assert_eq!(rig.events().len(), before);
    assert_eq!(rig.hw.reads, 0);
    assert_eq!(rig.hw.pump_writes(), vec![(0, false)]);
}

#[test]
fn triggered_cycle_consumes_the_sample_once() {
    let mut rig = Rig::new(TelemetryEncoding::Plain);
    let config = default_mode();
    let mut control = ControlLoop::new(config.clone());
    let cal = control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);

    let sampler_clock = SimClock::default();
    let mut sampler_hw = MockHardware::new(&sampler_clock);
    sampler_hw.moisture_from(0, 50_000);
    let mut sampler = BackgroundSampler::new(sampler_hw, SimDelay::new(&sampler_clock), cal.baseline, &config);
    let trigger = PumpTrigger::new();

    // Several dry samples before the main task looks collapse into one.
    for _ in 0..5 {
        sampler.step(&trigger);
    }

    let first = control.tick_triggered(&trigger, &mut rig.hw, &mut rig.delay, &mut rig.sink);
    assert_eq!(first.map(|r| r.level), Some(MoistureLevel::Dry));
    assert_eq!(control.pump().cycles(), 1);

    let second = control.tick_triggered(&trigger, &mut rig.hw, &mut rig.delay, &mut rig.sink);
    assert!(second.is_none());
    assert_eq!(control.pump().cycles(), 1);
    assert_eq!(rig.hw.pump_writes(), vec![(0, false), (0, true), (5_000, false)]);
    assert!(rig.wire.text().ends_with("M 50000 DRY_SOIL-PUMP_ON-PUMP_OFF-"));
}

#[test]
fn triggered_cycles_report_wet_samples_without_pumping() {
    let mut rig = Rig::new(TelemetryEncoding::Plain);
    let config = default_mode();
    let mut control = ControlLoop::new(config.clone());
    let cal = control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);

    let sampler_clock = SimClock::default();
    let mut sampler_hw = MockHardware::new(&sampler_clock);
    sampler_hw.moisture_from(0, 30_000);
    let mut sampler = BackgroundSampler::new(sampler_hw, SimDelay::new(&sampler_clock), cal.baseline, &config);
    let trigger = PumpTrigger::new();

    for _ in 0..10 {
        sampler.step(&trigger);
        let reported = control.tick_triggered(&trigger, &mut rig.hw, &mut rig.delay, &mut rig.sink);
        assert_eq!(reported.map(|r| r.level), Some(MoistureLevel::Wet));
    }

    let samples = rig
        .events()
        .iter()
        .filter(|e| matches!(e, TelemetryEvent::MoistureSample { level: MoistureLevel::Wet, .. }))
        .count();
    assert_eq!(samples, 10);
    assert_eq!(control.pump().cycles(), 0);
    assert_eq!(rig.hw.pump_writes(), vec![(0, false)]);
}

#[test]
fn pending_dry_sample_still_pumps_after_soil_reads_wet() {
    let mut rig = Rig::new(TelemetryEncoding::Plain);
    let config = default_mode();
    let mut control = ControlLoop::new(config.clone());
    let cal = control.start(&mut rig.hw, &mut rig.delay, &mut rig.sink);

    let sampler_clock = SimClock::default();
    let mut sampler_hw = MockHardware::new(&sampler_clock);
    sampler_hw.moisture_from(0, 50_000);
    // The first step's three readings end at 300 ms.
    sampler_hw.moisture_from(300, 30_000);
    let mut sampler = BackgroundSampler::new(sampler_hw, SimDelay::new(&sampler_clock), cal.baseline, &config);
    let trigger = PumpTrigger::new();

    sampler.step(&trigger);
    sampler.step(&trigger);

    let reported = control.tick_triggered(&trigger, &mut rig.hw, &mut rig.delay, &mut rig.sink);
    assert_eq!(reported.map(|r| r.level), Some(MoistureLevel::Wet));
    assert_eq!(control.pump().cycles(), 1);
}
