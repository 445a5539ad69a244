//! Startup calibration against the simulated board.
//!
//! Default timings: one reading per iteration, 100 ms settle, 50 ms blink,
//! so each calibration iteration is 150 ms and the button is sampled at
//! the end of it.

use humetron::app::events::{Reference, TelemetryEvent};
use humetron::config::{CalibrationMode, SystemConfig};
use humetron::control::calibration::{BaselineSource, Calibrator};

use crate::mock_hw::{HwCall, MockHardware, RecordingSink, SimClock, SimDelay};

fn reported(sink: &RecordingSink) -> Vec<(Reference, f32)> {
    sink.events
        .iter()
        .filter_map(|e| match *e {
            TelemetryEvent::CalibrationReported { reference, value } => Some((reference, value)),
            _ => None,
        })
        .collect()
}

#[test]
fn manual_calibration_locks_the_last_average_of_each_phase() {
    let clock = SimClock::default();
    let mut hw = MockHardware::new(&clock);
    hw.moisture_from(0, 52_000)
        .moisture_from(2_500, 24_000)
        .press(1_000, 1_400)
        .press(3_000, 3_400);
    let mut delay = SimDelay::new(&clock);
    let mut sink = RecordingSink::default();

    let cal = Calibrator::new(&SystemConfig::default()).calibrate(&mut hw, &mut delay, &mut sink);

    assert_eq!(cal.source, BaselineSource::Measured);
    assert_eq!(cal.baseline.air(), 52_000.0);
    assert_eq!(cal.baseline.water(), 24_000.0);
    assert!((cal.baseline.interval() - 9_333.333).abs() < 0.01);
    assert_eq!(
        reported(&sink),
        vec![(Reference::Air, 52_000.0), (Reference::Water, 24_000.0)]
    );
    assert_eq!(clock.now_ms(), 3_200);
}

#[test]
fn indicator_blinks_then_holds_between_phases() {
    let clock = SimClock::default();
    let mut hw = MockHardware::new(&clock);
    hw.moisture_from(0, 52_000)
        .moisture_from(2_500, 24_000)
        .press(1_000, 1_400)
        .press(3_000, 3_400);
    let mut delay = SimDelay::new(&clock);

    Calibrator::new(&SystemConfig::default()).calibrate(&mut hw, &mut delay, &mut RecordingSink::default());

    // 8 iterations in the air phase, 10 in the water phase.
    assert_eq!(hw.toggles(), 18);
    let solid: Vec<_> = hw
        .calls
        .iter()
        .filter(|(_, c)| matches!(c, HwCall::Board(_)))
        .copied()
        .collect();
    assert_eq!(solid, vec![(1_200, HwCall::Board(true)), (3_200, HwCall::Board(false))]);
}

#[test]
fn one_long_press_cannot_confirm_both_phases() {
    let clock = SimClock::default();
    let mut hw = MockHardware::new(&clock);
    hw.moisture_from(0, 52_000)
        .moisture_from(5_500, 24_000)
        .press(1_000, 5_000)
        .press(6_000, 6_300);
    let mut delay = SimDelay::new(&clock);

    let cal = Calibrator::new(&SystemConfig::default()).calibrate(
        &mut hw,
        &mut delay,
        &mut RecordingSink::default(),
    );

    assert!(clock.now_ms() >= 6_200, "water phase ended at {}", clock.now_ms());
    assert_eq!(cal.baseline.water(), 24_000.0);
}

#[test]
fn narrow_measurement_reports_the_defaults() {
    let clock = SimClock::default();
    let mut hw = MockHardware::new(&clock);
    hw.moisture_from(0, 26_000)
        .moisture_from(2_500, 25_500)
        .press(1_000, 1_400)
        .press(3_000, 3_400);
    let mut delay = SimDelay::new(&clock);
    let mut sink = RecordingSink::default();

    let cal = Calibrator::new(&SystemConfig::default()).calibrate(&mut hw, &mut delay, &mut sink);

    assert_eq!(cal.source, BaselineSource::Substituted);
    assert_eq!(
        reported(&sink),
        vec![(Reference::Air, 51_600.0), (Reference::Water, 25_000.0)]
    );
}

#[test]
fn inverted_measurement_reports_the_defaults() {
    let clock = SimClock::default();
    let mut hw = MockHardware::new(&clock);
    hw.moisture_from(0, 25_000)
        .moisture_from(2_500, 51_600)
        .press(1_000, 1_400)
        .press(3_000, 3_400);
    let mut delay = SimDelay::new(&clock);

    let cal = Calibrator::new(&SystemConfig::default()).calibrate(
        &mut hw,
        &mut delay,
        &mut RecordingSink::default(),
    );

    assert_eq!(cal.source, BaselineSource::Substituted);
    assert_eq!(cal.baseline.air(), 51_600.0);
}

#[test]
fn default_mode_skips_sensing() {
    let clock = SimClock::default();
    let mut hw = MockHardware::new(&clock);
    let mut delay = SimDelay::new(&clock);
    let mut sink = RecordingSink::default();
    let config = SystemConfig {
        calibration_mode: CalibrationMode::Default,
        ..SystemConfig::default()
    };

    let cal = Calibrator::new(&config).calibrate(&mut hw, &mut delay, &mut sink);

    assert_eq!(cal.source, BaselineSource::Defaulted);
    assert_eq!(hw.reads, 0);
    assert_eq!(hw.toggles(), 0);
    assert_eq!(clock.now_ms(), 0);
    assert_eq!(
        reported(&sink),
        vec![(Reference::Air, 51_600.0), (Reference::Water, 25_000.0)]
    );
}
