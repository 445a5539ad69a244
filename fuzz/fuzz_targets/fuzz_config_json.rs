//! Fuzz target: `SystemConfig::from_json`
//!
//! Feeds arbitrary bytes to the build-time override parser and verifies:
//! - No panics under arbitrary input
//! - Anything accepted passes `validate()` and derives a usable baseline
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use humetron::config::SystemConfig;
use humetron::control::calibration::Calibrator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = SystemConfig::from_json(text) {
        assert!(config.validate().is_ok());
        let baseline = Calibrator::new(&config).default_baseline();
        assert!(baseline.interval() >= config.min_interval);
        assert!(config.readings_per_sample >= 1);
    }
});
