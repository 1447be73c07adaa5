//! Fuzz target: `NvsAdapter::load` on arbitrary stored blobs
//!
//! A corrupted or hostile NVS blob must surface as an error, never as a
//! panic or an out-of-range config.
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use phonebox::adapters::nvs::NvsAdapter;
use phonebox::app::ports::ConfigPort;

fuzz_target!(|data: &[u8]| {
    let Ok(nvs) = NvsAdapter::new() else {
        return;
    };
    nvs.sim_put_raw(data);
    if let Ok(cfg) = nvs.load() {
        assert!(cfg.validate().is_ok(), "load returned an invalid config");
    }
});
