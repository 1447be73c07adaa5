//! Fuzz target: BLE write → inbox → `LockController::drain_inbox`
//!
//! Arbitrary writes must never panic, and a rejected write must leave the
//! override state exactly as it was.
//!
//! cargo fuzz run fuzz_remote_message

#![no_main]

use libfuzzer_sys::fuzz_target;
use phonebox::adapters::ble::on_rx_write;
use phonebox::app::ports::{ActuatorPort, Colour, FeedbackPort, Tune};
use phonebox::app::service::LockController;
use phonebox::adapters::log_sink::LogEventSink;
use phonebox::config::LockboxConfig;
use phonebox::override_channel::OverrideInbox;

struct NullHw;

impl ActuatorPort for NullHw {
    fn lock(&mut self) {}
    fn unlock(&mut self) {}
}

impl FeedbackPort for NullHw {
    fn show(&mut self, _colour: Colour) {}
    fn play(&mut self, _tune: Tune) {}
}

fuzz_target!(|data: &[u8]| {
    let inbox = OverrideInbox::new();
    let mut ctl = LockController::new(&LockboxConfig::default());
    let mut sink = LogEventSink::new();

    // Split the input into successive writes on newline boundaries.
    for chunk in data.split_inclusive(|b| *b == b'\n') {
        let before = (ctl.override_active(), ctl.last_override(), ctl.state());
        on_rx_write(&inbox, chunk);
        if let Some(Err(_)) = ctl.drain_inbox(&inbox, &mut NullHw, &mut sink) {
            assert_eq!(before, (ctl.override_active(), ctl.last_override(), ctl.state()));
        }
    }
});
