//! Fuzz target: `NvsEventLog` recovery from corrupted flash
//!
//! Plants arbitrary bytes in the counter and slot keys, then opens and
//! reads the log.  Opening must clamp the recovered count to capacity and
//! reading must skip undecodable slots rather than panic.
//!
//! cargo fuzz run fuzz_event_log

#![no_main]

use critical_section as _;
use libfuzzer_sys::fuzz_target;
use superlights::adapters::event_log::NvsEventLog;
use superlights::adapters::nvs::NvsAdapter;
use superlights::app::ports::{EventLogPort, StoragePort};

fuzz_target!(|data: &[u8]| {
    let Ok(mut nvs) = NvsAdapter::new() else {
        return;
    };
    let (counter, slots) = data.split_at(data.len().min(4));
    let _ = nvs.write("activity", "count", counter);
    for (i, chunk) in slots.chunks(24).enumerate().take(8) {
        let _ = nvs.write("activity", &format!("e{}", i), chunk);
    }

    let mut log = NvsEventLog::open(nvs, 8);
    assert!(log.len() <= log.capacity());
    for line in log.read_all() {
        assert!(line.len() <= 64);
    }
    let _ = log.append("time: 00:00:00 - Power on");
    assert!(log.len() <= 8);
});
