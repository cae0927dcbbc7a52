#![no_main]
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let now = Utc.timestamp_opt(1_750_000_000, 0).unwrap();
        let document = bcbp::decode_at(text, None, now);
        if document.valid {
            assert_eq!(Some(document.legs.len()), document.leg_count.map(usize::from));
        }
    }
});
