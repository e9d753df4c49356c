#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate rootwalk;

fuzz_target!(|data: &[u8]| {
    // Any input must decode or be rejected cleanly. What decodes must also
    // be printable, and its questions encodable or rejected.
    if let Ok(m) = rootwalk::Message::from_slice(data) {
        let _ = m.to_string();
        for q in &m.questions {
            let mut buf = Vec::new();
            let _ = q.write(&mut buf);
        }
    }
});
