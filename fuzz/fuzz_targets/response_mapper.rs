#![no_main]
use libfuzzer_sys::fuzz_target;
use webthumb_xml::{from_xml_str, Response};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = from_xml_str::<Response>(s);
    }
});
