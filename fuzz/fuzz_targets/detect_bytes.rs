#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let first = acropalypse::detect(Cursor::new(data));
    let second = acropalypse::detect(Cursor::new(data));
    assert_eq!(first, second);
});
