#![no_main]
use acropalypse::png::ChunkReader;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let mut reader = ChunkReader::new(Cursor::new(data), 8);
    for chunk in reader.by_ref() {
        match chunk {
            Ok(chunk) => assert!(chunk.crc_matches()),
            Err(_) => break,
        }
    }
    // Fused after an error or a clean end.
    assert!(reader.next().is_none());
    assert!(reader.offset() <= data.len() as u64 + 8);
});
