//! Truncated and corrupted chunk streams must surface as errors.

use acropalypse::{detect, FailureKind, Verdict};
use std::io::Cursor;

use crate::common::*;

#[test]
fn truncated_after_ihdr_length_is_parse_error() {
    let png = PngBuilder::new().raw(&13u32.to_be_bytes()).build();
    let result = detect(Cursor::new(png));
    let failure = result.failure().expect("parse error");
    assert_eq!(failure.kind, FailureKind::Truncated);
    assert_eq!(failure.offset, Some(12));
}

#[test]
fn truncation_at_every_position_is_an_error() {
    let png = minimal_png();
    // Cut anywhere after the signature and before the end of IEND.
    for cut in 9..png.len() {
        let result = detect(Cursor::new(png[..cut].to_vec()));
        assert_eq!(result.verdict(), Verdict::Error, "cut at {cut}");
    }
}

#[test]
fn missing_iend_is_error_not_negative() {
    let png = PngBuilder::new().ihdr().idat(&[0; 4]).build();
    let failure = detect(Cursor::new(png.clone()))
        .failure()
        .cloned()
        .expect("missing IEND");
    assert_eq!(failure.kind, FailureKind::MissingEnd);
    assert_eq!(failure.offset, Some(png.len() as u64));
}

#[test]
fn missing_iend_with_phantom_looking_tail_is_not_flagged() {
    // Chunk-aligned stream whose last bytes look like an IEND footer but no
    // IEND type tag ever appears.
    let png = PngBuilder::new()
        .ihdr()
        .chunk(b"abcd", &[0, 0, 0, 0, 0xAE, 0x42, 0x60, 0x82])
        .build();
    assert!(detect(Cursor::new(png)).is_error());
}

#[test]
fn any_flipped_body_byte_is_checksum_error() {
    let png = minimal_png();
    // IDAT body starts after signature (8) + IHDR (25) + length/type (8).
    let idat_body = 8 + 25 + 8..8 + 25 + 8 + 10;
    for pos in idat_body {
        let mut corrupted = png.clone();
        corrupted[pos] ^= 0x01;
        let failure = detect(Cursor::new(corrupted))
            .failure()
            .cloned()
            .expect("checksum error");
        assert_eq!(failure.kind, FailureKind::ChecksumMismatch, "byte {pos}");
        assert_eq!(failure.offset, Some(8 + 25));
    }
}

#[test]
fn corrupted_crc_field_is_checksum_error() {
    let mut png = minimal_png();
    // Last byte of the IHDR CRC.
    png[8 + 25 - 1] ^= 0xFF;
    let failure = detect(Cursor::new(png)).failure().cloned().unwrap();
    assert_eq!(failure.kind, FailureKind::ChecksumMismatch);
    assert_eq!(failure.offset, Some(8));
}

#[test]
fn corrupted_vulnerable_file_is_never_flagged() {
    let mut png = cropped_over_original(128);
    png[8 + 8] ^= 0x80; // inside the IHDR body
    assert_eq!(detect(Cursor::new(png)).verdict(), Verdict::Error);
}
