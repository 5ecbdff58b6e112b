//! Trailer handling after the first IEND.

use acropalypse::{detect, CleanReason, DetectionResult};
use std::io::Cursor;

use crate::common::*;

#[test]
fn short_trailers_are_not_vulnerable() {
    for len in 1..8u64 {
        let mut png = minimal_png();
        png.extend_from_slice(&PHANTOM_FOOTER[8 - len as usize..]);
        assert_eq!(
            detect(Cursor::new(png)),
            DetectionResult::NotVulnerable(CleanReason::ShortTrailer { len }),
            "len {len}"
        );
    }
}

#[test]
fn leftover_data_ending_in_footer_is_vulnerable() {
    let png = cropped_over_original(50_000);
    match detect(Cursor::new(png)) {
        DetectionResult::Vulnerable(trailer) => assert_eq!(trailer.len, 50_008),
        other => panic!("expected vulnerable, got {other:?}"),
    }
}

#[test]
fn chunks_after_iend_are_not_parsed() {
    // Only the first IEND terminates; a second full IEND chunk is folded into
    // the trailer as opaque bytes. Its last eight bytes are the type tag and
    // CRC, so the length field of the would-be footer is nonzero.
    let png = PngBuilder::new().ihdr().iend().iend().build();
    assert_eq!(
        detect(Cursor::new(png)),
        DetectionResult::NotVulnerable(CleanReason::NoPhantomFooter { len: 12 })
    );
}

#[test]
fn corrupt_chunks_after_iend_do_not_cause_errors() {
    let mut bad_chunk = chunk(b"IDAT", b"stale");
    let last = bad_chunk.len() - 1;
    bad_chunk[last] ^= 0xFF;

    let png = PngBuilder::new().ihdr().iend().raw(&bad_chunk).build();
    assert_eq!(
        detect(Cursor::new(png)),
        DetectionResult::NotVulnerable(CleanReason::NoPhantomFooter {
            len: bad_chunk.len() as u64
        })
    );
}

#[test]
fn footer_followed_by_padding_is_missed() {
    let mut png = cropped_over_original(256);
    png.extend_from_slice(&[0u8; 16]);
    assert_eq!(
        detect(Cursor::new(png)),
        DetectionResult::NotVulnerable(CleanReason::NoPhantomFooter { len: 256 + 8 + 16 })
    );
}

#[test]
fn identical_trailers_hash_identically() {
    let a = detect(Cursor::new(cropped_over_original(300)));
    let b = detect(Cursor::new(cropped_over_original(300)));
    let c = detect(Cursor::new(cropped_over_original(301)));
    match (a, b, c) {
        (
            DetectionResult::Vulnerable(a),
            DetectionResult::Vulnerable(b),
            DetectionResult::Vulnerable(c),
        ) => {
            assert_eq!(a.sha256, b.sha256);
            assert_ne!(a.sha256, c.sha256);
        }
        other => panic!("expected three vulnerable results, got {other:?}"),
    }
}
