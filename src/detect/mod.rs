//! Single-stream detection: signature, chunk walk to the first IEND, and
//! trailer classification.
//!
//! Everything after the first IEND chunk is opaque trailer, even when it is
//! shaped like more chunks. Parsing past IEND would hide exactly the data
//! this detector is looking for.

pub mod result;
pub mod trailer;

pub use result::{CleanReason, DetectFailure, DetectionResult, FailureKind, TrailerSummary, Verdict};
pub use trailer::{classify_trailer, TrailerClass, MIN_TRAILER_LEN, PHANTOM_FOOTER_CRC};

use crate::error::{DetectError, Result};
use crate::io::{BoundedReader, IOLimits};
use crate::png::{read_signature, ChunkReader, PNG_SIGNATURE};
use sha2::{Digest, Sha256};
use std::io::Read;
use tracing::{debug, info};

/// Examine one stream with default limits.
///
/// The stream is consumed but not closed; the caller owns its lifecycle.
pub fn detect<R: Read>(stream: R) -> DetectionResult {
    detect_with_limits(stream, &IOLimits::default())
}

/// Examine one stream, buffering at most `limits.max_trailer_bytes` after IEND.
///
/// Never fails: every I/O and parse error becomes [`DetectionResult::Error`].
pub fn detect_with_limits<R: Read>(stream: R, limits: &IOLimits) -> DetectionResult {
    match run(stream, limits) {
        Ok(result) => result,
        Err(e) => {
            debug!(error = %e, "Detection failed");
            e.into()
        }
    }
}

fn run<R: Read>(mut stream: R, limits: &IOLimits) -> Result<DetectionResult> {
    match read_signature(&mut stream) {
        Ok(true) => {}
        Ok(false) | Err(DetectError::TooShort { .. }) => {
            debug!("Not a PNG stream");
            return Ok(DetectionResult::NotVulnerable(CleanReason::NotPng));
        }
        Err(e) => return Err(e),
    }

    let mut chunks = ChunkReader::new(stream, PNG_SIGNATURE.len() as u64);
    let mut found_end = false;
    for chunk in chunks.by_ref() {
        if chunk?.chunk_type().is_end() {
            found_end = true;
            break;
        }
    }
    if !found_end {
        return Err(DetectError::MissingEnd {
            offset: chunks.offset(),
        });
    }

    let trailer_offset = chunks.offset();
    let trailer = read_trailer(chunks.into_inner(), limits.max_trailer_bytes)?;
    let len = trailer.len() as u64;

    let result = match classify_trailer(&trailer) {
        TrailerClass::Empty => DetectionResult::NotVulnerable(CleanReason::NoTrailer),
        TrailerClass::TooShort => {
            DetectionResult::NotVulnerable(CleanReason::ShortTrailer { len })
        }
        TrailerClass::Unrecognized => {
            debug!(offset = trailer_offset, len, "Trailer without phantom IEND footer");
            DetectionResult::NotVulnerable(CleanReason::NoPhantomFooter { len })
        }
        TrailerClass::PhantomFooter => {
            info!(offset = trailer_offset, len, "Phantom IEND footer after end of image");
            DetectionResult::Vulnerable(TrailerSummary {
                offset: trailer_offset,
                len,
                sha256: hex::encode(Sha256::digest(&trailer)),
            })
        }
    };
    Ok(result)
}

/// Read everything left in the stream, refusing more than `limit` bytes.
fn read_trailer<R: Read>(stream: R, limit: u64) -> Result<Vec<u8>> {
    let mut reader = BoundedReader::new(stream, limit.saturating_add(1));
    let mut trailer = Vec::new();
    reader.read_to_end(&mut trailer)?;
    if trailer.len() as u64 > limit {
        return Err(DetectError::TrailerTooLarge { limit });
    }
    Ok(trailer)
}
