//! PNG file signature check.

use crate::error::{DetectError, Result};
use crate::io::read_full;
use std::io::Read;
use tracing::trace;

/// The eight magic bytes every PNG stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Read exactly eight bytes and compare them with [`PNG_SIGNATURE`].
///
/// Returns `Ok(false)` on a mismatch. A stream that cannot supply eight bytes
/// is reported as [`DetectError::TooShort`] rather than a mismatch.
pub fn read_signature<R: Read>(reader: &mut R) -> Result<bool> {
    let mut magic = [0u8; 8];
    let n = read_full(reader, &mut magic)?;
    if n < magic.len() {
        return Err(DetectError::TooShort { found: n });
    }
    trace!(magic = ?magic, "Read signature");
    Ok(magic == PNG_SIGNATURE)
}
