//! Pull-based chunk reader over a byte stream.

use super::chunk::{chunk_crc, Chunk, ChunkHeader, ChunkType};
use crate::error::{DetectError, Result};
use crate::io::read_full;
use std::io::Read;
use tracing::{debug, warn};

/// Reads chunks one at a time from a stream positioned just after the
/// signature, verifying each chunk's CRC-32.
///
/// The iterator fuses after the first error. It never looks ahead: once the
/// caller stops pulling (e.g. after IEND), [`ChunkReader::into_inner`] returns
/// the stream positioned right after the last chunk read.
pub struct ChunkReader<R> {
    inner: R,
    offset: u64,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Wrap a stream; `offset` is the absolute position of the first chunk
    /// (8 after the signature) and is only used for error reporting.
    pub fn new(inner: R, offset: u64) -> Self {
        Self {
            inner,
            offset,
            done: false,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        let mut buf = [0u8; 4];
        let n = read_full(&mut self.inner, &mut buf)?;
        if n < buf.len() {
            return Err(DetectError::Truncated {
                offset: self.offset + n as u64,
                context,
            });
        }
        self.offset += 4;
        Ok(u32::from_be_bytes(buf))
    }

    fn read_chunk(&mut self) -> Result<Option<Chunk>> {
        let start = self.offset;

        let mut len_bytes = [0u8; 4];
        let n = read_full(&mut self.inner, &mut len_bytes)?;
        if n == 0 {
            return Ok(None);
        }
        if n < len_bytes.len() {
            return Err(DetectError::Truncated {
                offset: start + n as u64,
                context: "chunk length",
            });
        }
        self.offset += 4;
        let length = u32::from_be_bytes(len_bytes);

        let chunk_type = ChunkType(self.read_u32("chunk type")?.to_be_bytes());

        // `take` keeps a forged length from forcing a huge up-front allocation.
        let mut body = Vec::new();
        let got = (&mut self.inner).take(u64::from(length)).read_to_end(&mut body)?;
        self.offset += got as u64;
        if got < length as usize {
            return Err(DetectError::Truncated {
                offset: self.offset,
                context: "chunk body",
            });
        }

        let checksum = self.read_u32("chunk checksum")?;
        let computed = chunk_crc(chunk_type, &body);
        if computed != checksum {
            warn!(
                chunk_type = %chunk_type,
                offset = start,
                stored = checksum,
                computed,
                "Chunk CRC-32 mismatch"
            );
            return Err(DetectError::ChecksumMismatch {
                chunk_type,
                offset: start,
                stored: checksum,
                computed,
            });
        }

        debug!(chunk_type = %chunk_type, length, offset = start, "Read chunk");
        Ok(Some(Chunk {
            header: ChunkHeader { length, chunk_type },
            body,
            checksum,
        }))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
