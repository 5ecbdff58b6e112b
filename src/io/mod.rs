//! Bounded I/O helpers for examining untrusted files.
//!
//! Candidate files are opened with a size check, and every unbounded read
//! (the trailer after IEND) goes through a [`BoundedReader`] so a hostile
//! file cannot make the detector buffer more than the configured limit.

use crate::error::{DetectError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Resource limits for a single detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IOLimits {
    /// Largest file that will be opened at all.
    pub max_file_size: u64,
    /// Largest trailer that will be buffered after IEND.
    pub max_trailer_bytes: u64,
}

impl Default for IOLimits {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024,    // 100MB
            max_trailer_bytes: 64 * 1024 * 1024, // 64MB
        }
    }
}

/// A reader that stops yielding data after `limit` bytes.
pub struct BoundedReader<R> {
    inner: R,
    bytes_read: u64,
    limit: u64,
}

impl<R: Read> BoundedReader<R> {
    pub fn new(reader: R, limit: u64) -> Self {
        Self {
            inner: reader,
            bytes_read: 0,
            limit,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// True once the limit has been consumed; further reads return EOF.
    pub fn hit_limit(&self) -> bool {
        self.bytes_read >= self.limit
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.bytes_read >= self.limit {
            debug!("BoundedReader reached limit of {} bytes", self.limit);
            return Ok(0);
        }

        let remaining = self.limit - self.bytes_read;
        let max_to_read = std::cmp::min(buf.len() as u64, remaining) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Fill `buf` as far as the stream allows.
///
/// Unlike `read_exact`, a short stream is not an error: the number of bytes
/// actually read is returned so callers can tell "nothing left" from
/// "stopped part way".
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Open a candidate file for reading, refusing files over `max_file_size`.
///
/// The returned handle is owned by the caller and closed when dropped.
pub fn open_candidate<P: AsRef<Path>>(path: P, limits: &IOLimits) -> Result<File> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let size = file.metadata()?.len();

    debug!(
        path = %path.display(),
        size,
        limits.max_file_size = limits.max_file_size,
        "Opening candidate file"
    );

    if size > limits.max_file_size {
        warn!(
            path = %path.display(),
            size,
            limit = limits.max_file_size,
            "File is too large"
        );
        return Err(DetectError::FileTooLarge {
            limit: limits.max_file_size,
            found: size,
        });
    }

    Ok(file)
}
