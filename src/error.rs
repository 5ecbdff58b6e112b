//! Error types for the acropalypse detector.
//!
//! Parsing errors are structured `thiserror` enums. They never cross the
//! single-file boundary as-is: [`crate::detect`] folds them into a
//! [`crate::detect::DetectFailure`] so a batch scan keeps going.

use crate::png::ChunkType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while examining a single file.
#[derive(Debug, Error)]
pub enum DetectError {
    /// Fewer than eight bytes were available for the signature.
    #[error("Stream too short for a PNG signature ({found} bytes)")]
    TooShort { found: usize },

    /// End of stream inside a chunk header, body or checksum.
    #[error("Truncated stream at offset {offset:#x}: missing {context}")]
    Truncated {
        offset: u64,
        context: &'static str,
    },

    /// Stored CRC-32 does not match the computed one.
    #[error(
        "CRC-32 mismatch in {chunk_type} chunk at offset {offset:#x}: stored {stored:#010x}, computed {computed:#010x}"
    )]
    ChecksumMismatch {
        chunk_type: ChunkType,
        offset: u64,
        stored: u32,
        computed: u32,
    },

    /// Stream ended cleanly on a chunk boundary without an IEND chunk.
    #[error("No IEND chunk before end of stream (offset {offset:#x})")]
    MissingEnd { offset: u64 },

    /// Trailing data exceeded the configured read limit.
    #[error("Trailer exceeds the read limit of {limit} bytes")]
    TrailerTooLarge { limit: u64 },

    /// File exceeded the configured size limit before parsing started.
    #[error("File size of {found} bytes exceeds the maximum allowed size of {limit} bytes")]
    FileTooLarge { limit: u64, found: u64 },

    /// Underlying read failure unrelated to the format.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectError {
    /// Stream offset the error refers to, when known.
    pub fn offset(&self) -> Option<u64> {
        match self {
            DetectError::Truncated { offset, .. }
            | DetectError::ChecksumMismatch { offset, .. }
            | DetectError::MissingEnd { offset } => Some(*offset),
            _ => None,
        }
    }
}

/// Errors loading a [`crate::config::DetectorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that stop a scan before any file is examined.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a file or directory: {0}")]
    Unsupported(PathBuf),

    #[error("Cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias for single-file detection.
pub type Result<T> = std::result::Result<T, DetectError>;
