//! Per-file detection outcomes.

use crate::error::DetectError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state summary of a [`DetectionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Vulnerable,
    NotVulnerable,
    Error,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Vulnerable => write!(f, "vulnerable"),
            Verdict::NotVulnerable => write!(f, "not vulnerable"),
            Verdict::Error => write!(f, "error"),
        }
    }
}

/// Location and fingerprint of the bytes found after IEND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerSummary {
    /// Offset of the first trailer byte within the file.
    pub offset: u64,
    /// Trailer length in bytes.
    pub len: u64,
    /// SHA-256 of the trailer bytes, hex encoded.
    pub sha256: String,
}

/// Why a file was judged not vulnerable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanReason {
    /// Stream does not start with the PNG signature.
    NotPng,
    /// Nothing follows IEND.
    NoTrailer,
    /// Fewer than eight bytes follow IEND.
    ShortTrailer { len: u64 },
    /// Trailer does not end in a phantom IEND footer.
    NoPhantomFooter { len: u64 },
}

/// Kinds of per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Truncated,
    ChecksumMismatch,
    MissingEnd,
    TooLarge,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Truncated => write!(f, "truncated"),
            FailureKind::ChecksumMismatch => write!(f, "checksum mismatch"),
            FailureKind::MissingEnd => write!(f, "missing IEND"),
            FailureKind::TooLarge => write!(f, "too large"),
            FailureKind::Io => write!(f, "I/O error"),
        }
    }
}

/// Comparable, serialisable form of a [`DetectError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectFailure {
    pub kind: FailureKind,
    pub message: String,
    pub offset: Option<u64>,
}

impl DetectFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            offset: None,
        }
    }
}

impl fmt::Display for DetectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<&DetectError> for DetectFailure {
    fn from(err: &DetectError) -> Self {
        let kind = match err {
            // Only reachable if a caller bypasses `detect`, which maps it to NotPng.
            DetectError::TooShort { .. } => FailureKind::Truncated,
            DetectError::Truncated { .. } => FailureKind::Truncated,
            DetectError::ChecksumMismatch { .. } => FailureKind::ChecksumMismatch,
            DetectError::MissingEnd { .. } => FailureKind::MissingEnd,
            DetectError::TrailerTooLarge { .. } | DetectError::FileTooLarge { .. } => {
                FailureKind::TooLarge
            }
            DetectError::Io(_) => FailureKind::Io,
        };
        Self {
            kind,
            message: err.to_string(),
            offset: err.offset(),
        }
    }
}

impl From<DetectError> for DetectFailure {
    fn from(err: DetectError) -> Self {
        Self::from(&err)
    }
}

/// Outcome of examining one stream.
///
/// Errors are kept apart from clean negatives so callers can tell
/// "confirmed safe" from "could not determine".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum DetectionResult {
    Vulnerable(TrailerSummary),
    NotVulnerable(CleanReason),
    Error(DetectFailure),
}

impl DetectionResult {
    pub fn verdict(&self) -> Verdict {
        match self {
            DetectionResult::Vulnerable(_) => Verdict::Vulnerable,
            DetectionResult::NotVulnerable(_) => Verdict::NotVulnerable,
            DetectionResult::Error(_) => Verdict::Error,
        }
    }

    pub fn is_vulnerable(&self) -> bool {
        matches!(self, DetectionResult::Vulnerable(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DetectionResult::Error(_))
    }

    pub fn is_not_png(&self) -> bool {
        matches!(self, DetectionResult::NotVulnerable(CleanReason::NotPng))
    }

    pub fn failure(&self) -> Option<&DetectFailure> {
        match self {
            DetectionResult::Error(f) => Some(f),
            _ => None,
        }
    }
}

impl From<DetectError> for DetectionResult {
    fn from(err: DetectError) -> Self {
        DetectionResult::Error(err.into())
    }
}
