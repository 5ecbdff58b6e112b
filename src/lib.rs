//! # acropalypse
//!
//! Detects PNG files affected by the "aCropalypse" class of bugs: an editor
//! overwrote a larger image in place with a smaller one and never truncated
//! the file, so bytes from the original image remain after the new `IEND`.
//!
//! The detector walks the chunk stream (checking every CRC-32) up to the
//! first `IEND` and then looks at whatever follows. A file is flagged only
//! when those trailing bytes end in a duplicated empty `IEND` footer, the
//! signature left behind by the original file.
//!
//! ```no_run
//! use acropalypse::{detect, DetectionResult};
//!
//! let file = std::fs::File::open("screenshot.png").unwrap();
//! match detect(file) {
//!     DetectionResult::Vulnerable(trailer) => println!("{} leftover bytes", trailer.len),
//!     DetectionResult::NotVulnerable(reason) => println!("clean: {reason:?}"),
//!     DetectionResult::Error(failure) => println!("could not tell: {failure}"),
//! }
//! ```
//!
//! For many files use [`scan::Scanner`], which filters by extension, walks
//! directories and can run detections on a rayon pool.

pub mod config;
pub mod detect;
pub mod error;
pub mod io;
pub mod logging;
pub mod png;
pub mod scan;

pub use config::{DetectorConfig, ScanConfig};
pub use detect::{
    detect, detect_with_limits, CleanReason, DetectFailure, DetectionResult, FailureKind,
    TrailerSummary, Verdict,
};
pub use error::{ConfigError, DetectError, ScanError};
pub use io::IOLimits;
pub use scan::{detect_path, FileReport, ScanCounts, ScanReport, Scanner};
