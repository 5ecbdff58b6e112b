//! Batch scanning: candidate discovery and per-file detection.
//!
//! Each file is opened, examined and closed inside [`detect_path`]. Failures
//! on one file are recorded in its [`FileReport`] and never stop the scan.

use crate::config::DetectorConfig;
use crate::detect::{detect_with_limits, CleanReason, DetectFailure, DetectionResult, FailureKind};
use crate::error::ScanError;
use crate::io::{open_candidate, IOLimits};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};
use walkdir::WalkDir;

/// Result for one candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: DetectionResult,
}

/// Tallies over a [`ScanReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCounts {
    /// Candidates examined, including non-PNG ones.
    pub scanned: usize,
    pub vulnerable: usize,
    /// PNG files confirmed not vulnerable.
    pub clean: usize,
    /// Candidates that were not PNG streams.
    pub not_png: usize,
    pub errors: usize,
}

/// Results of a scan, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
}

impl ScanReport {
    pub fn vulnerable(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.result.is_vulnerable())
    }

    pub fn errors(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.result.is_error())
    }

    pub fn counts(&self) -> ScanCounts {
        let mut counts = ScanCounts {
            scanned: self.files.len(),
            ..ScanCounts::default()
        };
        for file in &self.files {
            match &file.result {
                DetectionResult::Vulnerable(_) => counts.vulnerable += 1,
                DetectionResult::NotVulnerable(CleanReason::NotPng) => counts.not_png += 1,
                DetectionResult::NotVulnerable(_) => counts.clean += 1,
                DetectionResult::Error(_) => counts.errors += 1,
            }
        }
        counts
    }
}

/// Open `path`, run detection and close it again.
pub fn detect_path(path: &Path, limits: &IOLimits) -> DetectionResult {
    let _span = info_span!("detect", path = %path.display()).entered();
    let result = match open_candidate(path, limits) {
        Ok(file) => detect_with_limits(file, limits),
        Err(e) => e.into(),
    };
    match &result {
        DetectionResult::Vulnerable(trailer) => {
            info!(trailer_len = trailer.len, "Vulnerable image")
        }
        DetectionResult::Error(failure) => warn!(error = %failure, "Could not examine file"),
        DetectionResult::NotVulnerable(_) => {}
    }
    result
}

/// Walks a file or directory and examines every candidate file.
pub struct Scanner {
    config: DetectorConfig,
}

impl Scanner {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Collect candidate paths under `root`, sorted.
    ///
    /// Walk errors are returned alongside so they can be reported per entry.
    pub fn candidates(&self, root: &Path) -> Result<(Vec<PathBuf>, Vec<FileReport>), ScanError> {
        let metadata = std::fs::metadata(root).map_err(|_| ScanError::NotFound(root.to_path_buf()))?;
        let scan = &self.config.scan;

        if metadata.is_file() {
            let paths = if scan.is_candidate(root) {
                vec![root.to_path_buf()]
            } else {
                Vec::new()
            };
            return Ok((paths, Vec::new()));
        }
        if !metadata.is_dir() {
            return Err(ScanError::Unsupported(root.to_path_buf()));
        }

        let mut walker = WalkDir::new(root).follow_links(scan.follow_links);
        if !scan.recursive {
            walker = walker.max_depth(1);
        }

        let mut paths = Vec::new();
        let mut failures = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && scan.is_candidate(entry.path()) {
                        paths.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    warn!(path = %path.display(), error = %e, "Walk error");
                    failures.push(FileReport {
                        path,
                        result: DetectionResult::Error(DetectFailure::new(
                            FailureKind::Io,
                            e.to_string(),
                        )),
                    });
                }
            }
        }
        paths.sort();
        Ok((paths, failures))
    }

    /// Scan `root` (a file or directory).
    pub fn scan(&self, root: &Path) -> Result<ScanReport, ScanError> {
        let (paths, mut files) = self.candidates(root)?;
        info!(root = %root.display(), candidates = paths.len(), "Scanning");

        let limits = &self.config.io;
        let mut results: Vec<FileReport> = if self.config.scan.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.scan.threads)
                .build()?;
            pool.install(|| {
                paths
                    .par_iter()
                    .map(|path| FileReport {
                        path: path.clone(),
                        result: detect_path(path, limits),
                    })
                    .collect()
            })
        } else {
            paths
                .iter()
                .map(|path| FileReport {
                    path: path.clone(),
                    result: detect_path(path, limits),
                })
                .collect()
        };

        files.append(&mut results);
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(ScanReport { files })
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
