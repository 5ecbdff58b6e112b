//! Configuration for detection limits and batch scanning.
//!
//! All sections default sensibly and can be loaded from a JSON file; missing
//! keys fall back to their defaults.

use crate::error::ConfigError;
use crate::io::IOLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Master configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Per-file I/O limits.
    pub io: IOLimits,
    /// Candidate discovery and scheduling.
    pub scan: ScanConfig,
}

impl DetectorConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Candidate discovery and scheduling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions treated as candidates, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Run detections on a worker pool.
    pub parallel: bool,
    /// Worker count when `parallel` is set (0 = one per CPU).
    pub threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["png".to_string()],
            recursive: true,
            follow_links: false,
            parallel: false,
            threads: 0,
        }
    }
}

impl ScanConfig {
    /// Whether `path` has one of the configured extensions.
    pub fn is_candidate(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
