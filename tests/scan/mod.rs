//! Integration tests for batch scanning over temporary directory trees.

use acropalypse::config::{DetectorConfig, ScanConfig};
use acropalypse::{detect_path, CleanReason, DetectionResult, FailureKind, IOLimits, ScanError, Scanner};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::common::*;

fn write(dir: &Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

fn sample_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "clean.png", &minimal_png());
    write(dir.path(), "cropped.PNG", &cropped_over_original(2048));
    write(dir.path(), "broken.png", &PngBuilder::new().ihdr().build());
    write(dir.path(), "fake.png", b"just some text");
    write(dir.path(), "ignored.jpg", &cropped_over_original(16));
    write(dir.path(), "nested/deep/inner.png", &cropped_over_original(8));
    dir
}

#[test]
fn directory_scan_reports_every_candidate() {
    let dir = sample_tree();
    let report = Scanner::default().scan(dir.path()).unwrap();

    let names: Vec<_> = report
        .files
        .iter()
        .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            Path::new("broken.png").to_path_buf(),
            Path::new("clean.png").to_path_buf(),
            Path::new("cropped.PNG").to_path_buf(),
            Path::new("fake.png").to_path_buf(),
            Path::new("nested/deep/inner.png").to_path_buf(),
        ]
    );

    let counts = report.counts();
    assert_eq!(counts.scanned, 5);
    assert_eq!(counts.vulnerable, 2);
    assert_eq!(counts.clean, 1);
    assert_eq!(counts.not_png, 1);
    assert_eq!(counts.errors, 1);

    let error = report.errors().next().unwrap();
    assert!(error.path.ends_with("broken.png"));
    assert_eq!(
        error.result.failure().map(|f| f.kind),
        Some(FailureKind::MissingEnd)
    );
}

#[test]
fn non_recursive_scan_skips_subdirectories() {
    let dir = sample_tree();
    let config = DetectorConfig {
        scan: ScanConfig {
            recursive: false,
            ..ScanConfig::default()
        },
        ..DetectorConfig::default()
    };
    let report = Scanner::new(config).scan(dir.path()).unwrap();
    assert_eq!(report.counts().scanned, 4);
    assert_eq!(report.vulnerable().count(), 1);
}

#[test]
fn parallel_scan_matches_sequential() {
    let dir = sample_tree();
    for i in 0..20 {
        write(dir.path(), &format!("bulk/{i:02}.png"), &cropped_over_original(i * 10));
    }

    let sequential = Scanner::default().scan(dir.path()).unwrap();
    let config = DetectorConfig {
        scan: ScanConfig {
            parallel: true,
            threads: 4,
            ..ScanConfig::default()
        },
        ..DetectorConfig::default()
    };
    let parallel = Scanner::new(config).scan(dir.path()).unwrap();
    assert_eq!(sequential, parallel);
    assert_eq!(parallel.counts().vulnerable, 22);
}

#[test]
fn single_file_respects_extension_filter() {
    let dir = sample_tree();
    let scanner = Scanner::default();

    let report = scanner.scan(&dir.path().join("ignored.jpg")).unwrap();
    assert!(report.files.is_empty());

    let report = scanner.scan(&dir.path().join("cropped.PNG")).unwrap();
    assert_eq!(report.files.len(), 1);
    assert!(report.files[0].result.is_vulnerable());
}

#[test]
fn custom_extensions() {
    let dir = sample_tree();
    let config = DetectorConfig {
        scan: ScanConfig {
            extensions: vec!["jpg".into()],
            ..ScanConfig::default()
        },
        ..DetectorConfig::default()
    };
    let report = Scanner::new(config).scan(dir.path()).unwrap();
    assert_eq!(report.files.len(), 1);
    assert!(report.files[0].result.is_vulnerable());
}

#[test]
fn oversized_file_is_reported_not_parsed() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "big.png", &cropped_over_original(4096));

    let limits = IOLimits {
        max_file_size: 1024,
        ..IOLimits::default()
    };
    let result = detect_path(&dir.path().join("big.png"), &limits);
    assert_eq!(result.failure().map(|f| f.kind), Some(FailureKind::TooLarge));
}

#[test]
fn empty_file_is_not_png() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty.png", &[]);
    let result = detect_path(&dir.path().join("empty.png"), &IOLimits::default());
    assert_eq!(result, DetectionResult::NotVulnerable(CleanReason::NotPng));
}

#[test]
fn missing_root_is_scan_error() {
    let dir = TempDir::new().unwrap();
    let err = Scanner::default()
        .scan(&dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
}

#[test]
fn report_serializes_to_json() {
    let dir = sample_tree();
    let report = Scanner::default().scan(dir.path()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 5);
    let verdicts: Vec<_> = files
        .iter()
        .map(|f| f["result"]["verdict"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        verdicts,
        vec!["error", "not_vulnerable", "vulnerable", "not_vulnerable", "vulnerable"]
    );
}
