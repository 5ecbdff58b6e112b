//! CLI for acropalypse: scan a PNG file or a directory of PNGs for leftover
//! pre-edit data after IEND.

use acropalypse::logging::{init_tracing, init_tracing_json};
use acropalypse::{DetectionResult, DetectorConfig, ScanReport, Scanner};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "acropalypse")]
#[command(about = "Detect PNG images carrying leftover data from before an in-place crop", long_about = None)]
struct Args {
    /// File or directory to scan
    path: PathBuf,

    /// JSON configuration file (flags given here override it)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// File extensions to scan (comma-separated)
    #[arg(short, long, value_name = "LIST")]
    extensions: Option<String>,

    /// Only scan the top level of a directory
    #[arg(long)]
    no_recursive: bool,

    /// Examine files on N worker threads
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON (use with --json)
    #[arg(long)]
    pretty: bool,

    /// Quiet: omit per-file "Check" lines
    #[arg(short, long)]
    quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if args.log_json {
        init_tracing_json();
    } else {
        init_tracing();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    if let Some(list) = &args.extensions {
        config.scan.extensions = list
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if args.no_recursive {
        config.scan.recursive = false;
    }
    if let Some(jobs) = args.jobs {
        config.scan.parallel = true;
        config.scan.threads = jobs;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let scanner = Scanner::new(config);
    let report = scanner
        .scan(&args.path)
        .with_context(|| format!("Cannot scan {}", args.path.display()))?;

    if args.json {
        print_json(&report, args.pretty)?;
    } else {
        print_human(&report, args.quiet);
    }
    Ok(())
}

fn print_json(report: &ScanReport, pretty: bool) -> Result<()> {
    let out = serde_json::json!({
        "counts": report.counts(),
        "files": report.files,
    });
    let text = if pretty {
        serde_json::to_string_pretty(&out)?
    } else {
        serde_json::to_string(&out)?
    };
    println!("{text}");
    Ok(())
}

fn print_human(report: &ScanReport, quiet: bool) {
    for file in &report.files {
        let path = file.path.display();
        if !quiet {
            println!("Check: '{path}'");
        }
        match &file.result {
            DetectionResult::Vulnerable(trailer) => println!(
                "Result: '{path}' is vulnerable ({} bytes after IEND at offset {})",
                trailer.len, trailer.offset
            ),
            DetectionResult::Error(failure) => println!("Error: '{path}': {failure}"),
            DetectionResult::NotVulnerable(_) => {}
        }
    }

    let vulnerable: Vec<_> = report.vulnerable().collect();
    println!("\n-- Vulnerable Images [{}] --", vulnerable.len());
    for file in vulnerable {
        println!("{}", file.path.display());
    }

    let errors: Vec<_> = report.errors().collect();
    if !errors.is_empty() {
        println!("\n-- Errors [{}] --", errors.len());
        for file in errors {
            if let Some(failure) = file.result.failure() {
                println!("{} ({}): {}", file.path.display(), failure.kind, failure);
            }
        }
    }

    if !quiet {
        let counts = report.counts();
        eprintln!(
            "Scanned {} files: {} vulnerable, {} clean, {} not PNG, {} errors",
            counts.scanned, counts.vulnerable, counts.clean, counts.not_png, counts.errors
        );
    }
}
