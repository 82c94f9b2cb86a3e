//! lure-validate - Offline checker for LURE definition and config files.
//!
//! Validates boost item definition TOML files (and optionally the engine
//! config) without a server running, so operators catch mistakes before the
//! next restart picks them up.
//!
//! Usage: lure-validate [--definitions <DIR>]... [--config <FILE>]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use lure_core::EngineConfig;
use lure_core::items::{self, load_file};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lure-validate",
    about = "Validate LURE boost definitions and engine config"
)]
struct Args {
    /// Definition directories to check. Defaults to the builtin and custom
    /// locations when omitted.
    #[arg(long = "definitions", value_name = "DIR")]
    definitions: Vec<PathBuf>,

    /// Engine config file to check.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Default)]
struct Report {
    files: usize,
    items: usize,
    problems: usize,
}

struct Printer {
    color: bool,
}

impl Printer {
    fn new() -> Self {
        Self {
            color: atty::is(atty::Stream::Stdout),
        }
    }

    fn ok(&self, message: &str) {
        if self.color {
            println!("  \x1b[32mok\x1b[0m {message}");
        } else {
            println!("  ok {message}");
        }
    }

    fn fail(&self, message: &str) {
        if self.color {
            println!("  \x1b[31mFAIL\x1b[0m {message}");
        } else {
            println!("  FAIL {message}");
        }
    }
}

fn main() -> ExitCode {
    // Core-side warnings (skipped definitions etc.) go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let printer = Printer::new();
    let mut report = Report::default();

    let mut dirs = args.definitions;
    if dirs.is_empty() {
        dirs.extend(items::default_builtin_dir());
        dirs.extend(items::default_custom_dir());
    }

    for dir in &dirs {
        if !dir.exists() {
            println!("skipping {} (not found)", dir.display());
            continue;
        }
        println!("checking {}", dir.display());
        check_directory(dir, &printer, &mut report);
    }

    if let Some(config) = &args.config {
        println!("checking {}", config.display());
        check_config(config, &printer, &mut report);
    }

    println!(
        "\n{} file(s), {} item(s), {} problem(s)",
        report.files, report.items, report.problems
    );
    if report.problems > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn check_directory(dir: &Path, printer: &Printer, report: &mut Report) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        printer.fail(&format!("cannot read directory {}", dir.display()));
        report.problems += 1;
        return;
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    for path in paths {
        report.files += 1;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let config = match load_file(&path) {
            Ok(config) => config,
            Err(e) => {
                printer.fail(&format!("{file_name}: {e}"));
                report.problems += 1;
                continue;
            }
        };

        for item in &config.items {
            report.items += 1;
            match item.validate() {
                Ok(()) => printer.ok(&format!("{file_name}: {} ({})", item.id, item.kind.key())),
                Err(e) => {
                    printer.fail(&format!("{file_name}: {}: {e}", item.id));
                    report.problems += 1;
                }
            }
        }
    }
}

fn check_config(path: &Path, printer: &Printer, report: &mut Report) {
    report.files += 1;
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            printer.fail(&format!("{}: {e}", path.display()));
            report.problems += 1;
            return;
        }
    };
    match toml::from_str::<EngineConfig>(&contents) {
        Ok(config) => printer.ok(&format!(
            "engine config (reminder every {} ticks, radius {})",
            config.reminder_cadence_ticks, config.affinity_radius
        )),
        Err(e) => {
            printer.fail(&format!("{}: {e}", path.display()));
            report.problems += 1;
        }
    }
}
