//! # treesha
//!
//! Print one SHA-1 fingerprint per source tree, to tell whether a project's
//! source changed between builds.
//!
//! ## Usage
//!
//! ```bash
//! # Fingerprint two trees, labelled
//! treesha core/src=core web/src=web
//!
//! # Skip build output and compiled classes
//! treesha core/src --exclude-folders "bin .git" --exclude-extensions ".class"
//!
//! # Show the digest of every file as well
//! treesha core/src --per-file
//!
//! # Write to a file instead of stdout
//! treesha core/src -o fingerprints.txt
//!
//! # Read roots and exclusions from a TOML file
//! treesha --config treesha.toml
//! ```
//!
//! Each root prints `<SHA-1> (<count>)(<yy/MM/dd HH:mm>) : <label>`, with a
//! trailing `*` when a source package is missing its `package-info.java`.

mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, Command};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treeshalib::{run, Destination, RootOutcome};

use crate::settings::Settings;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("treesha")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Deterministic SHA-1 fingerprints of source trees")
        .arg(
            Arg::new("root")
                .value_name("ROOT")
                .action(ArgAction::Append)
                .help("Directory to fingerprint, as PATH or PATH=LABEL"),
        )
        .arg(
            Arg::new("exclude-folders")
                .short('x')
                .long("exclude-folders")
                .value_name("NAMES")
                .action(ArgAction::Append)
                .help("Space-delimited folder names to skip entirely"),
        )
        .arg(
            Arg::new("exclude-extensions")
                .short('e')
                .long("exclude-extensions")
                .value_name("SUFFIXES")
                .action(ArgAction::Append)
                .help("Space-delimited file name suffixes to skip"),
        )
        .arg(
            Arg::new("output-file")
                .short('o')
                .long("output-file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Write output to FILE (truncated) instead of stdout"),
        )
        .arg(
            Arg::new("per-file")
                .long("per-file")
                .action(ArgAction::SetTrue)
                .help("Also print the digest of every included file"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with roots, exclusions and policy"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log progress to stderr (-v info, -vv debug)"),
        )
}

/// Logs go to stderr so stdout carries only fingerprints.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run every root. Returns false if any root had to be abandoned.
fn execute(settings: &Settings) -> anyhow::Result<bool> {
    tracing::debug!(?settings, "resolved settings");

    let mut destination = Destination::open(settings.output_file.as_deref())?;
    let summary = run(&settings.options, settings.format, &mut destination)?;

    if let Some(path) = destination.finish()? {
        println!("{} out", path.display());
    }

    for report in summary.failures() {
        if let RootOutcome::Failed { error } = &report.outcome {
            eprintln!("Error: {}: {}", report.label, error);
        }
    }

    Ok(!summary.has_failures())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    setup_logging(matches.get_count("verbose"));

    let result = Settings::from_matches(&matches).and_then(|settings| execute(&settings));

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
