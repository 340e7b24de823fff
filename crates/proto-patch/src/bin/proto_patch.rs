//! `proto-patch`: offline checks for prototype patch directive files.
//!
//! Usage:
//!   proto-patch check <DIR> [--config FILE] [--prefix P] [--extension E] [-v]
//!
//! Exits with status 1 when any directive file or record is invalid.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use proto_patch::{lint_directory, PatchOptions};

#[derive(Parser, Debug)]
#[command(name = "proto-patch")]
#[command(about = "Prototype patch directive tooling")]
#[command(version)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every directive file in a directory
    Check {
        /// Directory holding directive files
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// TOML options file; the directory argument overrides its directory
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// File name prefix of directive files
        #[arg(long, value_name = "P")]
        prefix: Option<String>,

        /// File extension of directive files, without the dot
        #[arg(long, value_name = "E")]
        extension: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check(
    directory: PathBuf,
    config: Option<PathBuf>,
    prefix: Option<String>,
    extension: Option<String>,
) -> anyhow::Result<bool> {
    let mut options = match config {
        Some(path) => PatchOptions::load(&path).with_context(|| format!("loading options from {}", path.display()))?,
        None => PatchOptions::default(),
    };
    options.directory = directory;
    if let Some(prefix) = prefix {
        options.file_prefix = prefix;
    }
    if let Some(extension) = extension {
        options.extension = extension;
    }

    let report = lint_directory(&options)
        .with_context(|| format!("checking {}", options.directory.display()))?;
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    println!(
        "{} files, {} records, {} disabled, {} invalid",
        report.files, report.records, report.disabled, report.invalid
    );
    Ok(report.is_clean())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let clean = match args.command {
        Command::Check { directory, config, prefix, extension } => check(directory, config, prefix, extension)?,
    };
    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
