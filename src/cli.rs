//! Command-line interface module for sortwatch.
//!
//! This module handles all CLI-related functionality:
//! - Command parsing via clap
//! - Configuration loading and compilation
//! - Dispatch to the one-shot scanner or the watcher
//! - Interrupt handling for watch mode

use crate::config::SortConfig;
use crate::organizer;
use crate::output::OutputFormatter;
use crate::watcher;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Sort files into extension-based subfolders.
#[derive(Debug, Parser)]
#[command(name = "sortwatch", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// The operation to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sort every file currently in the directory, then exit.
    Organize {
        /// Directory to sort.
        dir: PathBuf,
    },
    /// Watch the directory and sort files as they appear.
    Watch {
        /// Directory to watch.
        dir: PathBuf,
    },
}

/// Runs the CLI application with the given parsed arguments.
///
/// Loads and compiles configuration first; a malformed or missing
/// configuration file is fatal and nothing is scanned or watched.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use sortwatch::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["sortwatch", "organize", "/home/user/Downloads"]);
/// if let Err(e) = run_cli(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: Cli) -> Result<(), String> {
    let config = SortConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let plan = config
        .compile()
        .map_err(|e| format!("Error in configuration: {}", e))?;

    match cli.command {
        Command::Organize { dir } => {
            OutputFormatter::info(&format!("Sorting contents of: {}", dir.display()));

            let summary = organizer::organize_once(&dir, &plan).map_err(|e| e.to_string())?;

            if summary.moved == 0 && summary.failed == 0 {
                OutputFormatter::plain("No files to sort.");
                return Ok(());
            }

            OutputFormatter::summary_table(&summary.folder_counts, summary.moved);
            if summary.failed > 0 {
                OutputFormatter::warning(&format!(
                    "{} file{} could not be sorted.",
                    summary.failed,
                    if summary.failed == 1 { "" } else { "s" }
                ));
            }
            Ok(())
        }
        Command::Watch { dir } => {
            let stop = Arc::new(AtomicBool::new(false));
            let flag = stop.clone();
            ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
                .map_err(|e| format!("Error installing interrupt handler: {}", e))?;

            watcher::watch(&dir, &plan, stop).map_err(|e| e.to_string())
        }
    }
}
