//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `tech_probe` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::process;

use tech_probe::initialization::init_logger;
use tech_probe::{run_analysis, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    if config.no_color {
        colored::control::set_override(false);
    }

    // Initialize logger based on config
    init_logger(config.log_level.clone().into()).context("Failed to initialize logger")?;

    match run_analysis(&config).await {
        Ok(report) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            report
                .panel
                .write_to(&mut out)
                .context("Failed to write results")?;
            writeln!(out, "\nAnalyzed in {:.1}s", report.elapsed_seconds)
                .context("Failed to write summary")?;
            if !report.succeeded {
                process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("tech_probe error: {:#}", e);
            process::exit(1);
        }
    }
}
