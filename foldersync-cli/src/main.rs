//! foldersync: one-way periodic directory mirroring.
//!
//! # Usage
//!
//! ```text
//! foldersync <sourceFolder> <replicaFolder> <intervalSeconds> <logFilePath>
//! ```
//!
//! Runs until interrupted. Every copy, deletion and failed pass is printed to
//! stdout and appended to the log file. Set `RUST_LOG=debug` for diagnostics
//! on stderr.

mod args;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use args::{classify, Cli, ParseFailure};
use foldersync_core::{config::USAGE, ConfigError};
use foldersync_daemon::start_blocking;

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            return Ok(match classify(&err) {
                ParseFailure::Informational => {
                    let _ = err.print();
                    ExitCode::SUCCESS
                }
                ParseFailure::Usage => {
                    println!("{USAGE}");
                    ExitCode::FAILURE
                }
            });
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(ConfigError::WrongArgumentCount { .. }) => {
            println!("{USAGE}");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => {
            println!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    start_blocking(&config).with_context(|| {
        format!(
            "could not start syncing {} to {}",
            config.source.display(),
            config.replica.display()
        )
    })?;
    Ok(ExitCode::SUCCESS)
}
