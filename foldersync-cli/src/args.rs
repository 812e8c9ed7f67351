//! Positional argument surface.

use clap::error::ErrorKind;
use clap::Parser;

use foldersync_core::{ConfigError, SyncConfig};

#[derive(Parser, Debug)]
#[command(
    name = "foldersync",
    version,
    about = "Keep a replica directory in one-way sync with a source directory",
    long_about = None,
)]
pub struct Cli {
    /// Directory to mirror from.
    pub source_folder: String,

    /// Directory to mirror into; created if missing.
    pub replica_folder: String,

    /// Seconds to wait between passes.
    #[arg(allow_hyphen_values = true)]
    pub interval_seconds: String,

    /// File every copy, deletion and error is appended to.
    pub log_file_path: String,
}

impl Cli {
    pub fn into_config(self) -> Result<SyncConfig, ConfigError> {
        SyncConfig::from_args(&[
            self.source_folder,
            self.replica_folder,
            self.interval_seconds,
            self.log_file_path,
        ])
    }
}

/// What to do with a clap parse failure.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseFailure {
    /// `--help` / `--version`: clap prints it, exit successfully.
    Informational,
    /// Anything else: print the usage line, exit with failure.
    Usage,
}

pub fn classify(err: &clap::Error) -> ParseFailure {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ParseFailure::Informational,
        _ => ParseFailure::Usage,
    }
}
