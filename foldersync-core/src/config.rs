//! Runner configuration built from the positional command-line surface.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Usage line printed when the argument count is wrong.
pub const USAGE: &str =
    "Usage: foldersync <sourceFolder> <replicaFolder> <intervalSeconds> <logFilePath>";

/// Everything the runner needs for one sync job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Authoritative tree.
    pub source: PathBuf,
    /// Mirror tree; created on the first pass if missing.
    pub replica: PathBuf,
    /// Delay between the end of one pass and the start of the next.
    pub interval: Duration,
    /// Append-only action log.
    pub log_file: PathBuf,
}

impl SyncConfig {
    /// Build a config from exactly four positional values:
    /// `<source> <replica> <intervalSeconds> <logFile>`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        let [source, replica, interval, log_file] = args else {
            return Err(ConfigError::WrongArgumentCount { got: args.len() });
        };

        let interval = parse_interval(interval.as_ref())?;

        let log_file = log_file.as_ref();
        if log_file.trim().is_empty() {
            return Err(ConfigError::EmptyLogPath);
        }

        Ok(Self {
            source: PathBuf::from(source.as_ref()),
            replica: PathBuf::from(replica.as_ref()),
            interval,
            log_file: PathBuf::from(log_file),
        })
    }
}

/// Parse a whole number of seconds. Zero is allowed and means back-to-back passes.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidInterval {
            value: value.to_string(),
        })
}
