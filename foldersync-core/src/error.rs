//! Error types for foldersync-core.

use thiserror::Error;

/// Errors raised while turning command-line input into a [`crate::SyncConfig`].
///
/// These are reported once and never retried; no synchronization starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Anything other than exactly four positional arguments.
    #[error("expected 4 arguments, got {got}")]
    WrongArgumentCount { got: usize },

    /// The interval argument is not a non-negative integer.
    #[error("The interval must be a valid non-negative integer.")]
    InvalidInterval { value: String },

    /// The log file argument was an empty string.
    #[error("The log file path must not be empty.")]
    EmptyLogPath,
}
