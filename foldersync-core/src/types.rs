//! Domain types for foldersync.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Timestamp prefix rendered in front of every action record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Directory pairs
// ---------------------------------------------------------------------------

/// A source directory and the replica location that mirrors it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPair {
    pub source: PathBuf,
    pub replica: PathBuf,
}

impl DirectoryPair {
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
        }
    }

    /// The pair one level down, joining the same entry name on both sides.
    pub fn child(&self, name: &OsStr) -> Self {
        Self {
            source: self.source.join(name),
            replica: self.replica.join(name),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }
}

// ---------------------------------------------------------------------------
// Action records
// ---------------------------------------------------------------------------

/// One mutating action taken by a pass, or a pass-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A source file was copied over its replica counterpart.
    Copied { from: PathBuf, to: PathBuf },
    /// A replica file (or symbolic link) was removed.
    Deleted { path: PathBuf },
    /// A replica directory tree was removed.
    DeletedDirectory { path: PathBuf },
    /// A pass failed; the text is the error message.
    Failed { message: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Copied { from, to } => {
                write!(f, "Copied: {} to {}", from.display(), to.display())
            }
            Action::Deleted { path } => write!(f, "Deleted: {}", path.display()),
            Action::DeletedDirectory { path } => {
                write!(f, "Deleted directory: {}", path.display())
            }
            Action::Failed { message } => f.write_str(message),
        }
    }
}

/// A timestamped [`Action`]. Its `Display` output is the exact log line text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub at: DateTime<Utc>,
    pub action: Action,
}

impl ActionRecord {
    /// Stamp `action` with the current time.
    pub fn now(action: Action) -> Self {
        Self {
            at: Utc::now(),
            action,
        }
    }

    /// Record a caught pass-level error.
    pub fn failed(err: &dyn std::error::Error) -> Self {
        Self::now(Action::Failed {
            message: err.to_string(),
        })
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.at.format(TIMESTAMP_FORMAT), self.action)
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Receiver for action records emitted during a pass.
///
/// Logging cannot fail from the caller's point of view; sinks deal with their
/// own write errors.
pub trait ActionLog {
    fn log(&mut self, record: &ActionRecord);
}

impl<F> ActionLog for F
where
    F: FnMut(&ActionRecord),
{
    fn log(&mut self, record: &ActionRecord) {
        self(record)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
