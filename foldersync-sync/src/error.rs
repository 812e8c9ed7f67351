//! Error types for foldersync-sync.

use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a reconciliation pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a file failed part-way; the destination was left untouched.
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source root exists but is not a directory.
    #[error("source {path} is not a directory")]
    NotADirectory { path: PathBuf },

    /// Source and replica are the same directory or one contains the other.
    #[error("source {source_root} and replica {replica_root} overlap")]
    OverlappingRoots {
        source_root: PathBuf,
        replica_root: PathBuf,
    },
}

impl SyncError {
    /// The underlying I/O error kind, if this error came from the filesystem.
    pub fn io_kind(&self) -> Option<ErrorKind> {
        match self {
            SyncError::Io { source, .. } | SyncError::Copy { source, .. } => Some(source.kind()),
            SyncError::NotADirectory { .. } | SyncError::OverlappingRoots { .. } => None,
        }
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
