use std::path::PathBuf;

use thiserror::Error;

use foldersync_sync::SyncError;

/// Error surface for runner setup. Failing passes never surface here.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single pass did not complete. Logged, then retried next interval.
#[derive(Debug, Error)]
pub enum PassError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("sync pass aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
