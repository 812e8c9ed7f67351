//! Console + file sink for action records.
//!
//! Each record becomes one line: the record text followed by the platform
//! line terminator. The line goes to stdout and is appended to the log file,
//! which is reopened in append mode for every write. No rotation, no size cap.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use foldersync_core::{ActionLog, ActionRecord};

use crate::error::{io_err, DaemonError};

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Writes every record to stdout and appends it to a log file.
#[derive(Debug)]
pub struct ActionLogFile {
    path: PathBuf,
}

impl ActionLogFile {
    /// Prepare `path` for appending: create missing parent directories and
    /// check the file can be opened for append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DaemonError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        open_append(&path).map_err(|e| io_err(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = open_append(&self.path)?;
        // One write call per record keeps concurrent appenders from interleaving.
        file.write_all(format!("{line}{LINE_ENDING}").as_bytes())
    }
}

impl ActionLog for ActionLogFile {
    fn log(&mut self, record: &ActionRecord) {
        let line = record.to_string();

        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{line}{LINE_ENDING}");
        let _ = stdout.flush();

        if let Err(err) = self.append(&line) {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to append to action log"
            );
        }
    }
}

fn open_append(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}
