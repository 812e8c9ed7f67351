//! Sync runner: fixed-interval reconcile loop plus the console/file action log.

pub mod action_log;
mod error;
mod runtime;

pub use action_log::ActionLogFile;
pub use error::{DaemonError, PassError};
pub use runtime::{run, start_blocking, RunSummary};
