//! foldersync core library: domain types, runner configuration, errors.
//!
//! Public API surface:
//! - [`types`]: directory pairs, action records and the [`ActionLog`] sink trait
//! - [`config`]: [`SyncConfig`] built from the command-line surface
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::SyncConfig;
pub use error::ConfigError;
pub use types::{Action, ActionLog, ActionRecord, DirectoryPair};
