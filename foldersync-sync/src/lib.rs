//! # foldersync-sync
//!
//! One-way reconciliation of a replica directory tree against a source tree.
//!
//! Call [`reconcile`] once per pass. Every copy and deletion is reported to
//! the supplied [`foldersync_core::ActionLog`]; the first filesystem failure
//! aborts the pass with a [`SyncError`].

pub mod digest;
pub mod error;
pub mod listing;
pub mod reconcile;
pub mod report;

pub use digest::{files_equal, ContentDigest};
pub use error::SyncError;
pub use reconcile::reconcile;
pub use report::PassReport;
