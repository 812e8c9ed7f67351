//! Per-pass counters.

use std::fmt;

/// What one reconciliation pass did. Diagnostics only; the audit trail is the
/// stream of action records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Directory pairs visited.
    pub directories: usize,
    /// Files copied because they were missing or different.
    pub copied: usize,
    /// Files whose replica copy already matched.
    pub unchanged: usize,
    /// Replica files and links removed.
    pub deleted_files: usize,
    /// Replica directory trees removed.
    pub deleted_dirs: usize,
    /// Replica directories created.
    pub created_dirs: usize,
    /// Source entries that are neither regular files nor directories.
    pub skipped: usize,
}

impl PassReport {
    /// Number of logged mutations (copies and deletions).
    pub fn mutations(&self) -> usize {
        self.copied + self.deleted_files + self.deleted_dirs
    }

    /// `true` when the replica was already in sync.
    pub fn is_noop(&self) -> bool {
        self.mutations() == 0 && self.created_dirs == 0
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} unchanged, {} deleted, {} directories removed",
            self.copied, self.unchanged, self.deleted_files, self.deleted_dirs
        )
    }
}
