//! One-way tree reconciliation.
//!
//! ## Per directory pair, in order
//!
//! 1. Ensure the replica directory exists (ancestors included).
//! 2. Copy every source file that is missing or different in the replica.
//! 3. Delete replica files (and links) with no same-named source file.
//! 4. Descend into every source subdirectory.
//! 5. Delete replica subdirectories with no same-named source subdirectory.
//!
//! Traversal runs off an explicit stack. Step 5 of a pair is queued beneath
//! its children so it still runs after all of them finished.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use foldersync_core::{Action, ActionLog, ActionRecord, DirectoryPair};

use crate::digest::files_equal;
use crate::error::{io_err, SyncError};
use crate::listing::{remove_entry, EntryKind, Listing};
use crate::report::PassReport;

/// Name prefix of the temporary a copy is staged in before the final rename.
pub const TMP_PREFIX: &str = ".foldersync-";
/// Name suffix of the staging temporary.
pub const TMP_SUFFIX: &str = ".tmp";

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

enum Frame {
    /// Steps 1–4 for a pair.
    Enter(DirectoryPair),
    /// Step 5 for a pair whose children are done.
    Prune {
        pair: DirectoryPair,
        source_dirs: Vec<OsString>,
    },
}

/// Mirror `source` onto `replica`, reporting every mutation to `log`.
///
/// `replica` is created if missing. The first failing filesystem operation
/// aborts the pass; whatever was already mirrored stays in place.
pub fn reconcile<L>(source: &Path, replica: &Path, log: &mut L) -> Result<PassReport, SyncError>
where
    L: ActionLog + ?Sized,
{
    if check_roots(source, replica)? == Roots::Same {
        tracing::debug!(path = %source.display(), "source and replica are the same directory");
        return Ok(PassReport::default());
    }

    let mut report = PassReport::default();
    let mut stack = vec![Frame::Enter(DirectoryPair::new(source, replica))];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(pair) => {
                let source_dirs = sync_files(&pair, log, &mut report)?;
                let children: Vec<DirectoryPair> =
                    source_dirs.iter().map(|name| pair.child(name)).collect();
                stack.push(Frame::Prune { pair, source_dirs });
                // Reversed so the stack pops children in name order.
                stack.extend(children.into_iter().rev().map(Frame::Enter));
            }
            Frame::Prune { pair, source_dirs } => {
                prune_dirs(&pair, &source_dirs, log, &mut report)?;
            }
        }
    }

    tracing::debug!(
        source = %source.display(),
        replica = %replica.display(),
        directories = report.directories,
        copied = report.copied,
        unchanged = report.unchanged,
        "pass finished"
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Root validation
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Roots {
    Distinct,
    Same,
}

fn check_roots(source: &Path, replica: &Path) -> Result<Roots, SyncError> {
    let source_root = fs::canonicalize(source).map_err(|e| io_err(source, e))?;
    if !source_root.is_dir() {
        return Err(SyncError::NotADirectory {
            path: source.to_path_buf(),
        });
    }

    let replica_root = resolve_lenient(replica)?;
    if replica_root == source_root {
        return Ok(Roots::Same);
    }
    if replica_root.starts_with(&source_root) || source_root.starts_with(&replica_root) {
        return Err(SyncError::OverlappingRoots {
            source_root,
            replica_root,
        });
    }
    Ok(Roots::Distinct)
}

/// Canonicalize the longest existing prefix of `path` and re-attach the rest.
fn resolve_lenient(path: &Path) -> Result<PathBuf, SyncError> {
    let absolute = std::path::absolute(path).map_err(|e| io_err(path, e))?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        match fs::canonicalize(existing) {
            Ok(mut resolved) => {
                resolved.extend(missing.iter().rev());
                return Ok(resolved);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name.to_os_string());
                        existing = parent;
                    }
                    _ => return Ok(absolute),
                }
            }
            Err(err) => return Err(io_err(existing, err)),
        }
    }
}

// ---------------------------------------------------------------------------
// Steps 1–3
// ---------------------------------------------------------------------------

/// Returns the source subdirectory names, in order, for step 4.
fn sync_files<L>(
    pair: &DirectoryPair,
    log: &mut L,
    report: &mut PassReport,
) -> Result<Vec<OsString>, SyncError>
where
    L: ActionLog + ?Sized,
{
    ensure_dir(pair.replica(), report)?;
    report.directories += 1;

    let source = Listing::read(pair.source())?;
    for (name, kind) in source.iter() {
        if matches!(kind, EntryKind::Symlink | EntryKind::Other) {
            tracing::warn!(
                path = %pair.source().join(name).display(),
                kind = ?kind,
                "skipping entry that is not a regular file or directory"
            );
            report.skipped += 1;
        }
    }

    for name in source.files() {
        let from = pair.source().join(name);
        let to = pair.replica().join(name);
        sync_file(&from, &to, log, report)?;
    }

    let replica = Listing::read(pair.replica())?;
    for (name, kind) in replica.iter() {
        if kind == EntryKind::Dir || source.has_file(name) {
            continue;
        }
        let path = pair.replica().join(name);
        remove_entry(&path, kind)?;
        report.deleted_files += 1;
        log.log(&ActionRecord::now(Action::Deleted { path }));
    }

    Ok(source.dirs().map(|name| name.to_os_string()).collect())
}

fn ensure_dir(dir: &Path, report: &mut PassReport) -> Result<(), SyncError> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    report.created_dirs += 1;
    tracing::debug!(path = %dir.display(), "created replica directory");
    Ok(())
}

fn sync_file<L>(
    from: &Path,
    to: &Path,
    log: &mut L,
    report: &mut PassReport,
) -> Result<(), SyncError>
where
    L: ActionLog + ?Sized,
{
    match EntryKind::probe(to)? {
        None => {}
        Some(EntryKind::File) => {
            if files_equal(from, to)? {
                tracing::debug!(path = %to.display(), "unchanged");
                report.unchanged += 1;
                return Ok(());
            }
        }
        Some(EntryKind::Dir) => {
            remove_entry(to, EntryKind::Dir)?;
            report.deleted_dirs += 1;
            log.log(&ActionRecord::now(Action::DeletedDirectory {
                path: to.to_path_buf(),
            }));
        }
        Some(kind) => {
            remove_entry(to, kind)?;
            report.deleted_files += 1;
            log.log(&ActionRecord::now(Action::Deleted {
                path: to.to_path_buf(),
            }));
        }
    }

    let bytes = copy_file(from, to)?;
    report.copied += 1;
    tracing::debug!(from = %from.display(), to = %to.display(), bytes, "copied");
    log.log(&ActionRecord::now(Action::Copied {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
    }));
    Ok(())
}

/// Copy into a fresh temporary beside `to`, then rename it onto `to`.
///
/// The temporary is created exclusively under a random name, so no entry
/// already in the replica is written through or reused. On failure it is
/// removed and `to` keeps its old content.
fn copy_file(from: &Path, to: &Path) -> Result<u64, SyncError> {
    let copy_err = |source: io::Error| SyncError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let mut reader = File::open(from).map_err(copy_err)?;
    let permissions = reader.metadata().map_err(copy_err)?.permissions();

    let dir = to.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::Builder::new()
        .prefix(TMP_PREFIX)
        .suffix(TMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(copy_err)?;
    let bytes = io::copy(&mut reader, staged.as_file_mut()).map_err(copy_err)?;
    staged
        .as_file()
        .set_permissions(permissions)
        .map_err(copy_err)?;

    staged.persist(to).map_err(|e| io_err(to, e.error))?;
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Step 5
// ---------------------------------------------------------------------------

fn prune_dirs<L>(
    pair: &DirectoryPair,
    source_dirs: &[OsString],
    log: &mut L,
    report: &mut PassReport,
) -> Result<(), SyncError>
where
    L: ActionLog + ?Sized,
{
    let replica = Listing::read(pair.replica())?;
    for name in replica.dirs() {
        if source_dirs.iter().any(|d| d.as_os_str() == name) {
            continue;
        }
        let path = pair.replica().join(name);
        remove_entry(&path, EntryKind::Dir)?;
        report.deleted_dirs += 1;
        log.log(&ActionRecord::now(Action::DeletedDirectory { path }));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
