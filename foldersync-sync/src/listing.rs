//! Single-level directory listings that never follow symbolic links.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs::{self, FileType};
use std::io;
use std::path::Path;

use crate::error::{io_err, SyncError};

/// Kind of a directory entry, taken from `lstat`-style metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    /// FIFOs, sockets, devices.
    Other,
}

impl EntryKind {
    fn from_file_type(ty: FileType) -> Self {
        if ty.is_symlink() {
            EntryKind::Symlink
        } else if ty.is_dir() {
            EntryKind::Dir
        } else if ty.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    /// Kind of whatever is at `path` right now, `None` if nothing is.
    pub fn probe(path: &Path) -> Result<Option<Self>, SyncError> {
        match fs::symlink_metadata(path) {
            Ok(meta) => Ok(Some(Self::from_file_type(meta.file_type()))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(path, err)),
        }
    }
}

/// Direct children of one directory, ordered by name.
#[derive(Debug, Default)]
pub struct Listing {
    entries: BTreeMap<OsString, EntryKind>,
}

impl Listing {
    /// Read the direct children of `dir`.
    pub fn read(dir: &Path) -> Result<Self, SyncError> {
        let mut entries = BTreeMap::new();
        for entry in fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
            let entry = entry.map_err(|e| io_err(dir, e))?;
            let ty = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
            entries.insert(entry.file_name(), EntryKind::from_file_type(ty));
        }
        Ok(Self { entries })
    }

    pub fn kind_of(&self, name: &OsStr) -> Option<EntryKind> {
        self.entries.get(name).copied()
    }

    pub fn has_file(&self, name: &OsStr) -> bool {
        self.kind_of(name) == Some(EntryKind::File)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, EntryKind)> {
        self.entries.iter().map(|(name, kind)| (name.as_os_str(), *kind))
    }

    pub fn files(&self) -> impl Iterator<Item = &OsStr> {
        self.of_kind(EntryKind::File)
    }

    pub fn dirs(&self) -> impl Iterator<Item = &OsStr> {
        self.of_kind(EntryKind::Dir)
    }

    fn of_kind(&self, wanted: EntryKind) -> impl Iterator<Item = &OsStr> {
        self.iter()
            .filter(move |(_, kind)| *kind == wanted)
            .map(|(name, _)| name)
    }
}

/// Remove the entry at `path` without following links. Directories are
/// removed with their whole contents.
pub fn remove_entry(path: &Path, kind: EntryKind) -> Result<(), SyncError> {
    let result = match kind {
        EntryKind::Dir => fs::remove_dir_all(path),
        EntryKind::Symlink => remove_link(path),
        EntryKind::File | EntryKind::Other => fs::remove_file(path),
    };
    result.map_err(|e| io_err(path, e))
}

#[cfg(not(windows))]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

// Directory symlinks and junctions on Windows are removed with `remove_dir`.
#[cfg(windows)]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}
