//! End-to-end reconcile scenarios against real temporary trees.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use foldersync_core::{Action, ActionRecord};
use foldersync_sync::{reconcile, PassReport, SyncError};
use predicates::prelude::*;

fn pass(source: &Path, replica: &Path) -> (PassReport, Vec<Action>) {
    let mut actions = Vec::new();
    let report = reconcile(source, replica, &mut |r: &ActionRecord| {
        actions.push(r.action.clone())
    })
    .expect("reconcile");
    (report, actions)
}

fn copies(actions: &[Action]) -> usize {
    actions
        .iter()
        .filter(|a| matches!(a, Action::Copied { .. }))
        .count()
}

/// Relative path → file bytes for every regular file under `root`, plus every
/// directory (with `None`).
fn snapshot(root: &Path) -> Vec<(PathBuf, Option<Vec<u8>>)> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).expect("read_dir") {
            let path = entry.expect("entry").path();
            let rel = path.strip_prefix(root).expect("prefix").to_path_buf();
            if path.is_dir() {
                out.push((rel, None));
                pending.push(path);
            } else {
                out.push((rel, Some(fs::read(&path).expect("read"))));
            }
        }
    }
    out.sort();
    out
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_new_file_is_copied() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    source.child("a.txt").write_str("hello").expect("write");
    replica.create_dir_all().expect("mkdir");

    let (_, actions) = pass(source.path(), replica.path());

    replica.child("a.txt").assert("hello");
    assert_eq!(actions.len(), 1);
    assert_eq!(copies(&actions), 1);
}

#[test]
fn scenario_b_identical_file_is_not_copied() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    source.child("a.txt").write_str("hello").expect("write");
    replica.child("a.txt").write_str("hello").expect("write");

    let (report, actions) = pass(source.path(), replica.path());

    assert_eq!(copies(&actions), 0);
    assert_eq!(report.unchanged, 1);
}

#[test]
fn scenario_c_extraneous_file_is_deleted() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    source.create_dir_all().expect("mkdir");
    replica.child("old.txt").write_str("bye").expect("write");

    let (_, actions) = pass(source.path(), replica.path());

    replica.child("old.txt").assert(predicate::path::missing());
    assert_eq!(
        actions,
        vec![Action::Deleted {
            path: replica.child("old.txt").path().to_path_buf()
        }]
    );
}

#[test]
fn scenario_d_subdirectory_is_created_and_filled() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    source.child("sub/b.txt").write_str("bee").expect("write");
    replica.create_dir_all().expect("mkdir");

    let (report, _) = pass(source.path(), replica.path());

    replica.child("sub").assert(predicate::path::is_dir());
    replica.child("sub/b.txt").assert("bee");
    assert_eq!(report.created_dirs, 1);
}

#[test]
fn scenario_e_missing_source_root_fails_with_not_found() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("nope");
    let replica = temp.child("replica");

    let err = reconcile(source.path(), replica.path(), &mut |_: &ActionRecord| {})
        .expect_err("must fail");

    assert!(matches!(err, SyncError::Io { .. }), "got: {err}");
    assert_eq!(err.io_kind(), Some(ErrorKind::NotFound));
    assert!(err.to_string().contains("nope"), "message must name the path: {err}");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn one_pass_converges_from_a_messy_replica() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");

    source.child("keep.txt").write_str("v2").expect("write");
    source.child("docs/readme.md").write_str("# docs").expect("write");
    source.child("docs/img/logo.bin").write_binary(&[0, 1, 2, 255]).expect("write");
    source.child("empty").create_dir_all().expect("mkdir");
    source.child("swap").write_str("now a file").expect("write");
    source.child("flip/inner.txt").write_str("now a dir").expect("write");

    replica.child("keep.txt").write_str("v1").expect("write");
    replica.child("docs/readme.md").write_str("# docs").expect("write");
    replica.child("docs/stale.md").write_str("old").expect("write");
    replica.child("docs/img/old/deep.bin").write_str("x").expect("write");
    replica.child("swap/was_dir.txt").write_str("d").expect("write");
    replica.child("flip").write_str("was a file").expect("write");
    replica.child("orphan/a/b/c.txt").write_str("o").expect("write");

    pass(source.path(), replica.path());

    assert_eq!(snapshot(source.path()), snapshot(replica.path()));
}

#[test]
fn second_pass_performs_no_actions() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    source.child("a/b/c.txt").write_str("c").expect("write");
    source.child("d.txt").write_str("d").expect("write");
    replica.child("x.txt").write_str("x").expect("write");

    let (_, first) = pass(source.path(), replica.path());
    assert!(!first.is_empty());

    let (report, second) = pass(source.path(), replica.path());
    assert!(second.is_empty(), "unexpected actions: {second:?}");
    assert!(report.is_noop());
}

#[test]
fn identical_replica_file_is_not_rewritten() {
    use filetime::{set_file_mtime, FileTime};

    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    source.child("same.txt").write_str("same bytes").expect("write");
    replica.child("same.txt").write_str("same bytes").expect("write");

    let pinned = FileTime::from_unix_time(1_000_000_000, 0);
    set_file_mtime(replica.child("same.txt").path(), pinned).expect("pin mtime");

    pass(source.path(), replica.path());

    let meta = fs::metadata(replica.child("same.txt").path()).expect("metadata");
    assert_eq!(FileTime::from_last_modification_time(&meta), pinned);
}

#[test]
fn source_tree_is_never_modified() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    source.child("a.txt").write_str("a").expect("write");
    source.child("sub/b.txt").write_str("b").expect("write");
    replica.child("extra/z.txt").write_str("z").expect("write");

    let before = snapshot(source.path());
    pass(source.path(), replica.path());
    assert_eq!(snapshot(source.path()), before);
}

#[test]
fn replica_root_is_created_with_missing_ancestors() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    source.child("a.txt").write_str("a").expect("write");
    let replica = temp.child("deep/nested/replica");

    pass(source.path(), replica.path());

    replica.child("a.txt").assert("a");
}

#[test]
fn source_directory_named_like_a_temporary_does_not_block_updates() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    source.child("a.txt").write_str("v1").expect("write");
    source
        .child("a.txt.foldersync.tmp/inner.txt")
        .write_str("inner")
        .expect("write");

    pass(source.path(), replica.path());
    replica.child("a.txt").assert("v1");

    source.child("a.txt").write_str("v2").expect("write");
    for _ in 0..2 {
        pass(source.path(), replica.path());
    }

    replica.child("a.txt").assert("v2");
    replica
        .child("a.txt.foldersync.tmp/inner.txt")
        .assert("inner");
    assert_eq!(snapshot(source.path()), snapshot(replica.path()));
}

#[test]
fn large_file_round_trips_byte_for_byte() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let source = temp.child("source");
    let replica = temp.child("replica");
    let data: Vec<u8> = (0..300_000u32).map(|i| (i * 7 % 256) as u8).collect();
    source.child("big.bin").write_binary(&data).expect("write");

    pass(source.path(), replica.path());
    assert_eq!(fs::read(replica.child("big.bin").path()).expect("read"), data);

    // Same length, one byte different: still detected.
    let mut changed = data.clone();
    changed[150_000] ^= 0xff;
    source.child("big.bin").write_binary(&changed).expect("write");

    let (_, actions) = pass(source.path(), replica.path());
    assert_eq!(copies(&actions), 1);
    assert_eq!(fs::read(replica.child("big.bin").path()).expect("read"), changed);
}
