//! Content digests: SHA-256 over a file's full byte stream.
//!
//! Files are hashed through a fixed-size buffer so arbitrarily large files
//! never have to fit in memory.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// Read buffer used while hashing.
pub const HASH_BUFFER_BYTES: usize = 64 * 1024;

/// SHA-256 fingerprint of a byte stream.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Hash everything `reader` yields until EOF.
    pub fn of_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; HASH_BUFFER_BYTES];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            hasher.update(&buf[..n]);
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Ok(Self(out))
    }

    /// Hash the file at `path`.
    pub fn of_file(path: &Path) -> Result<Self, SyncError> {
        let file = File::open(path).map_err(|e| io_err(path, e))?;
        Self::of_reader(file).map_err(|e| io_err(path, e))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.to_hex())
    }
}

/// Content equality for two regular files.
///
/// Differing lengths short-circuit to `false`. Equal lengths are never taken
/// as proof of equality; both files are hashed and the digests compared.
pub fn files_equal(a: &Path, b: &Path) -> Result<bool, SyncError> {
    let len_a = fs::metadata(a).map_err(|e| io_err(a, e))?.len();
    let len_b = fs::metadata(b).map_err(|e| io_err(b, e))?.len();
    if len_a != len_b {
        return Ok(false);
    }

    let digest_a = ContentDigest::of_file(a)?;
    let digest_b = ContentDigest::of_file(b)?;
    tracing::trace!(
        left = %a.display(),
        right = %b.display(),
        left_digest = %digest_a,
        right_digest = %digest_b,
        "compared digests"
    );
    Ok(digest_a == digest_b)
}
