//! Digest verification of downloaded files.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::release::{FileStatus, ReleaseFile};

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}

/// Compares the on-disk digest of a downloaded file against the scraped one.
///
/// Case-sensitive hex equality. Only meaningful for files whose download
/// succeeded and whose listing entry published a digest; the caller filters.
/// A mismatching file is kept on disk for manual inspection.
pub fn verify(file: &mut ReleaseFile) {
    let Some(expected) = file.expected_sha256.as_deref() else {
        return;
    };
    tracing::debug!("checking hash of \"{}\"", file.local_path.display());
    match sha256_path(&file.local_path) {
        Ok(actual) if actual == expected => file.status = FileStatus::HashMatches,
        Ok(actual) => {
            tracing::error!(
                "hash mismatch for \"{}\": expected {}, got {}",
                file.local_path.display(),
                expected,
                actual
            );
            file.status = FileStatus::HashFailed;
        }
        Err(e) => {
            tracing::error!("problem hashing \"{}\": {:#}", file.local_path.display(), e);
            file.status = FileStatus::Error;
        }
    }
}
