//! Concurrent file fetcher.
//!
//! Bounded worker pool over a shared work queue: `concurrency` OS threads pop
//! files and report results over a channel. The queue always drains — an error
//! in one item is reported and that file marked `Error` while the rest
//! continue — and the batch-complete notification fires exactly once.

mod error;
mod get;

pub use error::FetchError;

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::release::{FileStatus, ReleaseFile};

/// Knobs for one fetch batch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Worker count; 1 means strictly sequential.
    pub concurrency: usize,
    /// Bound on each whole download attempt.
    pub timeout: Duration,
    /// When true, fetch even if the file already exists locally.
    pub redownload: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            timeout: Duration::from_secs(600),
            redownload: false,
        }
    }
}

/// Fetches every file in the batch, updating each record's status and size in
/// place. Files already present with non-zero size are skipped unless
/// `redownload` is set; that existence check is the whole of MRG's re-run
/// idempotence.
pub fn fetch_all(files: &mut [ReleaseFile], opts: &FetchOptions) {
    let mut queue: VecDeque<(usize, String, PathBuf)> = VecDeque::new();
    for (index, file) in files.iter_mut().enumerate() {
        if !opts.redownload && exists_non_empty(&file.local_path) {
            tracing::debug!("\"{}\" already on disk, skipping", file.local_path.display());
            file.status = FileStatus::SkippedExists;
        } else {
            file.status = FileStatus::Downloading;
            queue.push_back((index, file.url.clone(), file.local_path.clone()));
        }
    }

    let count = queue.len();
    if count > 0 {
        tracing::info!("files to be downloaded: {}", count);
        let work = Arc::new(Mutex::new(queue));
        let (tx, rx) = mpsc::channel();
        let num_workers = opts.concurrency.max(1).min(count);
        let timeout = opts.timeout;
        let mut handles = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let work = Arc::clone(&work);
            let tx = tx.clone();
            handles.push(std::thread::spawn(move || loop {
                let (index, url, path) = match work.lock().unwrap().pop_front() {
                    Some(item) => item,
                    None => break,
                };
                tracing::info!("now downloading \"{}\"", url);
                let res = get::download_one(&url, &path, timeout);
                let _ = tx.send((index, res));
            }));
        }
        drop(tx);

        for _ in 0..count {
            let (index, res) = rx.recv().expect("worker result");
            match res {
                Ok(size) => {
                    files[index].status = FileStatus::Done;
                    files[index].size_bytes = size;
                }
                Err(e) => {
                    tracing::error!("problem downloading \"{}\": {}", files[index].url, e);
                    files[index].status = FileStatus::Error;
                }
            }
        }
        for h in handles {
            h.join().unwrap_or_else(|e| panic!("worker panicked: {:?}", e));
        }
    }

    // Batch completion: exactly once per call, even when everything was skipped.
    tracing::info!("all files fetched");
}

/// True when the path exists with a non-zero size. A zero-byte leftover does
/// not count as downloaded.
fn exists_non_empty(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.len() > 0,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::error!("problem checking \"{}\": {}", path.display(), e);
            false
        }
    }
}
