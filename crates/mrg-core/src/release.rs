//! Release and file records built fresh on every scrape pass.
//!
//! Nothing here survives a tick: records are derived from the listing page,
//! consumed by the fetcher/verifier, summarized into the manifest, and dropped.
//! Re-run idempotence comes from the fetcher's on-disk existence check, not
//! from record identity.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::scrape;

/// Release track exposed by the vendor's download page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Longterm,
    Stable,
    Testing,
    Development,
}

impl Channel {
    /// All channels in the fixed processing order.
    pub const ALL: [Channel; 4] = [
        Channel::Longterm,
        Channel::Stable,
        Channel::Testing,
        Channel::Development,
    ];

    /// Marker character following the version on the listing page,
    /// e.g. `7.15.3 (Long-term)` appears as `>7.15.3 (L`.
    pub fn marker(self) -> char {
        match self {
            Channel::Longterm => 'L',
            Channel::Stable => 'S',
            Channel::Testing => 'T',
            Channel::Development => 'D',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Longterm => "longterm",
            Channel::Stable => "stable",
            Channel::Testing => "testing",
            Channel::Development => "development",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of handling one downloadable artifact within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Pending,
    Downloading,
    /// Downloaded this tick, digest not (yet) checked.
    Done,
    /// Already on disk with non-zero size; no network fetch performed.
    SkippedExists,
    HashMatches,
    HashFailed,
    Error,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileStatus::Pending => "pending",
            FileStatus::Downloading => "downloading",
            FileStatus::Done => "done",
            FileStatus::SkippedExists => "skipped, exists",
            FileStatus::HashMatches => "hash matches",
            FileStatus::HashFailed => "hash failed",
            FileStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// One downloadable artifact: source URL, destination, and published digest.
#[derive(Debug, Clone)]
pub struct ReleaseFile {
    pub url: String,
    /// Last path segment of `url`.
    pub filename: String,
    /// SHA-256 hex string scraped from the listing page. `None` when the page
    /// publishes no digest for this file; verification is then skipped.
    pub expected_sha256: Option<String>,
    /// `<download_root>/<version>/<filename>`.
    pub local_path: PathBuf,
    pub status: FileStatus,
    pub size_bytes: u64,
}

impl ReleaseFile {
    /// Builds a file record for `url`, looking up its published SHA-256 in the
    /// raw listing text.
    pub fn build(url: &str, raw_listing: &str, release_dir: &Path) -> ReleaseFile {
        let filename = filename_from_url(url);
        let expected_sha256 = scrape::find_sha256(&filename, raw_listing);
        let local_path = release_dir.join(&filename);
        ReleaseFile {
            url: url.to_string(),
            filename,
            expected_sha256,
            local_path,
            status: FileStatus::Pending,
            size_bytes: 0,
        }
    }
}

/// Everything discovered for one channel in one scrape pass.
#[derive(Debug, Clone)]
pub struct ReleaseRecord {
    pub channel: Channel,
    pub version: String,
    /// All URL matches in listing order, duplicates included.
    pub raw_urls: Vec<String>,
    /// Derived from `raw_urls`: deduplicated, sorted ascending. Never mutated
    /// independently, so repeated runs over identical input order identically.
    pub urls: Vec<String>,
    /// One entry per element of `urls`, same order.
    pub files: Vec<ReleaseFile>,
}

impl ReleaseRecord {
    /// Scrapes URLs for `version` out of the normalized listing text and
    /// builds the per-file records. `files.len() == urls.len()` on return.
    pub fn collect(
        channel: Channel,
        version: &str,
        normalized_listing: &str,
        raw_listing: &str,
        release_dir: &Path,
    ) -> ReleaseRecord {
        let raw_urls = scrape::collect_raw_urls(normalized_listing, version);
        let urls = scrape::dedup_sorted(&raw_urls);
        let files = urls
            .iter()
            .map(|u| ReleaseFile::build(u, raw_listing, release_dir))
            .collect();
        ReleaseRecord {
            channel,
            version: version.to_string(),
            raw_urls,
            urls,
            files,
        }
    }
}

/// Extracts the last path segment of a URL for use as the local filename.
///
/// Falls back to splitting on `/` when the URL does not parse absolutely
/// (scraped hrefs are occasionally scheme-relative).
pub fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if let Some(segment) = parsed.path().split('/').filter(|s| !s.is_empty()).last() {
            return segment.to_string();
        }
    }
    url.rsplit('/').next().unwrap_or(url).to_string()
}
