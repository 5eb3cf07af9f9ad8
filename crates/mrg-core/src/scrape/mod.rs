//! Listing-page scraping: pure text-in, records-out functions.
//!
//! Everything here is regex-driven and network-free so the patterns can be
//! unit tested against captured page snippets. The page markup is only loosely
//! structured; see the per-function notes for the known fragilities.

mod digest;
mod urls;
mod version;

pub use digest::find_sha256;
pub use urls::{collect_raw_urls, dedup_sorted};
pub use version::extract_releases;

/// Normalizes raw listing HTML for release and URL scanning by breaking the
/// page at every `td>` and `li>` tag close, so each version label and download
/// link lands on its own line. Digest lookup runs over the raw text instead;
/// the checksum table rows must stay intact.
pub fn normalize_listing(raw: &str) -> String {
    raw.replace("td>", "\n").replace("li>", "\n")
}
