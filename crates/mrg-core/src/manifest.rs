//! Per-release output files: `SHA256SUMS` and `CHANGELOG.md`.
//!
//! Both writers overwrite unconditionally. Failures are the caller's to log;
//! neither file is load-bearing for the next run.

use anyhow::{Context, Result};
use html2md::rewrite_html;
use std::fs;
use std::path::Path;

use crate::release::ReleaseFile;

pub const SUMS_FILENAME: &str = "SHA256SUMS";
pub const CHANGELOG_FILENAME: &str = "CHANGELOG.md";

/// Writes the checksum manifest: one `<digest> *<filename>` line per file, in
/// input order. Files without a published digest get an empty digest column so
/// the listing stays complete.
pub fn write_sums(files: &[ReleaseFile], release_dir: &Path) -> Result<()> {
    let lines: Vec<String> = files
        .iter()
        .map(|f| format!("{} *{}", f.expected_sha256.as_deref().unwrap_or(""), f.filename))
        .collect();
    let path = release_dir.join(SUMS_FILENAME);
    fs::write(&path, lines.join("\n")).with_context(|| format!("write {}", path.display()))
}

/// Converts the extracted changelog HTML snippet to Markdown and overwrites
/// the release's `CHANGELOG.md`.
pub fn write_changelog(changelog_html: &str, release_dir: &Path) -> Result<()> {
    let markdown = rewrite_html(changelog_html, true);
    let path = release_dir.join(CHANGELOG_FILENAME);
    fs::write(&path, markdown).with_context(|| format!("write {}", path.display()))
}
