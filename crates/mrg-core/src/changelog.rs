//! Changelog extraction from the vendor's RSS feed.

use anyhow::{Context, Result};
use regex::Regex;

/// Finds the changelog entry for `version` in the raw RSS feed bytes.
///
/// Feed items are matched by testing the version string as a regex pattern
/// against each item title; the first matching item's description is used
/// (feed order, not necessarily the most recent entry). Returns `Ok(None)`
/// when no item title mentions the version.
pub fn extract_changelog(feed_xml: &[u8], version: &str) -> Result<Option<String>> {
    let channel = rss::Channel::read_from(feed_xml).context("parse changelog feed")?;
    // Version tokens are `[0-9A-Za-z.]+`, always a valid pattern. The dots
    // match any character; the title test is deliberately loose.
    let pattern = Regex::new(version).context("version pattern")?;
    for item in channel.items() {
        let title = item.title().unwrap_or_default();
        if pattern.is_match(title) {
            return Ok(item.description().map(str::to_string));
        }
    }
    Ok(None)
}
