//! Download-link collection for a discovered release version.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// href attribute opener followed by a URL-safe token (letters, digits,
/// `.`, `:`, `_`, `-`, `/`).
fn href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"<a href="(?P<url>[0-9A-Za-z:._\-/]+)"#).unwrap())
}

/// True when `url` contains `version` as a complete version token.
///
/// Version strings are not uniquely delimited on the page, so a plain
/// substring test would let "7.1" claim URLs for "7.1.1" or "17.1". An
/// occurrence only counts when the surrounding characters do not continue a
/// version number: the preceding character must not be a digit or a dot, and
/// the following text must not start with a digit or a dot-then-digit.
/// (The `regex` crate has no lookaround, hence the manual boundary check.)
fn contains_version_token(url: &str, version: &str) -> bool {
    url.match_indices(version).any(|(start, _)| {
        let before_ok = !matches!(
            url[..start].chars().last(),
            Some(c) if c.is_ascii_digit() || c == '.'
        );
        let mut after = url[start + version.len()..].chars();
        let after_ok = match after.next() {
            None => true,
            Some(c) if c.is_ascii_digit() => false,
            Some('.') => !matches!(after.next(), Some(d) if d.is_ascii_digit()),
            Some(_) => true,
        };
        before_ok && after_ok
    })
}

/// Scans the normalized listing text for download links belonging to
/// `version`, in listing order, duplicates preserved.
pub fn collect_raw_urls(normalized_listing: &str, version: &str) -> Vec<String> {
    let mut raw = Vec::new();
    for line in normalized_listing.lines() {
        for caps in href_pattern().captures_iter(line) {
            let url = &caps["url"];
            if contains_version_token(url, version) {
                raw.push(url.to_string());
            }
        }
    }
    raw
}

/// Deduplicates and sorts ascending, so repeated runs over identical input
/// produce identical output ordering.
pub fn dedup_sorted(raw_urls: &[String]) -> Vec<String> {
    raw_urls
        .iter()
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}
