//! Per-channel release version extraction.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::release::Channel;

/// Matches a version token immediately followed by a channel marker, e.g.
/// `>7.15.3 (L` on a "7.15.3 (Long-term)" line. The marker letter selects the
/// channel; anything else after the `(` is not a release line.
fn release_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r">(?P<release>[0-9A-Za-z.]+)\s\((?P<marker>[LSTD])").unwrap()
    })
}

/// Scans the normalized listing text line by line and returns the version
/// discovered for each channel. Later matches overwrite earlier ones, so the
/// most recently seen value wins. Channels with no matching line are absent
/// from the map and must be skipped downstream.
pub fn extract_releases(normalized_listing: &str) -> BTreeMap<Channel, String> {
    let mut found = BTreeMap::new();
    for line in normalized_listing.lines() {
        for caps in release_pattern().captures_iter(line) {
            let marker = caps["marker"].chars().next().unwrap_or_default();
            let Some(channel) = Channel::ALL.iter().copied().find(|c| c.marker() == marker)
            else {
                continue;
            };
            found.insert(channel, caps["release"].to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_longterm_and_stable() {
        let listing = ">7.15.3 (L\nsome noise\n>7.14.2 (S\n";
        let found = extract_releases(listing);
        assert_eq!(found.get(&Channel::Longterm).map(String::as_str), Some("7.15.3"));
        assert_eq!(found.get(&Channel::Stable).map(String::as_str), Some("7.14.2"));
        assert!(!found.contains_key(&Channel::Testing));
        assert!(!found.contains_key(&Channel::Development));
    }

    #[test]
    fn no_matches_yields_empty_map() {
        let found = extract_releases("<html><body>nothing to see</body></html>");
        assert!(found.is_empty());
    }

    #[test]
    fn last_match_wins_per_channel() {
        let listing = ">7.14.0 (S\n>7.14.1 (S\n>7.14.2 (S\n";
        let found = extract_releases(listing);
        assert_eq!(found.get(&Channel::Stable).map(String::as_str), Some("7.14.2"));
    }

    #[test]
    fn marker_must_follow_open_paren() {
        // "(Beta" is not a channel marker; "7.16beta2 (T" is testing.
        let listing = ">7.99 (Beta\n>7.16beta2 (T\n";
        let found = extract_releases(listing);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found.get(&Channel::Testing).map(String::as_str),
            Some("7.16beta2")
        );
    }
}
