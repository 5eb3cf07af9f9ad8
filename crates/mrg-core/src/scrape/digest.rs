//! Published SHA-256 lookup for a scraped filename.

use regex::Regex;

/// Finds the published SHA-256 for `filename` in the raw listing text.
///
/// Two page layouts are known, tried in this order; the first layout that
/// matches for this exact filename wins:
///
/// 1. checksum table row:
///    `>{file}</td><td>MD5</td><td>{hex}</td></tr><tr><td>SHA256</td><td>{hex}</td>`
/// 2. inline bold label: `<b>SHA256 </b>{file}: {hex}<br`
///
/// Returns `None` when neither layout matches — some entries legitimately
/// publish no digest, and an unrecognized third layout must stay `None` rather
/// than be guessed at. Verification is skipped for such files.
pub fn find_sha256(filename: &str, raw_listing: &str) -> Option<String> {
    let file = regex::escape(filename);
    let layouts = [
        format!(
            r">{file}</td><td>MD5</td><td>[0-9A-Za-z]+</td></tr><tr><td>SHA256</td><td>(?P<sha>[0-9A-Za-z]+)</td>"
        ),
        format!(r"<b>SHA256 </b>{file}: (?P<sha>[0-9A-Za-z]+)<br"),
    ];
    for layout in &layouts {
        let re = Regex::new(&format!("(?i){layout}")).ok()?;
        for line in raw_listing.lines() {
            if let Some(caps) = re.captures(line) {
                return Some(caps["sha"].to_string());
            }
        }
    }
    None
}
