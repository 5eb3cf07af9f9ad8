//! Integration test: full tick against a local HTTP server.
//!
//! The listing page and changelog feed come from an in-memory `PageSource`;
//! the artifact downloads hit a real local server so the curl path, the
//! existence check, and the digest verification are all exercised end to end.

mod common;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use mrg_core::config::MrgConfig;
use mrg_core::page::PageSource;
use mrg_core::release::{Channel, FileStatus};
use mrg_core::tick::run_tick;
use tempfile::tempdir;

use common::file_server::FileServer;

const BODY_A: &[u8] = b"all packages 7.15.3\n";
const SHA_A: &str = "f0f1937ead747eff94bb060324e31a0beb395844081b093acb90925858d2434e";
const BODY_B: &[u8] = b"routeros 7.15.3 arm64\n";
const SHA_B: &str = "c47d167a5c1566f80574361de272840ce30dbfd8b18ef36f2ed6df28cf29ca6f";

struct StaticPages {
    pages: HashMap<String, Vec<u8>>,
}

impl PageSource for StaticPages {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("GET {} returned HTTP 404", url))
    }
}

fn listing_page(file_urls: &[&str]) -> String {
    let mut page = String::from("<html><strong>7.15.3 (Long-term)</strong>\n");
    for url in file_urls {
        page.push_str(&format!("<li><a href=\"{url}\">download</a></li>\n"));
    }
    // Checksum table layout for file a, inline bold layout for file b.
    page.push_str(&format!(
        "<tr><td>a-7.15.3.npk</td><td>MD5</td><td>00ff00ff</td></tr><tr><td>SHA256</td><td>{SHA_A}</td></tr>\n"
    ));
    page.push_str(&format!("<b>SHA256 </b>b-7.15.3.npk: {SHA_B}<br>\n"));
    page.push_str("</html>");
    page
}

fn changelog_feed() -> Vec<u8> {
    concat!(
        "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>RouterOS changelog</title>",
        "<item><title>RouterOS 7.16 [testing]</title><description>testing notes</description></item>",
        "<item><title>RouterOS 7.15.3 [long-term]</title>",
        "<description><![CDATA[<b>What's new in 7.15.3:</b><br>*) improved things;]]></description></item>",
        "</channel></rss>",
    )
    .as_bytes()
    .to_vec()
}

fn pages_for(cfg: &MrgConfig, listing: String) -> StaticPages {
    StaticPages {
        pages: HashMap::from([
            (cfg.listing_url(), listing.into_bytes()),
            (cfg.changelog_url(), changelog_feed()),
        ]),
    }
}

fn cfg_in(dir: &Path) -> MrgConfig {
    let mut cfg = MrgConfig::default();
    cfg.host = "listing.test".to_string();
    cfg.download_root = dir.to_path_buf();
    cfg.fetch_timeout_secs = 30;
    cfg
}

#[test]
fn tick_downloads_verifies_and_writes_outputs() {
    let server = FileServer::start(HashMap::from([
        ("/a-7.15.3.npk".to_string(), BODY_A.to_vec()),
        ("/b-7.15.3.npk".to_string(), BODY_B.to_vec()),
    ]));
    let download_root = tempdir().unwrap();
    let cfg = cfg_in(download_root.path());
    let pages = pages_for(
        &cfg,
        listing_page(&[&server.url("/b-7.15.3.npk"), &server.url("/a-7.15.3.npk")]),
    );

    let outcome = run_tick(&cfg, &pages).expect("run_tick");

    let record = outcome.releases.get(&Channel::Longterm).expect("longterm");
    assert_eq!(record.version, "7.15.3");
    // URLs are deduplicated and sorted, so file a comes first.
    assert_eq!(record.files.len(), 2);
    assert_eq!(record.files[0].filename, "a-7.15.3.npk");
    assert_eq!(record.files[1].filename, "b-7.15.3.npk");
    assert!(record
        .files
        .iter()
        .all(|f| f.status == FileStatus::HashMatches));
    assert_eq!(record.files[0].size_bytes, BODY_A.len() as u64);

    let release_dir = download_root.path().join("7.15.3");
    assert_eq!(fs::read(release_dir.join("a-7.15.3.npk")).unwrap(), BODY_A);
    assert_eq!(fs::read(release_dir.join("b-7.15.3.npk")).unwrap(), BODY_B);

    let sums = fs::read_to_string(release_dir.join("SHA256SUMS")).unwrap();
    assert_eq!(
        sums,
        format!("{SHA_A} *a-7.15.3.npk\n{SHA_B} *b-7.15.3.npk")
    );

    let changelog = fs::read_to_string(release_dir.join("CHANGELOG.md")).unwrap();
    assert!(changelog.contains("What's new in 7.15.3"));
    assert!(!changelog.contains("<b>"));

    assert_eq!(server.hits(), 2, "one GET per artifact");
}

#[test]
fn second_run_skips_existing_files_without_network() {
    let server = FileServer::start(HashMap::from([
        ("/a-7.15.3.npk".to_string(), BODY_A.to_vec()),
        ("/b-7.15.3.npk".to_string(), BODY_B.to_vec()),
    ]));
    let download_root = tempdir().unwrap();
    let cfg = cfg_in(download_root.path());
    let pages = pages_for(
        &cfg,
        listing_page(&[&server.url("/a-7.15.3.npk"), &server.url("/b-7.15.3.npk")]),
    );

    run_tick(&cfg, &pages).expect("first run");
    let hits_after_first = server.hits();
    assert_eq!(hits_after_first, 2);

    let outcome = run_tick(&cfg, &pages).expect("second run");
    let record = outcome.releases.get(&Channel::Longterm).expect("longterm");
    assert!(record
        .files
        .iter()
        .all(|f| f.status == FileStatus::SkippedExists));
    assert_eq!(
        server.hits(),
        hits_after_first,
        "second run must not fetch artifacts again"
    );
}

#[test]
fn missing_artifact_is_contained_to_that_file() {
    // Only file a is served; the listing also advertises a gone file.
    let server = FileServer::start(HashMap::from([(
        "/a-7.15.3.npk".to_string(),
        BODY_A.to_vec(),
    )]));
    let download_root = tempdir().unwrap();
    let cfg = cfg_in(download_root.path());
    let pages = pages_for(
        &cfg,
        listing_page(&[&server.url("/a-7.15.3.npk"), &server.url("/gone-7.15.3.npk")]),
    );

    let outcome = run_tick(&cfg, &pages).expect("run_tick");
    let record = outcome.releases.get(&Channel::Longterm).expect("longterm");

    let gone = record
        .files
        .iter()
        .find(|f| f.filename == "gone-7.15.3.npk")
        .expect("gone file record");
    assert_eq!(gone.status, FileStatus::Error);
    assert!(
        !gone.local_path.exists(),
        "404 must leave nothing at local_path"
    );

    let ok = record
        .files
        .iter()
        .find(|f| f.filename == "a-7.15.3.npk")
        .expect("good file record");
    assert_eq!(ok.status, FileStatus::HashMatches);
}
