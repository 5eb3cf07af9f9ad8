//! One orchestration pass over the listing page.
//!
//! Pipeline per tick: fetch listing → extract releases → per channel:
//! collect URLs → build file records → fetch → verify → write manifest →
//! fetch/write changelog. Channels are independent and processed
//! sequentially; a failure is contained at the smallest unit (per file, per
//! channel) and only a listing-fetch failure aborts the tick. Each tick
//! returns a fresh `TickOutcome` instead of mutating shared release state.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::changelog;
use crate::config::MrgConfig;
use crate::fetcher;
use crate::manifest;
use crate::page::PageSource;
use crate::release::{Channel, FileStatus, ReleaseRecord};
use crate::scrape;
use crate::verify;

/// Everything one pass discovered and did, keyed by channel. Channels with no
/// version on the page are absent.
#[derive(Debug)]
pub struct TickOutcome {
    pub releases: BTreeMap<Channel, ReleaseRecord>,
}

/// Runs one scrape-fetch-verify pass. Errors only when the listing page
/// itself cannot be retrieved; everything downstream is logged and contained.
pub fn run_tick(cfg: &MrgConfig, pages: &dyn PageSource) -> Result<TickOutcome> {
    let listing_url = cfg.listing_url();
    let raw_bytes = pages
        .fetch(&listing_url)
        .with_context(|| format!("fetch listing page {}", listing_url))?;
    let raw = String::from_utf8_lossy(&raw_bytes);
    let normalized = scrape::normalize_listing(&raw);
    tracing::info!("processing {} listing lines", normalized.lines().count());

    let versions = scrape::extract_releases(&normalized);
    let mut releases = BTreeMap::new();
    for channel in Channel::ALL {
        let Some(version) = versions.get(&channel) else {
            tracing::debug!("no version found for \"{}\"", channel);
            continue;
        };
        let record = process_channel(cfg, pages, channel, version, &normalized, &raw);
        releases.insert(channel, record);
    }
    Ok(TickOutcome { releases })
}

fn process_channel(
    cfg: &MrgConfig,
    pages: &dyn PageSource,
    channel: Channel,
    version: &str,
    normalized: &str,
    raw: &str,
) -> ReleaseRecord {
    tracing::debug!("now working on release \"{}\" ({})", version, channel);
    let release_dir = cfg.download_root.join(version);
    if let Err(e) = fs::create_dir_all(&release_dir) {
        // Downloads into it will fail individually and be marked per file.
        tracing::error!("problem creating \"{}\": {}", release_dir.display(), e);
    }

    let mut record = ReleaseRecord::collect(channel, version, normalized, raw, &release_dir);
    fetcher::fetch_all(&mut record.files, &cfg.fetch_options());

    for file in &mut record.files {
        if file.status == FileStatus::Done && file.expected_sha256.is_some() {
            verify::verify(file);
        }
        tracing::info!(
            "\"{}\": {} ({} bytes)",
            file.filename,
            file.status,
            file.size_bytes
        );
    }

    if let Err(e) = manifest::write_sums(&record.files, &release_dir) {
        tracing::error!("problem saving checksum manifest for \"{}\": {:#}", version, e);
    }

    // Separate network call, after file processing: its failure only costs
    // the changelog document.
    let changelog_url = cfg.changelog_url();
    match pages.fetch(&changelog_url) {
        Ok(feed) => match changelog::extract_changelog(&feed, version) {
            Ok(Some(html)) => {
                if let Err(e) = manifest::write_changelog(&html, &release_dir) {
                    tracing::error!("problem saving changelog for \"{}\": {:#}", version, e);
                }
            }
            Ok(None) => tracing::warn!("no changelog entry found for \"{}\"", version),
            Err(e) => tracing::error!("problem reading changelog feed: {:#}", e),
        },
        Err(e) => tracing::error!("problem getting changelog feed: {:#}", e),
    }

    record
}

/// Re-entrancy guard for scheduled ticks. The interval trigger and a running
/// tick share no other state, so a tick firing while the previous one still
/// runs is skipped rather than queued.
#[derive(Debug, Default)]
pub struct TickGuard {
    running: AtomicBool,
}

impl TickGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard; `None` while another claim is alive. Released when
    /// the returned token drops.
    pub fn try_start(&self) -> Option<RunningTick<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then_some(RunningTick { guard: self })
    }
}

/// Releases the owning `TickGuard` when dropped.
pub struct RunningTick<'a> {
    guard: &'a TickGuard,
}

impl Drop for RunningTick<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}
