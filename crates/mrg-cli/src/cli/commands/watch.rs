//! `mrg watch` – scheduled passes with an overlap guard.

use anyhow::Result;
use mrg_core::config::MrgConfig;
use mrg_core::page::HttpPageSource;
use mrg_core::tick::{self, TickGuard};
use std::time::Duration;

/// Runs a pass every `interval_secs` until the process is terminated. Missed
/// ticks are skipped, and a tick that fires while a pass is still running is
/// dropped: neither the release records nor the release directories are safe
/// under two concurrent passes.
pub async fn run_watch(cfg: &MrgConfig) -> Result<()> {
    let guard = TickGuard::new();
    let mut interval = tokio::time::interval(Duration::from_secs(cfg.interval_secs.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tracing::info!("watching {} every {}s", cfg.listing_url(), cfg.interval_secs);

    loop {
        interval.tick().await;
        let Some(_running) = guard.try_start() else {
            tracing::warn!("previous pass still running, skipping this tick");
            continue;
        };
        tracing::info!("running scheduled pass");

        let pass_cfg = cfg.clone();
        let result = tokio::task::spawn_blocking(move || {
            let pages = HttpPageSource::new(pass_cfg.fetch_timeout());
            tick::run_tick(&pass_cfg, &pages)
        })
        .await;

        match result {
            Ok(Ok(outcome)) => {
                tracing::info!("pass complete, {} release(s) handled", outcome.releases.len());
            }
            Ok(Err(e)) => tracing::error!("problem getting download page: {:#}", e),
            Err(e) => tracing::error!("pass task failed: {}", e),
        }
    }
}
