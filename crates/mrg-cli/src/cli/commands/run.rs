//! `mrg run` – one scrape-and-download pass.

use anyhow::Result;
use mrg_core::config::MrgConfig;
use mrg_core::page::HttpPageSource;
use mrg_core::release::FileStatus;
use mrg_core::tick;

pub fn run_once(cfg: &MrgConfig) -> Result<()> {
    let pages = HttpPageSource::new(cfg.fetch_timeout());
    let outcome = tick::run_tick(cfg, &pages)?;

    if outcome.releases.is_empty() {
        println!("No releases discovered.");
        return Ok(());
    }
    for (channel, record) in &outcome.releases {
        println!("{} {} ({} files)", channel, record.version, record.files.len());
        for file in &record.files {
            println!("  {}  {}", file.filename, file.status);
        }
    }

    let failed = outcome
        .releases
        .values()
        .flat_map(|r| &r.files)
        .filter(|f| matches!(f.status, FileStatus::Error | FileStatus::HashFailed))
        .count();
    if failed > 0 {
        tracing::warn!("{} file(s) ended in error or hash failure", failed);
    }
    Ok(())
}
