use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::FetchOptions;

/// Global configuration loaded from `~/.config/mrg/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MrgConfig {
    /// Vendor host serving the download page and changelog feed.
    pub host: String,
    /// Path of the release listing page on `host`.
    pub listing_path: String,
    /// Path of the changelog RSS feed on `host`.
    pub changelog_path: String,
    /// Root directory for downloads; each release gets a `<version>/` subdir.
    pub download_root: PathBuf,
    /// Re-fetch files that already exist locally.
    #[serde(default)]
    pub redownload: bool,
    /// Concurrent file downloads per batch; 1 = strictly sequential.
    pub fetch_concurrency: usize,
    /// Bound on each whole download attempt, in seconds.
    pub fetch_timeout_secs: u64,
    /// Scrape interval for `mrg watch`, in seconds.
    pub interval_secs: u64,
}

impl Default for MrgConfig {
    fn default() -> Self {
        Self {
            host: "mikrotik.com".to_string(),
            listing_path: "/download".to_string(),
            changelog_path: "/download/changelogs".to_string(),
            download_root: PathBuf::from("downloads"),
            redownload: false,
            fetch_concurrency: 1,
            fetch_timeout_secs: 600,
            interval_secs: 3600,
        }
    }
}

impl MrgConfig {
    pub fn listing_url(&self) -> String {
        format!("https://{}{}", self.host, self.listing_path)
    }

    pub fn changelog_url(&self) -> String {
        format!("https://{}{}", self.host, self.changelog_path)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            concurrency: self.fetch_concurrency,
            timeout: self.fetch_timeout(),
            redownload: self.redownload,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mrg")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MrgConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MrgConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MrgConfig = toml::from_str(&data)?;
    Ok(cfg)
}
