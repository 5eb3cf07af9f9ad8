//! Page fetching: the network boundary for listing and changelog documents.
//!
//! The orchestrator only depends on the `PageSource` trait, so scraping and
//! tick logic are testable against canned page text without a network.

use anyhow::{Context, Result};
use std::time::Duration;

/// Capability to fetch a document body by URL.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// libcurl-backed `PageSource` used in production.
pub struct HttpPageSource {
    timeout: Duration,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl PageSource for HttpPageSource {
    /// GETs `url` and returns the body. Follows redirects; any final status
    /// outside 2xx is an error.
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(Duration::from_secs(15))?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform().context("GET request failed")?;
        }

        let code = easy.response_code().context("no response code")?;
        if !(200..300).contains(&code) {
            anyhow::bail!("GET {} returned HTTP {}", url, code);
        }
        Ok(body)
    }
}
