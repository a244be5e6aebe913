// src/core/net.rs
//
// Page loading. "Navigating" to a URL means asking a `PageSource` for its
// body; callers build a fresh pipeline for every page they load.

use std::time::Duration;

use reqwest::Url;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Result, ScrapeError};

pub trait PageSource {
    /// Fetch the document behind `url`.
    fn load(&mut self, url: &str) -> Result<String>;
}

/// Blocking HTTP(S) page source. One attempt per URL; no retry.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn load(&mut self, url: &str) -> Result<String> {
        let t = std::time::Instant::now();
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status { status: status.as_u16(), url: s!(url) });
        }
        let body = resp.text()?;
        logd!("Net: GET {} ({} bytes) in {:?}", url, body.len(), t.elapsed());
        Ok(body)
    }
}

/// Resolve a (possibly relative) link found on `base`.
pub fn resolve_url(base: &str, href: &str) -> Result<String> {
    let base_url = Url::parse(base).map_err(|e| ScrapeError::Url { url: s!(base), reason: e.to_string() })?;
    let joined = base_url
        .join(href)
        .map_err(|e| ScrapeError::Url { url: s!(href), reason: e.to_string() })?;
    Ok(joined.into())
}
