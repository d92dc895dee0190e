//! Download COT report pages into the cache directory.

use crate::adapters::cache_dir_adapter::cache_file_name;
use crate::domain::error::CotError;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub struct HttpFetchAdapter {
    client: reqwest::blocking::Client,
    cache_dir: PathBuf,
    refresh: bool,
}

impl HttpFetchAdapter {
    pub fn new(cache_dir: PathBuf, user_agent: &str, timeout: Duration) -> Result<Self, CotError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| CotError::Fetch {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            cache_dir,
            refresh: false,
        })
    }

    /// Re-download pages that are already cached.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Fetch `url` into `<source_id>_<date>.html` unless that page is already
    /// cached and refresh is off.
    pub fn download_and_cache(
        &self,
        source_id: &str,
        url: &str,
        date: NaiveDate,
    ) -> Result<PathBuf, CotError> {
        let path = self.cache_dir.join(cache_file_name(source_id, date));
        if path.exists() && !self.refresh {
            info!(source = source_id, "cache hit: {}", path.display());
            return Ok(path);
        }

        info!(source = source_id, "downloading {url}");
        let fetch_error = |reason: String| CotError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }
        let body = response.text().map_err(|e| fetch_error(e.to_string()))?;

        fs::create_dir_all(&self.cache_dir)?;
        fs::write(&path, body)?;
        info!(source = source_id, "saved {}", path.display());
        Ok(path)
    }

    /// Fetch every `(source id, url)` pair; failures are logged and skipped.
    pub fn fetch_all(&self, sources: &[(String, String)], date: NaiveDate) -> Vec<PathBuf> {
        sources
            .iter()
            .filter_map(|(id, url)| match self.download_and_cache(id, url, date) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(source = %id, "{e}");
                    None
                }
            })
            .collect()
    }
}
