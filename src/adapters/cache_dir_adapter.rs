//! Cached HTML report pages on disk.
//!
//! Pages are stored as `<source id>_<YYYY-MM-DD>.html`; any other `*.html`
//! file is picked up too, with its whole stem as the source id.

use crate::adapters::html_pre::extract_pre_text;
use crate::domain::error::CotError;
use crate::ports::source_port::{SourcePort, SourceRef};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const CACHE_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CacheDirAdapter {
    cache_dir: PathBuf,
    date: Option<NaiveDate>,
}

impl CacheDirAdapter {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            date: None,
        }
    }

    /// Only pages cached on `date`.
    pub fn for_date(cache_dir: PathBuf, date: NaiveDate) -> Self {
        Self {
            cache_dir,
            date: Some(date),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn wanted(&self, stem: &str) -> bool {
        match self.date {
            Some(date) => cache_date(stem) == Some(date),
            None => true,
        }
    }
}

/// File name a page for `source_id` fetched on `date` is cached under.
pub fn cache_file_name(source_id: &str, date: NaiveDate) -> String {
    format!("{}_{}.html", source_id, date.format(CACHE_DATE_FORMAT))
}

fn cache_date(stem: &str) -> Option<NaiveDate> {
    let (_, suffix) = stem.rsplit_once('_')?;
    NaiveDate::parse_from_str(suffix, CACHE_DATE_FORMAT).ok()
}

/// `financial_lf_2025-07-01` → `financial_lf`; stems without a date suffix are kept whole.
pub fn source_id_from_stem(stem: &str) -> String {
    match stem.rsplit_once('_') {
        Some((id, _)) if cache_date(stem).is_some() && !id.is_empty() => id.to_string(),
        _ => stem.to_string(),
    }
}

impl SourcePort for CacheDirAdapter {
    fn sources(&self) -> Result<Vec<SourceRef>, CotError> {
        let entries = fs::read_dir(&self.cache_dir).map_err(|e| CotError::Source {
            source_id: self.cache_dir.display().to_string(),
            reason: format!("failed to read cache directory: {e}"),
        })?;

        let mut pages = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_html = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
            if !is_html || !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if self.wanted(stem) {
                pages.push(SourceRef {
                    id: source_id_from_stem(stem),
                    location: path.display().to_string(),
                });
            }
        }

        pages.sort_by(|a, b| a.location.cmp(&b.location));
        Ok(pages)
    }

    fn load_text(&self, source: &SourceRef) -> Result<Option<String>, CotError> {
        let bytes = fs::read(&source.location).map_err(|e| CotError::Source {
            source_id: source.id.clone(),
            reason: format!("failed to read {}: {e}", source.location),
        })?;
        Ok(extract_pre_text(&String::from_utf8_lossy(&bytes)))
    }
}
