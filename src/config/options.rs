// src/config/options.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::error::{Result, ScrapeError};
use crate::file::looks_like_dir_hint;
use crate::model::RatedStatus;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
}

impl AppOptions {
    /// Read options from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("{}: {}", path.display(), e)))?;
        let opts: AppOptions = serde_json::from_str(&text)?;
        logd!("Config: Loaded {}", path.display());
        Ok(opts)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    pub base_url: String,
    pub profile_path: String,
    pub history_path: String,
    /// Pause before every navigation (ms)
    pub delay_ms: u64,
    /// Runaway guard; the run finalizes once this many pages were extracted
    pub max_pages: usize,
    /// Rated status when an event carries no rating marker
    pub rated_default: RatedStatus,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            profile_path: s!(PROFILE_PATH),
            history_path: s!(HISTORY_PATH),
            delay_ms: NAVIGATION_DELAY_MS,
            max_pages: MAX_PAGES,
            rated_default: RatedStatus::No,
        }
    }
}

impl ScrapeOptions {
    pub fn profile_url(&self) -> String {
        join!(self.base_url.trim_end_matches('/'), &self.profile_path)
    }

    /// First page of the paginated history view.
    pub fn history_url(&self) -> String {
        join!(self.base_url.trim_end_matches('/'), &self.history_path)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub file_name: String,
    /// Emit the `#`-prefixed player block above the header
    pub include_meta: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_name: s!(DEFAULT_FILE),
            include_meta: true,
        }
    }
}

impl ExportOptions {
    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(&self.file_name)
    }

    /// Split a user-typed path into dir + file name. A bare directory keeps the current name.
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        if s.is_empty() {
            return;
        }
        let p = Path::new(s);
        if looks_like_dir_hint(p) || p.is_dir() {
            self.out_dir = p.to_path_buf();
            return;
        }
        if let Some(parent) = p.parent() {
            self.out_dir = parent.to_path_buf();
        }
        if let Some(name) = p.file_name() {
            self.file_name = name.to_string_lossy().into_owned();
        }
    }
}
