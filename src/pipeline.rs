// src/pipeline.rs
//! Run orchestration, one page at a time.
//!
//! ```text
//!  Idle ──(entry page, no run)──▶ AwaitingTrigger
//!    ▲                                │ start_run
//!    │                                ▼
//!  Finalizing ◀──(no next link)── ExtractingPage ◀──┐
//!                                     │             │ next load
//!                                     └─▶ Navigating ┘
//! ```
//!
//! A `Pipeline` keeps nothing in memory except its store handle: every call
//! re-reads `RunState` and derives where the run stands from the stored
//! progress flag. Callers are expected to drop the pipeline after each page
//! and build a new one for the next, so continuing and resuming are the same
//! code path.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::consts::CSV_MIME;
use crate::config::options::AppOptions;
use crate::core::net::resolve_url;
use crate::core::Page;
use crate::csv;
use crate::error::{Result, ScrapeError};
use crate::model::RunState;
use crate::session;
use crate::specs::history::{self, ExtractOptions};
use crate::specs::pagination::{self, NextPage};
use crate::specs::profile;
use crate::store::StateStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    AwaitingTrigger,
    ExtractingPage,
    Navigating,
    Finalizing,
}

/// Finished export, ready for delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub file_name: String,
    pub events: usize,
    pub matches: usize,
}

/// What the caller should do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// No run in progress; nothing to do on this page.
    Idle,
    /// Load `url` after waiting `delay`.
    Navigate { url: String, delay: Duration },
    /// The run ended and the store is clear again.
    Finished(Export),
}

impl Step {
    /// State this step moves the machine into. `Finished` is the
    /// `Finalizing` hand-off; the store is already idle again by then.
    pub fn state(&self) -> PipelineState {
        match self {
            Step::Idle => PipelineState::Idle,
            Step::Navigate { .. } => PipelineState::Navigating,
            Step::Finished(_) => PipelineState::Finalizing,
        }
    }
}

/// Per-page report returned by `on_page_load`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Visit {
    pub page_index: usize,
    pub events_found: usize,
    pub events_total: usize,
    pub step: Step,
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub extract: ExtractOptions,
    pub delay: Duration,
    pub max_pages: usize,
    pub include_meta: bool,
    pub file_name: String,
    pub clock: fn() -> DateTime<Utc>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_options(&AppOptions::default())
    }
}

impl PipelineConfig {
    pub fn from_options(opts: &AppOptions) -> Self {
        Self {
            extract: ExtractOptions { rated_default: opts.scrape.rated_default },
            delay: Duration::from_millis(opts.scrape.delay_ms),
            max_pages: opts.scrape.max_pages.max(1),
            include_meta: opts.export.include_meta,
            file_name: opts.export.file_name.clone(),
            clock: Utc::now,
        }
    }
}

pub struct Pipeline<S: StateStore> {
    store: S,
    cfg: PipelineConfig,
}

impl<S: StateStore> Pipeline<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, PipelineConfig::default())
    }

    pub fn with_config(store: S, cfg: PipelineConfig) -> Self {
        Self { store, cfg }
    }

    pub fn run_state(&self) -> RunState {
        session::load(&self.store)
    }

    /// Where the run stands for an ordinary page load.
    pub fn state(&self) -> PipelineState {
        if session::is_in_progress(&self.store) {
            PipelineState::ExtractingPage
        } else {
            PipelineState::Idle
        }
    }

    /// Same, seen from the entry (profile) page, where a run can be started.
    pub fn entry_state(&self) -> PipelineState {
        match self.state() {
            PipelineState::Idle => PipelineState::AwaitingTrigger,
            other => other,
        }
    }

    /// Trigger: reset the run, capture the player once, go to history page 1.
    pub fn start_run(&mut self, profile_page: Option<&Page>, history_url: &str) -> Result<Step> {
        let stale = session::load(&self.store);
        if stale.in_progress {
            logw!(
                "Pipeline: Discarding unfinished run ({} events stored)",
                stale.events.len()
            );
        }

        let meta = profile_page.map(|p| profile::extract_meta(p.root()));
        if let Some(m) = &meta {
            logf!("Pipeline: Run started for {} (GEM ID {})", m.name, m.gem_id);
        } else {
            logf!("Pipeline: Run started without a profile page");
        }

        session::save(&mut self.store, &RunState::started(meta))?;
        Ok(Step::Navigate { url: s!(history_url), delay: Duration::ZERO })
    }

    /// Handle one freshly loaded history page.
    pub fn on_page_load(&mut self, page: &Page) -> Result<Visit> {
        let mut state = session::load(&self.store);
        let root = page.root();
        let page_index = pagination::current_page_index(root);

        if !state.in_progress {
            logd!("Pipeline: No run in progress at {}", page.url);
            return Ok(Visit { page_index, events_found: 0, events_total: 0, step: Step::Idle });
        }

        let events = history::extract(root, &self.cfg.extract);
        let events_found = events.len();
        state.events.extend(events);
        state.pages_visited += 1;
        session::save(&mut self.store, &state)?;
        let events_total = state.events.len();
        logf!(
            "Pipeline: Page {} ({} visited) → {} events (total {})",
            page_index, state.pages_visited, events_found, events_total
        );

        let step = match self.next_url(page, page_index, state.pages_visited) {
            Some(url) => Step::Navigate { url, delay: self.cfg.delay },
            None => Step::Finished(self.finalize()?),
        };
        Ok(Visit { page_index, events_found, events_total, step })
    }

    /// `visited` counts pages of this run, labels notwithstanding, so a pager
    /// that cycles or mislabels its pages still hits the limit.
    fn next_url(&self, page: &Page, page_index: usize, visited: usize) -> Option<String> {
        match pagination::next_page(page.root()) {
            NextPage::Target(_) if visited >= self.cfg.max_pages => {
                logw!("Pipeline: Page limit {} reached after {} pages, stopping early", self.cfg.max_pages, visited);
                None
            }
            NextPage::Target(href) => match resolve_url(&page.url, &href) {
                Ok(url) => Some(url),
                Err(e) => {
                    logw!("Pipeline: Unusable next link ({}), ending run", e);
                    None
                }
            },
            NextPage::End(reason) if reason.is_suspicious() => {
                logw!("Pipeline: Pagination ended on page {} ({:?}); history may be truncated", page_index, reason);
                None
            }
            NextPage::End(reason) => {
                logd!("Pipeline: Pagination ended on page {} ({:?})", page_index, reason);
                None
            }
        }
    }

    /// Serialize the stored run, then clear it.
    pub fn finalize(&mut self) -> Result<Export> {
        let state = session::load(&self.store);
        if !state.in_progress {
            return Err(ScrapeError::NotRunning);
        }

        let text = csv::serialize(&state, (self.cfg.clock)(), self.cfg.include_meta);
        let export = Export {
            bytes: text.into_bytes(),
            mime: CSV_MIME,
            file_name: self.cfg.file_name.clone(),
            events: state.events.len(),
            matches: state.match_count(),
        };

        session::clear(&mut self.store)?;
        logf!("Pipeline: Finalized {} events / {} matches", export.events, export.matches);
        Ok(export)
    }

    /// Drop any stored run without exporting it.
    pub fn reset(&mut self) -> Result<()> {
        session::clear(&mut self.store)
    }
}
