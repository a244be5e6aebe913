// src/runner.rs
use std::path::PathBuf;
use std::thread;

use crate::{
    core::{Page, PageSource},
    error::{Result, ScrapeError},
    file::Delivery,
    model::RunState,
    pipeline::{Pipeline, PipelineConfig, Step},
    progress::Progress,
    session,
    store::StateStore,
};

/// Summary of what a run (or a single step) produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    /// Set once the run finished and was exported.
    pub output: Option<PathBuf>,
    pub events: usize,
    pub matches: usize,
    /// Set when a single step stopped with more pages to go.
    pub next_url: Option<String>,
}

/// Drives runs against a page source. Every page gets a brand-new `Pipeline`
/// built over the store, so an interrupted run continues exactly like an
/// uninterrupted one.
pub struct Runner<P: PageSource, S: StateStore, D: Delivery> {
    source: P,
    store: S,
    delivery: D,
    cfg: PipelineConfig,
}

impl<P: PageSource, S: StateStore, D: Delivery> Runner<P, S, D> {
    pub fn new(source: P, store: S, delivery: D, cfg: PipelineConfig) -> Self {
        Self { source, store, delivery, cfg }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn status(&self) -> RunState {
        session::load(&self.store)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.pipeline().reset()
    }

    fn pipeline(&mut self) -> Pipeline<&mut S> {
        Pipeline::with_config(&mut self.store, self.cfg.clone())
    }

    /// Reset the store for a new run and capture the player. Returns the
    /// first navigation (history page 1).
    pub fn start(&mut self, profile_url: &str, history_url: &str) -> Result<Step> {
        // The player block is optional; a failed profile fetch doesn't stop the run.
        let profile = match self.source.load(profile_url) {
            Ok(body) => Some(Page::parse(profile_url, &body)),
            Err(e) => {
                logw!("Runner: Profile page unavailable ({}), exporting without player info", e);
                None
            }
        };
        self.pipeline().start_run(profile.as_ref(), history_url)
    }

    /// Start a fresh run from the profile page and follow it to the end.
    pub fn run(
        &mut self,
        profile_url: &str,
        history_url: &str,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<RunSummary> {
        if let Some(p) = progress.as_deref_mut() {
            p.begin(profile_url);
            p.log("Reading player profile…");
        }
        let first = self.start(profile_url, history_url)?;
        self.drive(first, progress)
    }

    /// Continue a stored run, starting with `url`.
    pub fn resume(&mut self, url: &str, mut progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
        if !session::is_in_progress(&self.store) {
            return Err(ScrapeError::NotRunning);
        }
        if let Some(p) = progress.as_deref_mut() {
            p.begin(url);
        }
        logf!("Runner: Resuming at {}", url);
        self.drive(Step::Navigate { url: s!(url), delay: std::time::Duration::ZERO }, progress)
    }

    /// Process exactly one page, then stop. The caller comes back with
    /// `next_url` whenever it likes; nothing but the store carries over.
    pub fn step(&mut self, url: &str) -> Result<RunSummary> {
        let (visit_step, page_index) = self.visit(url)?;
        let mut summary = RunSummary { pages: 1, ..RunSummary::default() };
        match visit_step {
            Step::Idle => {
                logw!("Runner: Page {} loaded but no run is in progress", page_index);
                summary.pages = 0;
            }
            Step::Navigate { url, .. } => summary.next_url = Some(url),
            Step::Finished(export) => {
                summary.events = export.events;
                summary.matches = export.matches;
                summary.output = Some(self.delivery.deliver(&export.bytes, export.mime, &export.file_name)?);
            }
        }
        Ok(summary)
    }

    /// Load one page and hand it to a fresh pipeline.
    fn visit(&mut self, url: &str) -> Result<(Step, usize)> {
        let body = self.source.load(url)?;
        let page = Page::parse(url, &body);
        let visit = self.pipeline().on_page_load(&page)?;
        Ok((visit.step, visit.page_index))
    }

    fn drive(&mut self, first: Step, mut progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut step = first;

        let result = loop {
            match step {
                Step::Idle => break Ok(()),
                Step::Navigate { url, delay } => {
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    if let Some(p) = progress.as_deref_mut() {
                        p.navigating(&url);
                    }
                    let body = match self.source.load(&url) {
                        Ok(b) => b,
                        Err(e) => {
                            loge!("Runner: Loading {} failed ({}); the run stays resumable", url, e);
                            break Err(e);
                        }
                    };
                    let page = Page::parse(&url, &body);
                    let visit = match self.pipeline().on_page_load(&page) {
                        Ok(v) => v,
                        Err(e) => break Err(e),
                    };
                    summary.pages += 1;
                    if let Some(p) = progress.as_deref_mut() {
                        p.page_done(visit.page_index, visit.events_found, visit.events_total);
                    }
                    step = visit.step;
                }
                Step::Finished(export) => {
                    summary.events = export.events;
                    summary.matches = export.matches;
                    match self.delivery.deliver(&export.bytes, export.mime, &export.file_name) {
                        Ok(path) => {
                            if let Some(p) = progress.as_deref_mut() {
                                p.log(&format!("Saved {} matches to {}", export.matches, path.display()));
                            }
                            summary.output = Some(path);
                            break Ok(());
                        }
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        result.map(|()| summary)
    }
}
