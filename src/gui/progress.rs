// src/gui/progress.rs
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::progress::Progress;

/// Worker-side progress: writes the status line and the last URL the run
/// tried, and wakes the UI thread.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    last_url: Arc<Mutex<Option<String>>>,
    ctx: egui::Context,
    pages: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>, last_url: Arc<Mutex<Option<String>>>, ctx: egui::Context) -> Self {
        Self { status, last_url, ctx, pages: 0 }
    }
    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
        self.ctx.request_repaint();
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, start_url: &str) {
        self.pages = 0;
        self.set_status(format!("Starting at {}", start_url));
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn navigating(&mut self, url: &str) {
        if let Ok(mut u) = self.last_url.lock() {
            *u = Some(s!(url));
        }
    }
    fn page_done(&mut self, page_index: usize, events_found: usize, events_total: usize) {
        self.pages += 1;
        self.set_status(format!(
            "Page {}: {} events ({} total, {} pages)",
            page_index, events_found, events_total, self.pages
        ));
    }
    fn finish(&mut self) {
        self.ctx.request_repaint();
    }
}
