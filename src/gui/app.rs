// src/gui/app.rs
use std::{
    error::Error,
    sync::{mpsc::Receiver, Arc, Mutex},
    time::Duration,
};

use eframe::egui;

use crate::{
    config::state::AppState,
    csv::ExportRow,
    model::PlayerMeta,
    runner::RunSummary,
};

use super::{actions, components};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "FaB History",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

/// What the worker thread sends back when a run ends.
pub type WorkerResult = Result<RunSummary, String>;

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    // resume field, prefilled with the page a failed run stopped at
    pub resume_url: String,

    // last export shown in the table
    pub meta: Option<PlayerMeta>,
    pub rows: Vec<ExportRow>,

    // stored run (read from the session store)
    pub stored_in_progress: bool,
    pub stored_events: usize,

    // status/progress (worker writes here)
    pub status: Arc<Mutex<String>>,
    pub last_url: Arc<Mutex<Option<String>>>,
    pub worker: Option<Receiver<WorkerResult>>,
}

impl App {
    pub fn new(mut state: AppState) -> Self {
        if state.gui.profile_url.is_empty() {
            state.gui.profile_url = state.options.scrape.profile_url();
        }
        let out_path_text = state.options.export.out_path().to_string_lossy().into();

        let mut app = Self {
            state,
            out_path_text,
            out_path_dirty: false,
            resume_url: s!(),
            meta: None,
            rows: Vec::new(),
            stored_in_progress: false,
            stored_events: 0,
            status: Arc::new(Mutex::new(s!("Idle"))),
            last_url: Arc::new(Mutex::new(None)),
            worker: None,
        };

        actions::refresh_stored(&mut app);
        let path = app.state.options.export.out_path();
        if path.exists() {
            actions::load_export(&mut app, &path);
        }
        logf!("Init: profile={}, stored run={}", app.state.gui.profile_url, app.stored_in_progress);
        app
    }

    #[inline]
    pub fn running(&self) -> bool { self.worker.is_some() }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        actions::poll_worker(self);

        egui::TopBottomPanel::top("run_bar").show(ctx, |ui| {
            components::run_bar::draw(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::export_bar::draw(ui, self);

            ui.separator();

            components::history_table::draw(ui, self);
        });

        if self.running() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
