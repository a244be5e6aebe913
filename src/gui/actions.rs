// src/gui/actions.rs
//
// Button handlers. Runs happen on a worker thread that owns its own page
// source and store handle; the UI thread only polls for the result.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};

use eframe::egui;

use crate::{
    core::HttpSource,
    csv::read_export,
    error::Result,
    file::FileDelivery,
    gui::{app::{App, WorkerResult}, progress::GuiProgress},
    pipeline::PipelineConfig,
    runner::{RunSummary, Runner},
    session,
    store::FileStore,
};

enum Job {
    Run { profile_url: String, history_url: String },
    Resume { url: String },
}

pub fn scrape(app: &mut App, ctx: &egui::Context) {
    let profile_url = s!(app.state.gui.profile_url.trim());
    if profile_url.is_empty() {
        app.status("Enter a profile URL first");
        return;
    }
    let history_url = app.state.options.scrape.history_url();
    logf!("Scrape: Begin profile={} history={}", profile_url, history_url);
    spawn(app, ctx, Job::Run { profile_url, history_url });
}

pub fn resume(app: &mut App, ctx: &egui::Context) {
    let url = s!(app.resume_url.trim());
    if url.is_empty() {
        app.status("Enter the history page to resume at");
        return;
    }
    logf!("Scrape: Resume at {}", url);
    spawn(app, ctx, Job::Resume { url });
}

pub fn reset(app: &mut App) {
    let res = FileStore::open_default().and_then(|mut st| session::clear(&mut st));
    match res {
        Ok(()) => app.status("Stored run cleared"),
        Err(e) => {
            loge!("Reset: {}", e);
            app.status(format!("Error: {e}"));
        }
    }
    refresh_stored(app);
}

/// Copy the typed output path into the export options (once, before a run).
pub fn apply_out_path(app: &mut App) {
    if app.out_path_dirty {
        app.state.options.export.set_path(&app.out_path_text);
        app.out_path_text = app.state.options.export.out_path().to_string_lossy().into_owned();
        app.out_path_dirty = false;
        logd!("UI: Output → {}", app.out_path_text);
    }
}

fn spawn(app: &mut App, ctx: &egui::Context, job: Job) {
    if app.running() {
        return;
    }
    apply_out_path(app);

    let opts = app.state.options.clone();
    let mut prog = GuiProgress::new(app.status.clone(), app.last_url.clone(), ctx.clone());
    let (tx, rx) = mpsc::channel::<WorkerResult>();

    thread::spawn(move || {
        let result = (|| -> Result<RunSummary> {
            let mut runner = Runner::new(
                HttpSource::new()?,
                FileStore::open_default()?,
                FileDelivery::new(opts.export.out_dir.clone()),
                PipelineConfig::from_options(&opts),
            );
            match job {
                Job::Run { profile_url, history_url } => runner.run(&profile_url, &history_url, Some(&mut prog)),
                Job::Resume { url } => runner.resume(&url, Some(&mut prog)),
            }
        })();
        // The UI may be gone already; nothing to do then.
        let _ = tx.send(result.map_err(|e| e.to_string()));
    });

    app.worker = Some(rx);
    app.status("Running…");
}

/// Pick up a finished worker, if any.
pub fn poll_worker(app: &mut App) {
    let Some(rx) = &app.worker else { return; };
    let msg = match rx.try_recv() {
        Ok(m) => m,
        Err(mpsc::TryRecvError::Empty) => return,
        Err(mpsc::TryRecvError::Disconnected) => Err(s!("Worker stopped unexpectedly")),
    };
    app.worker = None;

    match msg {
        Ok(summary) => {
            logf!("Scrape: OK pages={} events={} matches={}", summary.pages, summary.events, summary.matches);
            if let Some(path) = &summary.output {
                load_export(app, path);
                app.status(format!(
                    "Saved {} matches from {} events → {}",
                    summary.matches, summary.events, path.display()
                ));
            }
            app.resume_url.clear();
        }
        Err(e) => {
            loge!("Scrape: Error: {}", e);
            if let Some(url) = app.last_url.lock().ok().and_then(|u| u.clone()) {
                app.resume_url = url;
            }
            app.status(format!("Error: {e}"));
        }
    }
    refresh_stored(app);
}

/// Re-read the stored run so the Resume controls match reality.
pub fn refresh_stored(app: &mut App) {
    match FileStore::open_default() {
        Ok(st) => {
            let state = session::load(&st);
            app.stored_in_progress = state.in_progress;
            app.stored_events = state.events.len();
        }
        Err(e) => {
            logd!("Store: Unavailable ({})", e);
            app.stored_in_progress = false;
            app.stored_events = 0;
        }
    }
}

/// Show an exported file in the table.
pub fn load_export(app: &mut App, path: &Path) {
    match fs::read_to_string(path) {
        Ok(text) => {
            let history = read_export(&text);
            logf!("Table: Loaded {} rows from {}", history.rows.len(), path.display());
            app.meta = history.meta;
            app.rows = history.rows;
        }
        Err(e) => {
            loge!("Table: Cannot read {}: {}", path.display(), e);
            app.status(format!("Cannot read {}: {}", path.display(), e));
        }
    }
}

pub fn open_output_folder(app: &App) {
    let path = app.state.options.export.out_path();
    let folder = path.parent().unwrap_or(Path::new("."));

    // Find the nearest existing parent folder
    let folder_to_open = find_nearest_existing_parent(folder);

    let absolute_folder = match fs::canonicalize(&folder_to_open) {
        Ok(abs_path) => abs_path,
        Err(e) => {
            let msg = format!("Cannot resolve folder path: {}", e);
            loge!("{}", msg);
            app.status(msg);
            return;
        }
    };

    if let Err(e) = open_folder_in_explorer(&absolute_folder) {
        loge!("Failed to open folder: {}", e);
        app.status(format!("Failed to open folder: {}", e));
    } else {
        logf!("Opened folder: {}", absolute_folder.display());
    }
}

fn find_nearest_existing_parent(path: &Path) -> PathBuf {
    let mut current = path.to_path_buf();
    loop {
        if current.is_dir() {
            return current;
        }
        match current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => current = parent.to_path_buf(),
            _ => return PathBuf::from("."),
        }
    }
}

fn open_folder_in_explorer(path: &Path) -> std::result::Result<(), String> {
    #[cfg(target_os = "windows")]
    let cmd = "explorer";
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(target_os = "linux")]
    let cmd = "xdg-open";

    #[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
    {
        std::process::Command::new(cmd)
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to spawn {}: {}", cmd, e))?;
        Ok(())
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        let _ = path;
        Err(s!("Opening folders not supported on this platform"))
    }
}
