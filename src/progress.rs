// src/progress.rs
/// Progress reporting for a history run.
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called once when a run (or a resumed run) starts.
    fn begin(&mut self, _start_url: &str) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// About to load `url`. The last URL seen is where a failed run resumes.
    fn navigating(&mut self, _url: &str) {}

    /// One history page was extracted and persisted.
    fn page_done(&mut self, _page_index: usize, _events_found: usize, _events_total: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
