// src/config/state.rs
use super::options::AppOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    /// Profile page the run starts from
    pub profile_url: String,

    pub window_w: u32,
    pub window_h: u32,

    /// History table -> show/hide the Rating Change column
    pub show_rating_change: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            profile_url: s!(),
            window_w: 1100,
            window_h: 700,
            show_rating_change: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
