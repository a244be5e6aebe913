// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://gem.fabtcg.com";
pub const PROFILE_PATH: &str = "/profile/player/";
pub const HISTORY_PATH: &str = "/profile/history/?page=1";
pub const USER_AGENT: &str = concat!("fab_history/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 20;

// Local store
pub const STORE_DIR: &str = ".store";
pub const STORE_FILE: &str = "session.json";
pub const LOG_FILE: &str = "debug.log";
pub const LOG_ENV: &str = "FAB_HISTORY_LOG";

// Scrape
pub const NAVIGATION_DELAY_MS: u64 = 2000; // be polite
pub const MAX_PAGES: usize = 500;
pub const UNKNOWN: &str = "Unknown";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "match_history.csv";
pub const CSV_MIME: &str = "text/csv;charset=utf-8";
