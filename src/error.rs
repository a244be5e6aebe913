// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid URL '{url}': {reason}")]
    Url { url: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("No run in progress")]
    NotRunning,
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
