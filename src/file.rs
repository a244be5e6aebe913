// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::config::consts::DEFAULT_FILE;
use crate::core::sanitize::sanitize_filename;
use crate::error::{Result, ScrapeError};

/// Hands a finished export to the user.
pub trait Delivery {
    /// Returns where the bytes ended up.
    fn deliver(&mut self, bytes: &[u8], mime: &str, file_name: &str) -> Result<PathBuf>;
}

/// Writes exports into a directory, created on demand.
#[derive(Clone, Debug)]
pub struct FileDelivery {
    dir: PathBuf,
}

impl FileDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Delivery for FileDelivery {
    fn deliver(&mut self, bytes: &[u8], mime: &str, file_name: &str) -> Result<PathBuf> {
        ensure_directory(&self.dir)?;
        let path = self.dir.join(safe_file_name(file_name));

        // Full rewrite: an export always replaces the previous one.
        let mut out = BufWriter::new(File::create(&path)?);
        out.write_all(bytes)?;
        out.flush()?;

        logf!("Export: Wrote {} ({} bytes, {})", path.display(), bytes.len(), mime);
        Ok(path)
    }
}

/// Sanitized stem, extension kept (`.csv` when missing).
pub fn safe_file_name(name: &str) -> String {
    let p = Path::new(name.trim());
    let stem = p.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let stem = sanitize_filename(&stem, DEFAULT_FILE.trim_end_matches(".csv"));
    let ext = p.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_else(|| s!("csv"));
    join!(&stem, ".", &ext)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::Config(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Trailing separator: the user means a folder, even one that doesn't exist yet.
pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
