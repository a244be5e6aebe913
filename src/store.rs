// src/store.rs
//
// Durable key-value store that outlives a single page load.
//
// - StateStore: get/set/remove over string keys and values.
// - MemoryStore: HashMap-backed; lives as long as its owner (tests, GUI preview).
// - FileStore: one JSON object under `.store/`, loaded at construction and
//   written through on every mutation (temp file + rename).

use std::{collections::BTreeMap, fs, io, path::{Path, PathBuf}};

use crate::config::consts::{STORE_DIR, STORE_FILE};
use crate::error::Result;

pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: StateStore + ?Sized> StateStore for &mut T {
    fn get(&self, key: &str) -> Option<String> { (**self).get(key) }
    fn set(&mut self, key: &str, value: &str) -> Result<()> { (**self).set(key, value) }
    fn remove(&mut self, key: &str) -> Result<()> { (**self).remove(key) }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    map: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
    pub fn is_empty(&self) -> bool { self.map.is_empty() }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(s!(key), s!(value));
        Ok(())
    }
    fn remove(&mut self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl FileStore {
    /// `.store/session.json` under the working directory.
    pub fn open_default() -> Result<Self> {
        Self::open(PathBuf::from(STORE_DIR).join(STORE_FILE))
    }

    /// Load the store file. Missing file → empty store; unreadable JSON → empty
    /// store plus an error line (the next write replaces it).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let map = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(m) => m,
                Err(e) => {
                    loge!("Store: Corrupt {} ({}), starting empty", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        logd!("Store: Opened {} (keys={})", path.display(), map.len());
        Ok(Self { path, map })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.map)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(s!(key), s!(value));
        self.flush()
    }
    fn remove(&mut self, key: &str) -> Result<()> {
        if self.map.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
