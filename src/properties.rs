//! Per-user key/value property storage.
//!
//! The API key (and the historic-data access flag derived from it) live in a
//! [`PropertyStore`]. The store is handed to [`SanSheets`](crate::SanSheets)
//! at build time; nothing reads properties through a global.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// String-keyed property storage scoped to a single user.
///
/// Methods take `&self`; implementations use interior mutability since the
/// crate is single-threaded.
pub trait PropertyStore {
    /// Read a property, `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a property, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a property. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryPropertyStore
// ---------------------------------------------------------------------------

/// In-memory store that lives as long as the session.
#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FilePropertyStore
// ---------------------------------------------------------------------------

/// Store backed by a single JSON object on disk.
///
/// Every write goes to a temp file in the same directory which is then
/// persisted over the target, so a crash mid-write never leaves a truncated
/// properties file behind.
#[derive(Debug, Clone)]
pub struct FilePropertyStore {
    path: PathBuf,
}

impl FilePropertyStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// The file itself is only created on the first write.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string_pretty(values)?.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl PropertyStore for FilePropertyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}
