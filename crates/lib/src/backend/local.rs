//! Persistent key/value storage.
//!
//! # Storage Layout
//!
//! ```text
//! {data_dir}/
//! └── local_storage.json   # {"<key>": "<envelope text>", ...}
//! ```
//!
//! Entries are held in memory and written through on every change. Writes go to a
//! temp file first and are renamed into place, so a crash never leaves a torn file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::consts::LOCAL_STORAGE_FILENAME;
use crate::error::BackendError;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
  /// Backing file; `None` keeps entries for this process only.
  path: Option<PathBuf>,
  entries: BTreeMap<String, String>,
}

impl LocalStorage {
  /// Open (or create) local storage in `dir`.
  ///
  /// The directory is created if needed, existing entries are loaded, and the
  /// file is written once to prove the location is usable.
  pub fn open(dir: &Path) -> Result<Self> {
    fs::create_dir_all(dir).map_err(|source| BackendError::CreateDir {
      path: dir.to_path_buf(),
      source,
    })?;

    let path = dir.join(LOCAL_STORAGE_FILENAME);
    let entries = Self::load(&path)?;
    let storage = Self {
      path: Some(path),
      entries,
    };
    storage.persist()?;

    debug!(path = %dir.display(), entries = storage.entries.len(), "Opened local storage");
    Ok(storage)
  }

  /// Local storage that lives only as long as this value.
  pub fn in_memory() -> Self {
    Self::default()
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
      Err(source) => {
        return Err(BackendError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    if content.trim().is_empty() {
      return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content).map_err(|source| BackendError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  fn persist(&self) -> Result<()> {
    let Some(path) = &self.path else {
      return Ok(());
    };

    let temp_path = path.with_extension("json.tmp");
    let write_err = |source: io::Error| BackendError::Write {
      path: path.clone(),
      source,
    };

    let content = serde_json::to_string_pretty(&self.entries)?;
    fs::write(&temp_path, content).map_err(write_err)?;
    fs::rename(&temp_path, path).map_err(write_err)?;
    Ok(())
  }

  /// Store `value` under `key`.
  ///
  /// The entry is kept in memory even when persisting fails; the error reports
  /// that the change did not reach disk.
  pub fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
    self.entries.insert(key.to_string(), value.to_string());
    self.persist()
  }

  pub fn get_item(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  /// Remove `key`; removing a missing key is not an error.
  pub fn remove_item(&mut self, key: &str) -> Result<()> {
    if self.entries.remove(key).is_none() {
      return Ok(());
    }
    self.persist()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
