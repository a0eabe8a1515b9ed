//! Cookie-based fallback storage.
//!
//! Values are JSON-encoded and kept as cookies, one percent-encoded `name=value`
//! pair per line of `{data_dir}/cookies.txt`. Cookies carry no envelope, so entries
//! stored here never expire.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cookie::Cookie;
use serde_json::Value;
use tracing::debug;

use crate::Result;
use crate::consts::{COOKIE_FILENAME, MAX_COOKIE_BYTES};
use crate::error::BackendError;

#[derive(Debug, Clone, Default)]
pub struct CookieJar {
  path: Option<PathBuf>,
  /// Decoded cookie values by name.
  cookies: BTreeMap<String, String>,
}

impl CookieJar {
  /// Open (or create) the cookie file in `dir`.
  pub fn open(dir: &Path) -> Result<Self> {
    fs::create_dir_all(dir).map_err(|source| BackendError::CreateDir {
      path: dir.to_path_buf(),
      source,
    })?;

    let path = dir.join(COOKIE_FILENAME);
    let cookies = Self::load(&path)?;
    debug!(path = %path.display(), cookies = cookies.len(), "Opened cookie jar");

    Ok(Self {
      path: Some(path),
      cookies,
    })
  }

  /// A jar that is never written to disk.
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

    let mut cookies = BTreeMap::new();
    for (index, line) in content.lines().enumerate() {
      let line = line.trim();
      if line.is_empty() {
        continue;
      }
      let cookie = Cookie::parse_encoded(line).map_err(|_| BackendError::MalformedCookie {
        path: path.to_path_buf(),
        line: index + 1,
      })?;
      cookies.insert(cookie.name().to_string(), cookie.value().to_string());
    }
    Ok(cookies)
  }

  fn persist(&self) -> Result<()> {
    let Some(path) = &self.path else {
      return Ok(());
    };

    let temp_path = path.with_extension("txt.tmp");
    let write_err = |source: io::Error| BackendError::Write {
      path: path.clone(),
      source,
    };

    let mut content = String::new();
    for (name, value) in &self.cookies {
      content.push_str(&encode(name, value));
      content.push('\n');
    }

    fs::write(&temp_path, content).map_err(write_err)?;
    fs::rename(&temp_path, path).map_err(write_err)?;
    Ok(())
  }

  /// JSON-encode `value` and store it as the cookie `key`.
  ///
  /// Nothing changes in memory unless the jar file was written.
  pub fn put(&mut self, key: &str, value: &Value) -> Result<()> {
    validate_name(key)?;
    let text = serde_json::to_string(value)?;

    let size = encode(key, &text).len();
    if size > MAX_COOKIE_BYTES {
      return Err(BackendError::CookieTooLarge {
        name: key.to_string(),
        size,
        limit: MAX_COOKIE_BYTES,
      });
    }

    let previous = self.cookies.insert(key.to_string(), text);
    self.persist().inspect_err(|_| self.restore(key, previous))
  }

  /// The raw (JSON) text of cookie `key`.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.cookies.get(key).map(String::as_str)
  }

  /// Delete cookie `key`. A failed write leaves the jar unchanged.
  pub fn remove(&mut self, key: &str) -> Result<()> {
    validate_name(key)?;
    let Some(previous) = self.cookies.remove(key) else {
      return Ok(());
    };
    self.persist().inspect_err(|_| self.restore(key, Some(previous)))
  }

  /// Put `key` back the way it was before a change that failed to persist.
  fn restore(&mut self, key: &str, previous: Option<String>) {
    match previous {
      Some(value) => self.cookies.insert(key.to_string(), value),
      None => self.cookies.remove(key),
    };
  }

  pub fn len(&self) -> usize {
    self.cookies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cookies.is_empty()
  }
}

fn encode(name: &str, value: &str) -> String {
  Cookie::new(name.to_string(), value.to_string()).encoded().to_string()
}

/// Cookie names are RFC 6265 tokens: visible ASCII without separators.
fn validate_name(name: &str) -> Result<()> {
  const SEPARATORS: &[char] = &[
    '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '[', ']', '?', '=', '{', '}',
  ];

  let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_graphic() && !SEPARATORS.contains(&c));
  if valid {
    Ok(())
  } else {
    Err(BackendError::InvalidCookieName(name.to_string()))
  }
}
