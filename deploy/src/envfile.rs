//! Flat `KEY=VALUE` environment file codec
//!
//! Lines are parsed one at a time. Blank lines, comments and anything that
//! does not look like `KEY=VALUE` are skipped rather than rejected. Lookup of an
//! absent key yields an empty string.

use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;
use tempfile::NamedTempFile;

use crate::error::Result;

/// Keys recognized by the installer
pub const VERSION: &str = "VERSION";
pub const MYSQL_ROOT_PASSWORD: &str = "MYSQL_ROOT_PASSWORD";
pub const SITES: &str = "SITES";
pub const LETSENCRYPT_EMAIL: &str = "LETSENCRYPT_EMAIL";

// Anchored at line start and at the `=` delimiter, so `SITES` never matches
// a `SITES_EXTRA=` line.
static ENTRY: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(?P<key>[A-Za-z_][A-Za-z0-9_]*)=(?P<value>.*)$"));

/// Ordered key/value mapping with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
}

impl EnvFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file content. A repeated key keeps its first position and its last value.
    pub fn parse(content: &str) -> Self {
        Self::parse_bytes(content.as_bytes())
    }

    /// Parse raw file content. Lines that are not valid UTF-8 are skipped like
    /// any other line that is not `KEY=VALUE`.
    pub fn parse_bytes(content: &[u8]) -> Self {
        let mut env = Self::new();
        let Ok(entry) = ENTRY.as_ref() else {
            return env;
        };
        for raw in content.split(|b| *b == b'\n') {
            let Ok(line) = std::str::from_utf8(raw) else {
                continue;
            };
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim_start().starts_with('#') {
                continue;
            }
            if let Some(caps) = entry.captures(line) {
                env.set(&caps["key"], &caps["value"]);
            }
        }
        env
    }

    /// Read and parse the file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)?;
        Ok(Self::parse_bytes(&content))
    }

    /// Like [`EnvFile::load`], but a missing file is an empty mapping
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read(path) {
            Ok(content) => Ok(Self::parse_bytes(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Value for `key`, empty when absent
    pub fn get(&self, key: &str) -> &str {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Insert or replace `key`, keeping the original position on replace
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as one `KEY=VALUE` line per entry
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    /// Overwrite `path` with the rendered content.
    ///
    /// Content goes to a temporary file in the same directory that is then
    /// renamed over the target.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomically(path, &self.render())
    }
}

/// Replace `path` with `content` through a rename in the same directory
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
