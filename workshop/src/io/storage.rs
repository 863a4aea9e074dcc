//! Durable key-value storage under an application namespace.
//!
//! Each key lives in its own `<dir>/<key>.json` file. Writes go through a temp
//! file + rename so an interrupted save never leaves a half-written value.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.config/<name>`, the conventional per-user namespace.
    pub fn user_namespace(name: &str) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
        Ok(Self::new(home.join(".config").join(name)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load the value stored under `key`; `None` if it was never saved.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("parse stored value {}", path.display()))?;
        Ok(Some(value))
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.key_path(key);
        debug!(path = %path.display(), key, "saving stored value");
        let mut buf = serde_json::to_string_pretty(value).context("serialize stored value")?;
        buf.push('\n');
        write_atomic(&path, &buf)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("storage path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp value {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace value {}", path.display()))?;
    Ok(())
}
