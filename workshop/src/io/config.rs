//! Workshop configuration stored as `workshop.toml` in the application directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::content::{Content, ContentType};

pub const CONFIG_FILE: &str = "workshop.toml";

/// Workshop configuration (TOML).
///
/// Only `name` is required: it namespaces the stored progress. Everything else
/// has a usable default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkshopConfig {
    /// Application name; also the progress storage namespace.
    pub name: String,

    /// Menu title. Falls back to the catalogue's `title` entry.
    pub title: Option<String>,

    /// Supported language tags, first one is the fallback.
    pub languages: Vec<String>,

    pub default_lang: Option<String>,

    /// Exercise catalogue directory, relative to the application directory.
    pub exercise_dir: PathBuf,

    /// Default header shown when an exercise declares none.
    pub header: Option<String>,
    pub header_type: ContentType,
    pub header_file: Option<PathBuf>,

    /// Default footer shown when an exercise declares none.
    pub footer: Option<String>,
    pub footer_type: ContentType,
    pub footer_file: Option<PathBuf>,

    /// Override for the progress directory (default `~/.config/<name>`).
    pub storage_dir: Option<PathBuf>,

    /// Emit ANSI styling.
    pub color: bool,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: None,
            languages: vec!["en".to_string()],
            default_lang: None,
            exercise_dir: PathBuf::from("exercises"),
            header: None,
            header_type: ContentType::Txt,
            header_file: None,
            footer: None,
            footer_type: ContentType::Txt,
            footer_file: None,
            storage_dir: None,
            color: true,
        }
    }
}

impl WorkshopConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!(
                "the workshop needs a name to store the progress (set `name` in {CONFIG_FILE})"
            ));
        }
        if self.languages.is_empty() {
            return Err(anyhow!("languages must be a non-empty array"));
        }
        if let Some(lang) = &self.default_lang
            && !self.languages.contains(lang)
        {
            return Err(anyhow!(
                "default_lang '{lang}' is not listed in languages {:?}",
                self.languages
            ));
        }
        Ok(())
    }

    /// Default language: `default_lang`, else the first configured language.
    pub fn default_language(&self) -> &str {
        self.default_lang
            .as_deref()
            .or_else(|| self.languages.first().map(String::as_str))
            .unwrap_or("en")
    }

    pub fn header_content(&self) -> Option<Content> {
        self.header
            .as_ref()
            .map(|text| Content::new(text.clone(), self.header_type.clone()))
    }

    pub fn footer_content(&self) -> Option<Content> {
        self.footer
            .as_ref()
            .map(|text| Content::new(text.clone(), self.footer_type.clone()))
    }

    /// Resolve relative paths against the application directory.
    pub fn anchor(&mut self, app_dir: &Path) {
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = app_dir.join(&*path);
            }
        };
        anchor(&mut self.exercise_dir);
        if let Some(path) = self.header_file.as_mut() {
            anchor(path);
        }
        if let Some(path) = self.footer_file.as_mut() {
            anchor(path);
        }
        if let Some(path) = self.storage_dir.as_mut() {
            anchor(path);
        }
    }
}

/// Load and validate `workshop.toml` from `app_dir`, anchoring relative paths.
pub fn load_config(app_dir: &Path) -> Result<WorkshopConfig> {
    let path = app_dir.join(CONFIG_FILE);
    let contents = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let mut cfg: WorkshopConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    cfg.anchor(app_dir);
    Ok(cfg)
}
