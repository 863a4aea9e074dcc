//! Message catalogue loading.
//!
//! The built-in English catalogue is embedded; an application can override or
//! extend it per language with `<app_dir>/i18n/<lang>.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::catalog::Catalog;

const EN_MESSAGES: &str = include_str!("messages/en.toml");

/// The embedded English catalogue.
pub fn builtin(lang: &str) -> Catalog {
    Catalog::from_toml_str(lang, EN_MESSAGES).expect("embedded catalogue should be valid")
}

/// Built-in messages overlaid with the application's `i18n/<lang>.toml`, if any.
pub fn load_catalog(app_dir: &Path, lang: &str) -> Result<Catalog> {
    let mut catalog = builtin(lang);
    let overlay = app_dir.join("i18n").join(format!("{lang}.toml"));
    if overlay.exists() {
        debug!(path = %overlay.display(), lang, "loading catalogue overlay");
        let source = fs::read_to_string(&overlay)
            .with_context(|| format!("read {}", overlay.display()))?;
        catalog
            .merge_toml_str(&source)
            .with_context(|| format!("parse {}", overlay.display()))?;
    }
    Ok(catalog)
}
