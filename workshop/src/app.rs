//! Application bootstrap: config, progress storage, catalogue and exercises.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::io::config::{WorkshopConfig, load_config};
use crate::io::console::Console;
use crate::io::i18n::load_catalog;
use crate::io::manifest::load_catalog_entries;
use crate::io::progress::ProgressStore;
use crate::io::storage::Storage;

/// Build an [`Engine`] for the workshop in `app_dir`.
///
/// `console` receives the loaded config so the caller can decide on color.
pub fn open_engine(
    app_dir: &Path,
    console: impl FnOnce(&WorkshopConfig) -> Console,
) -> Result<Engine> {
    let config = load_config(app_dir)?;
    let storage = match &config.storage_dir {
        Some(dir) => Storage::new(dir.clone()),
        None => Storage::user_namespace(&config.name)?,
    };
    debug!(dir = %storage.dir().display(), "progress storage");
    let progress = ProgressStore::new(storage);

    let lang = active_language(&config, &progress)?;
    let catalog = load_catalog(app_dir, &lang)?;
    let console = console(&config);
    let exercise_dir = config.exercise_dir.clone();

    let mut engine = Engine::new(config, progress, catalog, console)?;
    for entry in load_catalog_entries(&exercise_dir)? {
        engine
            .add_exercise(entry.name.clone(), entry.dir, entry.factory)
            .with_context(|| format!("register exercise '{}'", entry.name))?;
    }
    info!(
        exercises = engine.registry().len(),
        lang, "workshop loaded"
    );
    Ok(engine)
}

/// The stored language when it is still configured, else the default one.
fn active_language(config: &WorkshopConfig, progress: &ProgressStore) -> Result<String> {
    let stored = progress
        .language()?
        .filter(|lang| config.languages.iter().any(|known| known == lang));
    Ok(stored.unwrap_or_else(|| config.default_language().to_string()))
}
