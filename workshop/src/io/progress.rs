//! Persisted learner progress: completed exercises and the current one.

use anyhow::Result;
use tracing::{debug, info};

use super::storage::Storage;

const COMPLETED_KEY: &str = "completed";
const CURRENT_KEY: &str = "current";
const LANG_KEY: &str = "lang";

#[derive(Debug, Clone)]
pub struct ProgressStore {
    storage: Storage,
}

impl ProgressStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Completed exercise names in completion order.
    pub fn completed(&self) -> Result<Vec<String>> {
        Ok(self.storage.get(COMPLETED_KEY)?.unwrap_or_default())
    }

    pub fn completed_count(&self) -> Result<usize> {
        Ok(self.completed()?.len())
    }

    pub fn is_completed(&self, name: &str) -> Result<bool> {
        Ok(self.completed()?.iter().any(|done| done == name))
    }

    /// Exercises left out of `total`. Not clamped: stale entries for exercises
    /// that are no longer registered can push it below zero.
    pub fn remaining(&self, total: usize) -> Result<i64> {
        Ok(total as i64 - self.completed_count()? as i64)
    }

    /// Add `name` to the completed list if absent. Always persists.
    pub fn mark_completed(&self, name: &str) -> Result<()> {
        let mut completed = self.completed()?;
        if !completed.iter().any(|done| done == name) {
            completed.push(name.to_string());
            info!(exercise = name, "exercise completed");
        } else {
            debug!(exercise = name, "exercise already completed");
        }
        self.storage.save(COMPLETED_KEY, &completed)
    }

    pub fn current(&self) -> Result<Option<String>> {
        self.storage.get(CURRENT_KEY)
    }

    pub fn set_current(&self, name: &str) -> Result<()> {
        debug!(exercise = name, "setting current exercise");
        self.storage.save(CURRENT_KEY, &name)
    }

    /// Forget all completions and the current exercise.
    pub fn reset(&self) -> Result<()> {
        info!("resetting progress");
        self.storage.save(COMPLETED_KEY, &Vec::<String>::new())?;
        self.storage.remove(CURRENT_KEY)
    }

    pub fn language(&self) -> Result<Option<String>> {
        self.storage.get(LANG_KEY)
    }

    pub fn set_language(&self, lang: &str) -> Result<()> {
        self.storage.save(LANG_KEY, &lang)
    }
}
