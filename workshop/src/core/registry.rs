//! Ordered exercise registration and name lookup.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};

use crate::exercise::Exercise;

/// Builds a fresh exercise instance for every show or run.
pub type Factory = Arc<dyn Fn() -> Box<dyn Exercise> + Send + Sync>;

/// Registered exercise metadata. Immutable once registered.
#[derive(Clone)]
pub struct ExerciseMeta {
    pub id: String,
    pub name: String,
    /// 1-based registration index.
    pub number: usize,
    pub dir: PathBuf,
    pub factory: Factory,
}

impl fmt::Debug for ExerciseMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExerciseMeta")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("number", &self.number)
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// Derive the exercise id (and directory name) from its display name.
///
/// Lowercases, turns whitespace into `_` and drops anything else that is not
/// an ASCII word character: `"Hello World!"` becomes `hello_world`.
pub fn id_from_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || c == '_' {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Append-only exercise catalogue.
#[derive(Debug, Default)]
pub struct Registry {
    exercises: Vec<ExerciseMeta>,
    by_id: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exercise; its number is the 1-based registration index.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
        factory: Factory,
    ) -> Result<&ExerciseMeta> {
        let name = name.into();
        let id = id_from_name(&name);
        if id.is_empty() {
            bail!("exercise name '{name}' has no usable id characters");
        }
        if let Some(&idx) = self.by_id.get(&id) {
            bail!(
                "exercise '{name}' collides with registered exercise '{}' (id '{id}')",
                self.exercises[idx].name
            );
        }
        let number = self.exercises.len() + 1;
        self.by_id.insert(id.clone(), self.exercises.len());
        self.exercises.push(ExerciseMeta {
            id,
            name,
            number,
            dir: dir.into(),
            factory,
        });
        Ok(&self.exercises[number - 1])
    }

    /// Look up by display name (or id); names are matched through their id.
    pub fn resolve(&self, name: &str) -> Option<&ExerciseMeta> {
        self.by_id
            .get(&id_from_name(name))
            .map(|&idx| &self.exercises[idx])
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.exercises.iter().map(|meta| meta.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseMeta> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// The exercise registered right after `name`, if any.
    pub fn next_after(&self, name: &str) -> Option<&ExerciseMeta> {
        let meta = self.resolve(name)?;
        self.exercises.get(meta.number)
    }
}
