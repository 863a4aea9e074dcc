//! Directory-backed exercise catalogue.
//!
//! Layout under the exercise directory:
//!
//! ```text
//! exercises/
//!   menu.toml               exercises = ["Hello World", "Baby Steps"]
//!   hello_world/
//!     exercise.toml         content fields + [modes.<name>] commands
//!     problem.md            default problem file
//!     solution/             reference solution shown on pass
//! ```
//!
//! Modes are commands. `{args}` as a whole argument splices the learner's
//! arguments (appended at the end when absent); `{dir}` inside an argument is
//! replaced by the exercise directory. Captured modes pass on exit status 0;
//! attached modes (the default for `run`) share the terminal.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tracing::{debug, info};

use super::process::{run_attached, run_captured};
use crate::core::content::{Content, ExerciseContent};
use crate::core::registry::{Factory, id_from_name};
use crate::exercise::{Exercise, Identity, ModeContext, ModeSupport};

pub const MENU_FILE: &str = "menu.toml";
pub const MANIFEST_FILE: &str = "exercise.toml";
const DEFAULT_PROBLEM_FILE: &str = "problem.md";
const SOLUTION_DIR: &str = "solution";

#[derive(Debug, Clone, Deserialize)]
struct MenuFile {
    exercises: Vec<String>,
}

/// Inline content: a bare string (plain text) or `{ text, type }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum InlineContent {
    Plain(String),
    Typed(Content),
}

impl From<InlineContent> for Content {
    fn from(inline: InlineContent) -> Self {
        match inline {
            InlineContent::Plain(text) => Content::txt(text),
            InlineContent::Typed(content) => content,
        }
    }
}

/// Parsed `exercise.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExerciseManifest {
    header: Option<InlineContent>,
    header_file: Option<PathBuf>,
    problem: Option<InlineContent>,
    problem_file: Option<PathBuf>,
    footer: Option<InlineContent>,
    footer_file: Option<PathBuf>,
    pass: Option<InlineContent>,
    fail: Option<InlineContent>,
    solution: Option<InlineContent>,
    hide_solutions: bool,
    /// Upper bound for every mode command.
    timeout_secs: u64,
    /// Captured output kept per stream.
    output_limit_bytes: usize,
    modes: BTreeMap<String, toml::Value>,
}

impl Default for ExerciseManifest {
    fn default() -> Self {
        Self {
            header: None,
            header_file: None,
            problem: None,
            problem_file: None,
            footer: None,
            footer_file: None,
            pass: None,
            fail: None,
            solution: None,
            hide_solutions: false,
            timeout_secs: 60,
            output_limit_bytes: 100_000,
            modes: BTreeMap::new(),
        }
    }
}

impl ExerciseManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let manifest: ExerciseManifest =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        if manifest.timeout_secs == 0 {
            bail!("{}: timeout_secs must be > 0", path.display());
        }
        Ok(manifest)
    }

    /// Content slots with file paths anchored at `dir`.
    fn content(&self, dir: &Path) -> ExerciseContent {
        let inline = |slot: &Option<InlineContent>| slot.clone().map(Content::from);
        let anchored = |path: &Option<PathBuf>| path.as_ref().map(|p| dir.join(p));
        let problem = inline(&self.problem);
        let problem_file = match (&problem, &self.problem_file) {
            (None, None) => Some(dir.join(DEFAULT_PROBLEM_FILE)),
            (_, path) => anchored(path),
        };
        ExerciseContent {
            header: inline(&self.header),
            header_file: anchored(&self.header_file),
            problem,
            problem_file,
            footer: inline(&self.footer),
            footer_file: anchored(&self.footer_file),
            pass: inline(&self.pass),
            fail: inline(&self.fail),
            solution: inline(&self.solution),
            hide_solutions: self.hide_solutions,
        }
    }
}

/// One `[modes.<name>]` table.
#[derive(Debug, Clone, Deserialize)]
struct ModeCommand {
    command: Vec<String>,
    attached: Option<bool>,
}

impl ModeCommand {
    fn build(&self, args: &[String], dir: &Path) -> Result<Command> {
        let dir_str = dir.to_string_lossy();
        let mut argv: Vec<String> = Vec::new();
        let mut spliced = false;
        for part in &self.command {
            if part == "{args}" {
                argv.extend(args.iter().cloned());
                spliced = true;
            } else {
                argv.push(part.replace("{dir}", &dir_str));
            }
        }
        if !spliced {
            argv.extend(args.iter().cloned());
        }
        let (program, rest) = argv
            .split_first()
            .ok_or_else(|| anyhow!("mode command is empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(rest);
        Ok(cmd)
    }
}

/// An exercise described by `exercise.toml`.
#[derive(Debug, Clone)]
pub struct ManifestExercise {
    manifest: Arc<ExerciseManifest>,
    dir: PathBuf,
    content: ExerciseContent,
    name: String,
}

impl ManifestExercise {
    pub fn new(manifest: Arc<ExerciseManifest>, dir: PathBuf) -> Self {
        let content = manifest.content(&dir);
        Self {
            manifest,
            dir,
            content,
            name: String::new(),
        }
    }

    fn mode_command(&self, mode: &str) -> Result<ModeCommand> {
        let value = self
            .manifest
            .modes
            .get(mode)
            .ok_or_else(|| anyhow!("no mode named '{mode}'"))?;
        value
            .clone()
            .try_into()
            .with_context(|| format!("parse [modes.{mode}]"))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.manifest.timeout_secs)
    }
}

impl Exercise for ManifestExercise {
    fn init(&mut self, identity: &Identity) {
        self.name = identity.name.clone();
        self.dir = identity.dir.clone();
    }

    fn content(&self) -> &ExerciseContent {
        &self.content
    }

    fn mode(&self, mode: &str) -> ModeSupport {
        match self.manifest.modes.get(mode) {
            None => ModeSupport::Missing,
            Some(toml::Value::Table(table)) if table.get("command").is_some_and(|c| c.is_array()) => {
                ModeSupport::Callback
            }
            Some(toml::Value::Table(_)) => ModeSupport::NotCallable("table without a command".to_string()),
            Some(other) => ModeSupport::NotCallable(other.type_str().to_string()),
        }
    }

    fn run_callback(&mut self, mode: &str, args: &[String], ctx: ModeContext) {
        let ModeContext { events, done } = ctx;
        let command = match self.mode_command(mode) {
            Ok(command) => command,
            Err(err) => return done.error(format!("{err:#}")),
        };
        let cmd = match command.build(args, &self.dir) {
            Ok(cmd) => cmd,
            Err(err) => return done.error(format!("{err:#}")),
        };
        info!(exercise = %self.name, mode, "running mode command");

        if command.attached.unwrap_or(mode == "run") {
            match run_attached(cmd, self.timeout()) {
                Ok((_, true)) => done.error(format!(
                    "timed out after {}s",
                    self.manifest.timeout_secs
                )),
                Ok((status, false)) => done.flag(Some(status.success())),
                Err(err) => done.error(format!("{err:#}")),
            }
            return;
        }

        match run_captured(cmd, self.timeout(), self.manifest.output_limit_bytes) {
            Ok(output) if output.passed() => {
                events.pass(output.summary_line().unwrap_or_else(|| format!("{mode} passed")));
                done.pass();
            }
            Ok(output) => {
                let message = if output.timed_out {
                    format!("timed out after {}s", self.manifest.timeout_secs)
                } else {
                    output
                        .summary_line()
                        .unwrap_or_else(|| format!("exited with {}", output.status))
                };
                events.fail(message);
                done.fail();
            }
            Err(err) => done.error(format!("{err:#}")),
        }
    }

    fn solution_files(&mut self) -> Option<Result<Vec<PathBuf>>> {
        let solution_dir = self.dir.join(SOLUTION_DIR);
        if !solution_dir.is_dir() {
            return None;
        }
        Some(list_files(&solution_dir))
    }
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.context("read entry")?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// An exercise ready to be registered.
pub struct CatalogEntry {
    pub name: String,
    pub dir: PathBuf,
    pub factory: Factory,
}

/// Read `menu.toml` and every listed exercise's manifest.
///
/// An exercise directory without `exercise.toml` gets the default manifest
/// (problem from `problem.md`, no modes).
pub fn load_catalog_entries(exercise_dir: &Path) -> Result<Vec<CatalogEntry>> {
    let menu_path = exercise_dir.join(MENU_FILE);
    let contents = fs::read_to_string(&menu_path)
        .with_context(|| format!("read {}", menu_path.display()))?;
    let menu: MenuFile =
        toml::from_str(&contents).with_context(|| format!("parse {}", menu_path.display()))?;

    let mut entries = Vec::with_capacity(menu.exercises.len());
    for name in menu.exercises {
        let dir = exercise_dir.join(id_from_name(&name));
        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            ExerciseManifest::load(&manifest_path)?
        } else {
            debug!(exercise = %name, "no manifest, using defaults");
            ExerciseManifest::default()
        };
        let manifest = Arc::new(manifest);
        let factory_dir = dir.clone();
        let factory: Factory = Arc::new(move || {
            Box::new(ManifestExercise::new(manifest.clone(), factory_dir.clone())) as Box<dyn Exercise>
        });
        entries.push(CatalogEntry { name, dir, factory });
    }
    Ok(entries)
}
