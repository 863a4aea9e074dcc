//! Test-only helpers: scripted exercises, captured console output and
//! throwaway workshop directories.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Result, anyhow};
use tempfile::TempDir;

use crate::core::content::{Content, ExerciseContent};
use crate::core::outcome::DoneError;
use crate::core::registry::Factory;
use crate::engine::Engine;
use crate::exercise::{EventKind, Events, Exercise, Identity, ModeContext, ModeSupport};
use crate::io::config::WorkshopConfig;
use crate::io::console::Console;
use crate::io::i18n::builtin;
use crate::io::progress::ProgressStore;
use crate::io::storage::Storage;

/// Clonable in-memory sink; every clone sees the same bytes.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Ordered record of hook calls shared between an exercise template and the
/// instances its factory builds.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        if let Ok(mut log) = self.0.lock() {
            log.push(entry.into());
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

/// Scripted behavior for one mode.
#[derive(Debug, Clone)]
pub enum ScriptedMode {
    /// Sync mode returning optional content.
    Sync(Option<Content>),
    /// Sync mode failing with the message.
    SyncError(String),
    /// Callback mode: emit events, then call `done(err, pass)`.
    Callback {
        events: Vec<(EventKind, String)>,
        err: DoneError,
        pass: Option<bool>,
    },
    /// Callback mode that completes from a spawned thread.
    Threaded { pass: bool },
    /// Callback mode that drops its completion handle.
    Abandon,
    /// Callback mode that keeps its event handle and drops its completion handle.
    KeepEvents,
    /// Declared but not callable.
    NotCallable(String),
}

impl ScriptedMode {
    pub fn pass() -> Self {
        ScriptedMode::Callback {
            events: Vec::new(),
            err: DoneError::Absent,
            pass: Some(true),
        }
    }

    pub fn fail() -> Self {
        ScriptedMode::Callback {
            events: Vec::new(),
            err: DoneError::Absent,
            pass: Some(false),
        }
    }

    pub fn done(err: DoneError, pass: Option<bool>) -> Self {
        ScriptedMode::Callback {
            events: Vec::new(),
            err,
            pass,
        }
    }
}

/// An exercise whose every hook is driven by plain data.
#[derive(Debug, Clone, Default)]
pub struct ScriptedExercise {
    pub content: ExerciseContent,
    pub modes: Vec<(String, ScriptedMode)>,
    pub prepare_error: Option<String>,
    pub generated: Option<Content>,
    pub generated_error: Option<String>,
    pub solution: Option<std::result::Result<Vec<PathBuf>, String>>,
    pub end_error: Option<String>,
    pub log: CallLog,
    /// Event handle held by a [`ScriptedMode::KeepEvents`] run.
    pub kept_events: Option<Events>,
}

impl ScriptedExercise {
    pub fn with_problem(text: &str) -> Self {
        Self {
            content: ExerciseContent {
                problem: Some(Content::txt(text)),
                ..ExerciseContent::default()
            },
            ..Self::default()
        }
    }

    pub fn mode(mut self, name: &str, mode: ScriptedMode) -> Self {
        self.modes.push((name.to_string(), mode));
        self
    }

    /// Factory building clones of this template.
    pub fn factory(&self) -> Factory {
        let template = self.clone();
        Arc::new(move || Box::new(template.clone()) as Box<dyn Exercise>)
    }

    fn scripted(&self, mode: &str) -> Option<&ScriptedMode> {
        self.modes
            .iter()
            .find(|(name, _)| name == mode)
            .map(|(_, scripted)| scripted)
    }
}

impl Exercise for ScriptedExercise {
    fn init(&mut self, identity: &Identity) {
        self.log
            .push(format!("init:{}:{}", identity.name, identity.number));
    }

    fn content(&self) -> &ExerciseContent {
        &self.content
    }

    fn prepare(&mut self) -> Result<()> {
        self.log.push("prepare");
        match &self.prepare_error {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }

    fn exercise_text(&mut self) -> Result<Option<Content>> {
        self.log.push("exercise_text");
        match &self.generated_error {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(self.generated.clone()),
        }
    }

    fn mode(&self, mode: &str) -> ModeSupport {
        match self.scripted(mode) {
            None => ModeSupport::Missing,
            Some(ScriptedMode::Sync(_)) | Some(ScriptedMode::SyncError(_)) => ModeSupport::Sync,
            Some(ScriptedMode::NotCallable(kind)) => ModeSupport::NotCallable(kind.clone()),
            Some(_) => ModeSupport::Callback,
        }
    }

    fn run_sync(&mut self, mode: &str, args: &[String]) -> Result<Option<Content>> {
        self.log.push(format!("run:{mode}:{}", args.join(" ")));
        match self.scripted(mode) {
            Some(ScriptedMode::Sync(content)) => Ok(content.clone()),
            Some(ScriptedMode::SyncError(message)) => Err(anyhow!("{message}")),
            _ => Ok(None),
        }
    }

    fn run_callback(&mut self, mode: &str, args: &[String], ctx: ModeContext) {
        self.log.push(format!("run:{mode}:{}", args.join(" ")));
        match self.scripted(mode).cloned() {
            Some(ScriptedMode::Callback { events, err, pass }) => {
                for (kind, message) in events {
                    match kind {
                        EventKind::Pass => ctx.events.pass(message),
                        EventKind::Fail => ctx.events.fail(message),
                    }
                }
                ctx.done.finish(err, pass);
            }
            Some(ScriptedMode::Threaded { pass }) => {
                let ModeContext { events, done } = ctx;
                thread::spawn(move || {
                    events.pass("checked on a worker thread");
                    done.finish(DoneError::Absent, Some(pass));
                });
            }
            Some(ScriptedMode::Abandon) => drop(ctx),
            Some(ScriptedMode::KeepEvents) => {
                let ModeContext { events, done } = ctx;
                self.kept_events = Some(events);
                drop(done);
            }
            _ => ctx.done.error("not a callback mode"),
        }
    }

    fn solution_files(&mut self) -> Option<Result<Vec<PathBuf>>> {
        self.solution
            .clone()
            .map(|files| files.map_err(|message| anyhow!("{message}")))
    }

    fn end(&mut self, mode: &str, pass: bool) -> Result<()> {
        self.log.push(format!("end:{mode}:{pass}"));
        match &self.end_error {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

/// Engine over a temp progress directory with captured output.
pub struct TestEngine {
    pub temp: TempDir,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

impl TestEngine {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: tempfile::tempdir()?,
            out: SharedBuffer::default(),
            err: SharedBuffer::default(),
        })
    }

    pub fn progress(&self) -> ProgressStore {
        ProgressStore::new(Storage::new(self.temp.path().join("progress")))
    }

    /// A fresh engine sharing this fixture's storage and buffers.
    pub fn engine(&self, config: WorkshopConfig) -> Result<Engine> {
        let console = Console::new(
            Box::new(self.out.clone()),
            Box::new(self.err.clone()),
            false,
        );
        Engine::new(config, self.progress(), builtin("en"), console)
    }

    /// An engine for a workshop named `learnyou` with `exercises` registered
    /// in order.
    pub fn with_exercises(&self, exercises: &[(&str, &ScriptedExercise)]) -> Result<Engine> {
        let mut engine = self.engine(WorkshopConfig::named("learnyou"))?;
        for (name, exercise) in exercises {
            engine.add_exercise(*name, self.temp.path().join(name), exercise.factory())?;
        }
        Ok(engine)
    }
}

/// Builder for a workshop directory on disk.
pub struct TempWorkshop {
    pub dir: TempDir,
}

impl TempWorkshop {
    /// Writes `workshop.toml` (with a private `storage_dir`) and an exercise
    /// menu listing `exercises`.
    pub fn new(config: &str, exercises: &[&str]) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let config = format!("{config}\nstorage_dir = \"progress\"\n");
        write_file(&dir.path().join("workshop.toml"), &config)?;
        let names: Vec<String> = exercises.iter().map(|name| format!("{name:?}")).collect();
        write_file(
            &dir.path().join("exercises/menu.toml"),
            &format!("exercises = [{}]\n", names.join(", ")),
        )?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `relative` under `exercises/<slug>/`.
    pub fn exercise_file(&self, slug: &str, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join("exercises").join(slug).join(relative);
        write_file(&path, contents)?;
        Ok(path)
    }

    pub fn file(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        write_file(&path, contents)?;
        Ok(path)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
