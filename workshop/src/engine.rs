//! Exercise lifecycle orchestration.
//!
//! The [`Engine`] ties the registry, progress store, catalogue and console
//! together and drives the two control flows:
//!
//! - **show**: load → mark current → prepare → generated text → compose → render.
//! - **run**: load → dispatch mode → resolve `done` → pass/fail screen → cleanup.
//!
//! Every flow ends in a typed [`Outcome`]; the CLI maps it to an exit code.
//! User-facing problems (unknown exercise, failing hooks, broken modes) are
//! reported through the console and captured in the outcome, never returned
//! as `Err`. `Err` is reserved for infrastructure failures such as an
//! unwritable progress directory.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::core::catalog::Catalog;
use crate::core::content::{Content, ExerciseContent};
use crate::core::menu::{AuxCommand, Menu, MenuContext, MenuInput, compose_menu};
use crate::core::outcome::{DoneError, DoneSignal, Verdict, resolve_done};
use crate::core::registry::{ExerciseMeta, Factory, Registry};
use crate::exit_codes;
use crate::exercise::{
    DROPPED_DONE, Done, EventKind, Events, Exercise, Identity, ModeContext, ModeSupport, Signal,
};
use crate::io::compose::Document;
use crate::io::config::WorkshopConfig;
use crate::io::console::Console;
use crate::io::progress::ProgressStore;

const DEFAULT_FAIL: &str =
    "\n{bold}{red}# {solution.fail.title}{/red}{/bold}\n{solution.fail.message}\n";
const DEFAULT_PASS: &str =
    "\n{bold}{green}# {solution.pass.title}{/green}{/bold}\n{bold}{solution.pass.message}{/bold}\n";

/// Terminal state of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Exercise text was rendered.
    Displayed,
    /// A sync mode ran (and possibly printed something); nothing was scored.
    Informational,
    /// `run` mode completed; nothing was scored.
    Ran,
    Passed,
    Failed,
    /// The mode reported an unexpected error.
    Errored(String),
    /// A lookup, authoring or hook problem was reported and the operation abandoned.
    Reported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub terminal: Terminal,
    /// Reported cleanup failure; never changes the exit code.
    pub cleanup_error: Option<String>,
}

impl Outcome {
    pub fn new(terminal: Terminal) -> Self {
        Self {
            terminal,
            cleanup_error: None,
        }
    }

    fn after_cleanup(terminal: Terminal, cleanup_error: Option<String>) -> Self {
        Self {
            terminal,
            cleanup_error,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.terminal {
            Terminal::Displayed | Terminal::Informational | Terminal::Ran | Terminal::Passed => {
                exit_codes::OK
            }
            Terminal::Failed | Terminal::Errored(_) => exit_codes::FAIL,
            Terminal::Reported(_) => exit_codes::INVALID,
        }
    }
}

/// A live `pass`/`fail` message, re-published to engine observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEvent {
    pub kind: EventKind,
    pub exercise: String,
    pub mode: String,
    pub message: String,
}

/// A freshly built exercise together with its metadata snapshot.
pub struct LoadedExercise {
    pub meta: ExerciseMeta,
    pub exercise: Box<dyn Exercise>,
}

type Observer = Box<dyn FnMut(&ValidationEvent)>;
type CompletionHook = Box<dyn FnMut(&ExerciseMeta)>;

pub struct Engine {
    config: WorkshopConfig,
    registry: Registry,
    progress: ProgressStore,
    catalog: Catalog,
    console: Console,
    observers: Vec<Observer>,
    on_complete: Option<CompletionHook>,
}

impl Engine {
    /// Fails immediately on an invalid configuration (e.g. a missing name).
    pub fn new(
        config: WorkshopConfig,
        progress: ProgressStore,
        catalog: Catalog,
        console: Console,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: Registry::new(),
            progress,
            catalog,
            console,
            observers: Vec::new(),
            on_complete: None,
        })
    }

    pub fn config(&self) -> &WorkshopConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Swap the active catalogue (language change). Exercise name defaults
    /// are seeded again.
    pub fn set_catalog(&mut self, mut catalog: Catalog) {
        for name in self.registry.names() {
            catalog.insert_default(format!("exercise.{name}"), name);
        }
        self.catalog = catalog;
    }

    /// Register an exercise; numbering follows registration order.
    pub fn add_exercise(
        &mut self,
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
        factory: Factory,
    ) -> Result<&ExerciseMeta> {
        let meta = self.registry.register(name, dir, factory)?;
        self.catalog
            .insert_default(format!("exercise.{}", meta.name), meta.name.clone());
        debug!(exercise = %meta.name, number = meta.number, "exercise registered");
        Ok(meta)
    }

    /// Observe live `pass`/`fail` messages of every run.
    pub fn on_validation(&mut self, observer: impl FnMut(&ValidationEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Hook run after the pass screen has been fully written, before cleanup.
    /// Installing one suppresses the "all finished" message.
    pub fn set_on_complete(&mut self, hook: impl FnMut(&ExerciseMeta) + 'static) {
        self.on_complete = Some(Box::new(hook));
    }

    /// Build a fresh instance; `None` if no exercise has that name.
    pub fn load_exercise(&self, name: &str) -> Option<LoadedExercise> {
        let meta = self.registry.resolve(name)?.clone();
        let mut exercise = (meta.factory)();
        exercise.init(&Identity {
            id: meta.id.clone(),
            name: meta.name.clone(),
            dir: meta.dir.clone(),
            number: meta.number,
        });
        Some(LoadedExercise { meta, exercise })
    }

    pub fn count_remaining(&self) -> Result<i64> {
        self.progress.remaining(self.registry.len())
    }

    pub fn mark_completed(&self, name: &str) -> Result<()> {
        self.progress.mark_completed(name)
    }

    /// Show path: render the instructions of `name`.
    pub fn print_exercise(&mut self, name: &str) -> Result<Outcome> {
        let Some(mut loaded) = self.load_exercise(name) else {
            return self.report("error.exercise.missing", &[("name", name)]);
        };
        let meta = loaded.meta.clone();
        self.progress.set_current(&meta.name)?;
        info!(exercise = %meta.name, "showing exercise");

        if let Err(err) = loaded.exercise.prepare() {
            return self.report("error.exercise.preparing", &[("err", &format!("{err:#}"))]);
        }
        let generated = match loaded.exercise.exercise_text() {
            Ok(text) => text,
            Err(err) => {
                return self.report("error.exercise.loading", &[("err", &format!("{err:#}"))]);
            }
        };

        let catalog = self.exercise_catalog(&meta);
        let mut doc = Document::new(catalog.lang());
        let found = match self.compose_exercise(&mut doc, loaded.exercise.content(), generated) {
            Ok(found) => found,
            Err(err) => {
                return self.report("error.exercise.loading", &[("err", &format!("{err:#}"))]);
            }
        };
        if !found {
            return self.report("error.exercise.no_problem", &[("name", name)]);
        }

        self.console.write_document(&doc, &catalog)?;
        Ok(Outcome::new(Terminal::Displayed))
    }

    /// Queue header, problem and footer; `false` when there is no problem text.
    /// The footer is only queued when a problem was found.
    fn compose_exercise(
        &self,
        doc: &mut Document,
        content: &ExerciseContent,
        generated: Option<Content>,
    ) -> Result<bool> {
        let header = self.config.header_content();
        let _ = doc.append(content.header.as_ref())
            || doc.append_file(content.header_file.as_deref())?
            || doc.append(header.as_ref())
            || doc.append_file(self.config.header_file.as_deref())?;

        // Static problem text and generated text both render when both exist.
        let mut found = doc.append(content.problem.as_ref())
            || doc.append_file(content.problem_file.as_deref())?;
        if doc.append(generated.as_ref()) {
            found = true;
        }
        if !found {
            return Ok(false);
        }

        let footer = self.config.footer_content();
        let _ = doc.append(content.footer.as_ref())
            || doc.append_file(content.footer_file.as_deref())?
            || doc.append(footer.as_ref())
            || doc.append_file(self.config.footer_file.as_deref())?;
        Ok(true)
    }

    /// Run path by name.
    pub fn run_exercise(&mut self, name: &str, mode: &str, args: &[String]) -> Result<Outcome> {
        let Some(loaded) = self.load_exercise(name) else {
            return self.report("error.exercise.missing", &[("name", name)]);
        };
        self.run_loaded(loaded, mode, args)
    }

    /// Run path for an already loaded exercise.
    pub fn run_loaded(
        &mut self,
        mut loaded: LoadedExercise,
        mode: &str,
        args: &[String],
    ) -> Result<Outcome> {
        info!(exercise = %loaded.meta.name, mode, "running exercise mode");
        match loaded.exercise.mode(mode) {
            ModeSupport::Missing => self.report("error.exercise.no_mode", &[("mode", mode)]),
            ModeSupport::NotCallable(kind) => {
                self.report("error.exercise.mode_type", &[("mode", mode), ("kind", &kind)])
            }
            ModeSupport::Sync => match loaded.exercise.run_sync(mode, args) {
                Ok(Some(content)) => {
                    let mut doc = Document::new(self.catalog.lang());
                    doc.append_plus(content);
                    self.console.write_document(&doc, &self.catalog)?;
                    Ok(Outcome::new(Terminal::Informational))
                }
                Ok(None) => Ok(Outcome::new(Terminal::Informational)),
                Err(err) => self.report(
                    "error.exercise.unexpected_error",
                    &[("mode", mode), ("err", &format!("{err:#}"))],
                ),
            },
            ModeSupport::Callback => {
                let (tx, rx) = mpsc::channel();
                let ctx = ModeContext {
                    events: Events::new(tx.clone()),
                    done: Done::new(tx),
                };
                loaded.exercise.run_callback(mode, args, ctx);
                let signal = self.await_done(&rx, &loaded.meta.name, mode)?;
                let has_fail_override = declared(&loaded.exercise.content().fail).is_some();
                let verdict = resolve_done(signal, mode, has_fail_override);
                debug!(exercise = %loaded.meta.name, mode, ?verdict, "mode resolved");
                self.settle(verdict, mode, loaded)
            }
        }
    }

    fn settle(&mut self, verdict: Verdict, mode: &str, mut loaded: LoadedExercise) -> Result<Outcome> {
        match verdict {
            Verdict::Errored(message) => {
                let cleanup_error = self.end(mode, true, loaded.exercise.as_mut())?;
                if cleanup_error.is_none() {
                    let text = self.catalog.text_with(
                        "error.exercise.unexpected_error",
                        &[("mode", mode), ("err", &message)],
                    );
                    self.console.report(&text)?;
                }
                Ok(Outcome::after_cleanup(Terminal::Errored(message), cleanup_error))
            }
            Verdict::Ran => {
                let cleanup_error = self.end(mode, true, loaded.exercise.as_mut())?;
                Ok(Outcome::after_cleanup(Terminal::Ran, cleanup_error))
            }
            Verdict::Failed => self.exercise_fail(mode, loaded),
            Verdict::Passed => self.exercise_pass(mode, loaded),
        }
    }

    /// Pump live events until the mode signals completion.
    fn await_done(&mut self, rx: &Receiver<Signal>, exercise: &str, mode: &str) -> Result<DoneSignal> {
        loop {
            match rx.recv() {
                Ok(Signal::Event(kind, message)) => {
                    self.console.event(kind, &message)?;
                    let event = ValidationEvent {
                        kind,
                        exercise: exercise.to_string(),
                        mode: mode.to_string(),
                        message,
                    };
                    for observer in &mut self.observers {
                        observer(&event);
                    }
                }
                Ok(Signal::Done(signal)) => return Ok(signal),
                Err(_) => {
                    warn!(exercise, mode, "signal channel closed before completion");
                    return Ok(DoneSignal {
                        err: DoneError::Failure(DROPPED_DONE.to_string()),
                        pass: None,
                    });
                }
            }
        }
    }

    /// Failed screen, then cleanup with `pass=false`.
    pub fn exercise_fail(&mut self, mode: &str, mut loaded: LoadedExercise) -> Result<Outcome> {
        info!(exercise = %loaded.meta.name, mode, "exercise failed");
        let fail = declared(&loaded.exercise.content().fail)
            .cloned()
            .unwrap_or_else(|| Content::txt(DEFAULT_FAIL));
        let catalog = self.exercise_catalog(&loaded.meta);
        let mut doc = Document::new(catalog.lang());
        doc.append_plus(fail);
        self.console.write_document(&doc, &catalog)?;

        let cleanup_error = self.end(mode, false, loaded.exercise.as_mut())?;
        Ok(Outcome::after_cleanup(Terminal::Failed, cleanup_error))
    }

    /// Passed screen: records completion, shows the solution and progress,
    /// runs the completion hook once everything is written, then cleans up.
    pub fn exercise_pass(&mut self, mode: &str, mut loaded: LoadedExercise) -> Result<Outcome> {
        let meta = loaded.meta.clone();
        let content = loaded.exercise.content().clone();

        let files = if content.hide_solutions {
            Vec::new()
        } else {
            match loaded.exercise.solution_files() {
                Some(Ok(files)) => files,
                Some(Err(err)) => {
                    return self.report(
                        "solution.notes.load_error",
                        &[("err", &format!("{err:#}"))],
                    );
                }
                None => Vec::new(),
            }
        };

        self.progress.mark_completed(&meta.name)?;
        info!(exercise = %meta.name, mode, "exercise passed");

        let catalog = self.exercise_catalog(&meta);
        let mut doc = Document::new(catalog.lang());
        let pass = declared(&content.pass)
            .cloned()
            .unwrap_or_else(|| Content::txt(DEFAULT_PASS));
        doc.append(Some(&pass));

        if !content.hide_solutions {
            if !files.is_empty() || content.solution.is_some() {
                doc.append_plus(catalog.text("solution.notes.compare"));
            }
            doc.append(content.solution.as_ref());
            doc.append_files(&files);
        }

        let remaining = self.count_remaining()?;
        if remaining != 0 {
            doc.append_plus(format!(
                "{}\n{}\n",
                catalog.plural("progress.remaining", remaining),
                catalog.text_with("ui.return", &[("appName", &self.config.name)])
            ));
        } else if self.on_complete.is_none() {
            doc.append_plus(format!("{}\n", catalog.text("progress.finished")));
        }

        self.console.write_document(&doc, &catalog)?;

        if let Some(hook) = self.on_complete.as_mut() {
            hook(&meta);
        }
        let cleanup_error = self.end(mode, true, loaded.exercise.as_mut())?;
        Ok(Outcome::after_cleanup(Terminal::Passed, cleanup_error))
    }

    /// Cleanup: call the exercise's `end` hook once. A failure is reported and
    /// returned; it never changes the outcome.
    pub fn end(&mut self, mode: &str, pass: bool, exercise: &mut dyn Exercise) -> Result<Option<String>> {
        debug!(mode, pass, "cleaning up exercise");
        match exercise.end(mode, pass) {
            Ok(()) => Ok(None),
            Err(err) => {
                let message = self
                    .catalog
                    .text_with("error.cleanup", &[("err", &format!("{err:#}"))]);
                self.console.report(&message)?;
                Ok(Some(message))
            }
        }
    }

    /// Compose the menu from the registry and stored progress.
    pub fn menu(&self, commands: &[AuxCommand]) -> Result<Menu> {
        let completed = self.progress.completed()?;
        let exercises = self.registry.names();
        let catalog = match &self.config.title {
            Some(title) => self.catalog.extend([("title", title.clone())]),
            None => self.catalog.clone(),
        };
        Ok(compose_menu(&MenuInput {
            exercises: &exercises,
            completed: &completed,
            commands,
            context: MenuContext {
                languages: self.config.languages.len(),
                completed: completed.len(),
                total: exercises.len(),
            },
            catalog: &catalog,
        }))
    }

    /// Catalogue with the exercise's position available to content markers.
    fn exercise_catalog(&self, meta: &ExerciseMeta) -> Catalog {
        let count = meta.number.to_string();
        let total = self.registry.len().to_string();
        let state = self
            .catalog
            .text_with("progress.state", &[("count", &count), ("amount", &total)]);
        self.catalog.extend([
            ("currentExercise.name", meta.name.clone()),
            ("progress.count", count),
            ("progress.total", total),
            ("progress.state_resolved", state),
        ])
    }

    /// Render `doc` with the active catalogue.
    pub fn write_document(&mut self, doc: &Document) -> Result<()> {
        self.console.write_document(doc, &self.catalog)
    }

    /// Report a localized problem and abandon the operation.
    pub fn report(&mut self, key: &str, vars: &[(&str, &str)]) -> Result<Outcome> {
        let message = self.catalog.text_with(key, vars);
        debug!(key, %message, "reporting error");
        self.console.report(&message)?;
        Ok(Outcome::new(Terminal::Reported(message)))
    }
}

/// A content slot that is present and not blank.
fn declared(slot: &Option<Content>) -> Option<&Content> {
    slot.as_ref().filter(|content| !content.is_empty())
}
