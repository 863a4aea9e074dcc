//! Exercise capability surface.
//!
//! An [`Exercise`] is created fresh by its registered factory for every show or
//! run. All hooks have no-op defaults, so an implementation only overrides the
//! capabilities it actually has. Modes come in two explicit flavours:
//!
//! - **Sync** modes return content to display and never reach the pass/fail
//!   screens (informational modes).
//! - **Callback** modes receive a [`ModeContext`] and must eventually call one of
//!   the [`Done`] methods. Both [`Done`] and [`Events`] are `Send`, so a check
//!   may finish on another thread.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use anyhow::Result;

use crate::core::content::{Content, ExerciseContent};
use crate::core::outcome::{DoneError, DoneSignal};

/// Identity handed to [`Exercise::init`] right after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub dir: PathBuf,
    pub number: usize,
}

/// Which entry point (if any) an exercise offers for a mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSupport {
    /// The exercise has nothing under this mode name.
    Missing,
    /// Something is declared under the mode name but it cannot be invoked.
    NotCallable(String),
    /// Handled by [`Exercise::run_sync`].
    Sync,
    /// Handled by [`Exercise::run_callback`].
    Callback,
}

/// Kind of a live validation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Pass,
    Fail,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Pass => "pass",
            EventKind::Fail => "fail",
        }
    }
}

/// Messages flowing from a running callback mode back to the engine.
#[derive(Debug)]
pub enum Signal {
    Event(EventKind, String),
    Done(DoneSignal),
}

/// Emitter for per-check `pass`/`fail` messages while a mode runs.
#[derive(Debug, Clone)]
pub struct Events {
    tx: Sender<Signal>,
}

impl Events {
    pub(crate) fn new(tx: Sender<Signal>) -> Self {
        Self { tx }
    }

    pub fn pass(&self, message: impl Into<String>) {
        self.emit(EventKind::Pass, message.into());
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.emit(EventKind::Fail, message.into());
    }

    fn emit(&self, kind: EventKind, message: String) {
        // The engine only stops listening after `Done`; late events are dropped.
        let _ = self.tx.send(Signal::Event(kind, message));
    }
}

/// Failure reported for a [`Done`] dropped without being called.
pub const DROPPED_DONE: &str = "the mode finished without reporting a result";

/// One-shot completion handle for a callback mode.
///
/// Dropping it without calling any method resolves the run as an unexpected
/// error, even while [`Events`] clones are still alive.
#[derive(Debug)]
pub struct Done {
    tx: Option<Sender<Signal>>,
}

impl Done {
    pub(crate) fn new(tx: Sender<Signal>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Raw `(err, pass)` completion; see [`crate::core::outcome::resolve_done`].
    pub fn finish(mut self, err: DoneError, pass: Option<bool>) {
        self.send(err, pass);
    }

    fn send(&mut self, err: DoneError, pass: Option<bool>) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Signal::Done(DoneSignal { err, pass }));
        }
    }

    pub fn pass(self) {
        self.finish(DoneError::Absent, Some(true));
    }

    pub fn fail(self) {
        self.finish(DoneError::Absent, Some(false));
    }

    /// Legacy single-argument form: `done(true)`, `done(false)`, `done()`.
    pub fn flag(self, flag: Option<bool>) {
        let err = match flag {
            Some(value) => DoneError::Flag(value),
            None => DoneError::Absent,
        };
        self.finish(err, None);
    }

    pub fn error(self, err: impl std::fmt::Display) {
        self.finish(DoneError::Failure(err.to_string()), None);
    }
}

impl Drop for Done {
    fn drop(&mut self) {
        self.send(DoneError::Failure(DROPPED_DONE.to_string()), None);
    }
}

/// Handles passed into [`Exercise::run_callback`].
#[derive(Debug)]
pub struct ModeContext {
    pub events: Events,
    pub done: Done,
}

/// An exercise loaded for one show or run.
pub trait Exercise {
    /// One-time setup, called immediately after the factory builds the instance.
    fn init(&mut self, _identity: &Identity) {}

    /// Static content slots.
    fn content(&self) -> &ExerciseContent;

    /// Setup that must complete before the exercise text is shown.
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    /// Dynamically generated instructional text.
    fn exercise_text(&mut self) -> Result<Option<Content>> {
        Ok(None)
    }

    fn mode(&self, _mode: &str) -> ModeSupport {
        ModeSupport::Missing
    }

    fn run_sync(&mut self, _mode: &str, _args: &[String]) -> Result<Option<Content>> {
        Ok(None)
    }

    fn run_callback(&mut self, mode: &str, _args: &[String], ctx: ModeContext) {
        ctx.done
            .error(format_args!("mode '{mode}' has no callback implementation"));
    }

    /// Reference solution files for the pass screen. `None` means the
    /// exercise does not provide any.
    fn solution_files(&mut self) -> Option<Result<Vec<PathBuf>>> {
        None
    }

    /// Cleanup hook, called exactly once per run.
    fn end(&mut self, _mode: &str, _pass: bool) -> Result<()> {
        Ok(())
    }
}
