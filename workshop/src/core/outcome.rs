//! Resolution of the `done(err, pass)` completion contract.
//!
//! Pure and deterministic: the engine feeds in whatever a callback mode
//! reported and acts on the returned [`Verdict`].

/// Error slot of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoneError {
    /// Nothing passed (`done()` / `done(null, ...)`).
    Absent,
    /// A bare boolean in the error slot, the legacy single-argument form.
    Flag(bool),
    /// A real error with its message.
    Failure(String),
}

/// Raw arguments of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoneSignal {
    pub err: DoneError,
    pub pass: Option<bool>,
}

/// What the engine does next after a mode completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Cleanup with `pass=true`, then report the error.
    Errored(String),
    /// `run` mode: cleanup with `pass=true`, no outcome screen.
    Ran,
    Failed,
    Passed,
}

/// Apply the completion rules.
///
/// - With `pass` absent, a boolean or absent error is reinterpreted as `pass`.
/// - A truthy error wins over everything else.
/// - `run` mode never scores.
/// - A declared static fail message forces a failure.
pub fn resolve_done(signal: DoneSignal, mode: &str, has_fail_override: bool) -> Verdict {
    let DoneSignal { err, pass } = signal;
    let (err, pass) = match (err, pass) {
        (DoneError::Flag(flag), None) => (None, Some(flag)),
        (DoneError::Absent, None) => (None, None),
        (DoneError::Flag(true), pass) => (Some("true".to_string()), pass),
        (DoneError::Flag(false) | DoneError::Absent, pass) => (None, pass),
        (DoneError::Failure(message), pass) => (Some(message), pass),
    };

    if let Some(message) = err {
        return Verdict::Errored(message);
    }
    if mode == "run" {
        return Verdict::Ran;
    }
    if !pass.unwrap_or(false) || has_fail_override {
        return Verdict::Failed;
    }
    Verdict::Passed
}
