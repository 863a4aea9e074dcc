//! Product output sinks: rendered documents, live check results and reported errors.

use std::io::{self, Write};

use anyhow::{Context, Result};

use super::compose::Document;
use super::render::{Styler, render_document};
use crate::core::catalog::Catalog;
use crate::exercise::EventKind;

pub struct Console {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    styler: Styler,
}

impl Console {
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out,
            err,
            styler: Styler::new(color),
        }
    }

    /// Stdout / stderr.
    pub fn stdio(color: bool) -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()), color)
    }

    pub fn styler(&self) -> Styler {
        self.styler
    }

    /// Write a whole document and flush; returns once the sink has drained.
    pub fn write_document(&mut self, doc: &Document, catalog: &Catalog) -> Result<()> {
        let rendered = render_document(doc, catalog, self.styler);
        self.out
            .write_all(rendered.as_bytes())
            .context("write document")?;
        self.out.flush().context("flush document")
    }

    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("write output")?;
        self.out.flush().context("flush output")
    }

    /// Live `✓ message` / `✗ message` line for a single check.
    pub fn event(&mut self, kind: EventKind, message: &str) -> Result<()> {
        let mark = match kind {
            EventKind::Pass => self.styler.green_bold("\u{2713} "),
            EventKind::Fail => self.styler.red_bold("\u{2717} "),
        };
        self.line(&format!("{mark}{message}"))
    }

    /// The single user-facing error reporter.
    pub fn report(&mut self, message: &str) -> Result<()> {
        writeln!(self.err, "{}", self.styler.red(message)).context("write report")?;
        self.err.flush().context("flush report")
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("styler", &self.styler)
            .finish_non_exhaustive()
    }
}
