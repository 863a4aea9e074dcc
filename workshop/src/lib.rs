//! Terminal runner for self-paced programming workshops.
//!
//! A workshop is a directory with a `workshop.toml`, a list of exercises and
//! their content. The learner reads an exercise, solves it on their own
//! machine and lets the runner verify the solution. Progress persists between
//! runs.
//!
//! - **[`core`]**: Pure logic (registry, content model, done resolution, menu
//!   composition, message catalogue). No I/O.
//! - **[`io`]**: Side effects (config, progress files, child processes,
//!   terminal rendering).
//!
//! [`engine`] drives the show and run lifecycles; [`commands`] and [`app`]
//! put the CLI on top of it.

pub mod app;
pub mod commands;
pub mod core;
pub mod engine;
pub mod exercise;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
