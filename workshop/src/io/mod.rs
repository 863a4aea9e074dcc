//! Side-effecting helpers: filesystem, child processes and terminal output.

pub mod compose;
pub mod config;
pub mod console;
pub mod i18n;
pub mod manifest;
pub mod menu;
pub mod process;
pub mod progress;
pub mod render;
pub mod storage;
