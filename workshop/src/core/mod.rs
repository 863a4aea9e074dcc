//! Deterministic, pure logic shared by the workshop engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod catalog;
pub mod content;
pub mod menu;
pub mod outcome;
pub mod registry;
