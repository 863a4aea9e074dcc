//! Stable exit codes for workshop CLI commands.

/// Exercise passed, ran, or was displayed.
pub const OK: i32 = 0;
/// Verification failed or the mode reported an unexpected error.
pub const FAIL: i32 = 1;
/// Invalid configuration, unknown exercise, authoring or hook error.
pub const INVALID: i32 = 2;
