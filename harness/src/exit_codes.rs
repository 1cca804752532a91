//! Stable exit codes for the harness CLI.

/// The batch ran; individual cases may still have failed.
pub const OK: i32 = 0;
/// Fatal batch-level error: bad config, unreadable or invalid suite, unknown candidate.
pub const FATAL: i32 = 1;
/// Command-line usage error (reported by clap).
pub const USAGE: i32 = 2;
